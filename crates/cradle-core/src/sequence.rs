// ── Per-resource request sequencing ──
//
// Every request that will write into the store first takes a ticket for
// its logical resource. User-triggered responses are applied only if their
// ticket is still the newest one issued. Poll responses, which overlap by
// design, are applied only if nothing newer has been answered yet, so a
// slow service still makes progress but an old answer never overwrites a
// newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// The logical resources whose writes are sequenced independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
    Agents,
    Selection,
    Status,
    Alerts,
    Settings,
}

/// Proof that a request was issued, ordered within its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    resource: Resource,
    seq: u64,
}

impl Ticket {
    pub fn resource(self) -> Resource {
        self.resource
    }

    pub fn seq(self) -> u64 {
        self.seq
    }
}

/// Hands out monotonically increasing tickets per [`Resource`].
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: DashMap<Resource, u64>,
    answered: DashMap<Resource, u64>,
    issued: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket for `resource`, superseding all earlier ones.
    pub fn begin(&self, resource: Resource) -> Ticket {
        let mut latest = self.latest.entry(resource).or_insert(0);
        *latest += 1;
        self.issued.fetch_add(1, Ordering::Relaxed);
        Ticket {
            resource,
            seq: *latest,
        }
    }

    /// `true` while no newer ticket for the same resource has been issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest
            .get(&ticket.resource)
            .is_some_and(|latest| *latest == ticket.seq)
    }

    /// Record `ticket` as answered. Returns `false` if an answer to a newer
    /// ticket for the same resource was already recorded.
    pub fn complete(&self, ticket: Ticket) -> bool {
        let mut answered = self.answered.entry(ticket.resource).or_insert(0);
        if ticket.seq > *answered {
            *answered = ticket.seq;
            true
        } else {
            false
        }
    }

    /// Total tickets issued across all resources.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}
