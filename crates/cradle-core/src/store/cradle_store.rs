// ── Central cradle store ──
//
// Writes are serialized through one mutex so the device set and the
// selection always change together; reads go straight to the `watch`
// channels and never block on the network. Every write is total: it
// either applies or is a no-op, it never fails.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cradle_api::{Agent, AgentStatus, AlertLog, AlertSettings, User};
use tokio::sync::watch;
use tracing::debug;

use super::StatusStream;
use crate::config::SelectionFallback;
use crate::sequence::{RequestSequencer, Resource, Ticket};

type AgentSet = Arc<Vec<Arc<Agent>>>;
type AlertList = Arc<Vec<Arc<AlertLog>>>;

/// Settings snapshot, tagged with the cradle it belongs to.
type SettingsEntry = Option<(String, Arc<AlertSettings>)>;

/// Authoritative client-side state for one monitoring session.
///
/// Invariant: `selected()` is always a member of `agents()` or `None`.
pub struct CradleStore {
    session: watch::Sender<Option<Arc<User>>>,
    agents: watch::Sender<AgentSet>,
    selected: watch::Sender<Option<Arc<Agent>>>,
    status: watch::Sender<Option<Arc<AgentStatus>>>,
    alerts: watch::Sender<AlertList>,
    settings: watch::Sender<SettingsEntry>,
    sequencer: RequestSequencer,
    fallback: SelectionFallback,
    writes: Mutex<()>,
    closed: AtomicBool,
}

impl CradleStore {
    pub fn new(fallback: SelectionFallback) -> Self {
        let (session, _) = watch::channel(None);
        let (agents, _) = watch::channel(Arc::new(Vec::new()));
        let (selected, _) = watch::channel(None);
        let (status, _) = watch::channel(None);
        let (alerts, _) = watch::channel(Arc::new(Vec::new()));
        let (settings, _) = watch::channel(None);

        Self {
            session,
            agents,
            selected,
            status,
            alerts,
            settings,
            sequencer: RequestSequencer::new(),
            fallback,
            writes: Mutex::new(()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn selection_fallback(&self) -> SelectionFallback {
        self.fallback
    }

    /// Issue a ticket for a request whose response will be written here.
    pub fn begin(&self, resource: Resource) -> Ticket {
        self.sequencer.begin(resource)
    }

    pub fn sequencer(&self) -> &RequestSequencer {
        &self.sequencer
    }

    // ── Teardown ─────────────────────────────────────────────────────

    /// Stop accepting writes. Responses that land afterwards are dropped.
    pub fn close(&self) {
        let _guard = self.lock();
        self.closed.store(true, Ordering::SeqCst);
        debug!("store closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn session(&self) -> Option<Arc<User>> {
        self.session.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn agents(&self) -> AgentSet {
        self.agents.borrow().clone()
    }

    pub fn agent(&self, uuid: &str) -> Option<Arc<Agent>> {
        self.agents.borrow().iter().find(|a| a.uuid == uuid).cloned()
    }

    pub fn selected(&self) -> Option<Arc<Agent>> {
        self.selected.borrow().clone()
    }

    pub fn selected_uuid(&self) -> Option<String> {
        self.selected.borrow().as_ref().map(|a| a.uuid.clone())
    }

    pub fn status(&self) -> Option<Arc<AgentStatus>> {
        self.status.borrow().clone()
    }

    pub fn alerts(&self) -> AlertList {
        self.alerts.borrow().clone()
    }

    /// Alert settings for the selected cradle, if fetched since it was selected.
    pub fn settings(&self) -> Option<Arc<AlertSettings>> {
        self.settings
            .borrow()
            .as_ref()
            .map(|(_, settings)| Arc::clone(settings))
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_session(&self) -> watch::Receiver<Option<Arc<User>>> {
        self.session.subscribe()
    }

    pub fn subscribe_agents(&self) -> watch::Receiver<AgentSet> {
        self.agents.subscribe()
    }

    pub fn subscribe_selected(&self) -> watch::Receiver<Option<Arc<Agent>>> {
        self.selected.subscribe()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<Option<Arc<AgentStatus>>> {
        self.status.subscribe()
    }

    pub fn subscribe_alerts(&self) -> watch::Receiver<AlertList> {
        self.alerts.subscribe()
    }

    pub fn status_stream(&self) -> StatusStream {
        StatusStream::new(self.status.subscribe())
    }

    // ── Session ──────────────────────────────────────────────────────

    pub fn set_session(&self, user: Option<User>) {
        self.write(|| {
            self.session.send_replace(user.map(Arc::new));
        });
    }

    /// Drop everything tied to the signed-in user.
    pub fn reset(&self) {
        self.write(|| {
            self.session.send_replace(None);
            self.agents.send_replace(Arc::new(Vec::new()));
            self.alerts.send_replace(Arc::new(Vec::new()));
            self.select(None);
        });
    }

    // ── Devices ──────────────────────────────────────────────────────

    /// Replace the device set wholesale and reconcile the selection.
    pub fn replace_agents(&self, agents: Vec<Agent>) {
        self.write(|| self.install_agents(agents));
    }

    /// [`replace_agents`](Self::replace_agents), unless `ticket` is stale.
    pub fn apply_agents(&self, ticket: Ticket, agents: Vec<Agent>) -> bool {
        self.write_if_current(ticket, || {
            self.install_agents(agents);
            true
        })
    }

    /// Remove one device locally, as after a successful delete.
    ///
    /// If it was selected, the configured [`SelectionFallback`] picks the
    /// replacement.
    pub fn remove_agent(&self, uuid: &str) -> bool {
        self.write(|| {
            let current = self.agents();
            if !current.iter().any(|a| a.uuid == uuid) {
                return false;
            }
            let remaining: Vec<Agent> = current
                .iter()
                .filter(|a| a.uuid != uuid)
                .map(|a| Agent::clone(a))
                .collect();
            self.install_agents(remaining);
            true
        })
        .unwrap_or(false)
    }

    /// Point the selection at `uuid`, or clear it with `None`.
    ///
    /// Returns `false` and leaves the selection unchanged when `uuid` is
    /// not in the current device set.
    pub fn set_selected(&self, uuid: Option<&str>) -> bool {
        self.write(|| self.try_select(uuid)).unwrap_or(false)
    }

    /// [`set_selected`](Self::set_selected), unless `ticket` is stale.
    pub fn apply_selected(&self, ticket: Ticket, uuid: Option<&str>) -> bool {
        self.write_if_current(ticket, || self.try_select(uuid))
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Overwrite the status snapshot. Ignored unless it belongs to the
    /// selected cradle.
    pub fn replace_status(&self, status: AgentStatus) -> bool {
        self.write(|| self.install_status(&status.agent_uuid.clone(), status))
            .unwrap_or(false)
    }

    /// Overwrite the status snapshot with the answer to a poll for
    /// `agent_uuid`, unless a newer poll was already answered or the
    /// selection moved on.
    pub fn apply_status(&self, ticket: Ticket, agent_uuid: &str, status: AgentStatus) -> bool {
        self.write(|| {
            if self.sequencer.complete(ticket) {
                self.install_status(agent_uuid, status)
            } else {
                debug!(seq = ticket.seq(), "discarding out-of-order status");
                false
            }
        })
        .unwrap_or(false)
    }

    pub fn clear_status(&self) {
        self.write(|| {
            self.status.send_replace(None);
        });
    }

    // ── Alerts ───────────────────────────────────────────────────────

    pub fn replace_alerts(&self, alerts: Vec<AlertLog>) {
        self.write(|| {
            self.alerts
                .send_replace(Arc::new(alerts.into_iter().map(Arc::new).collect()));
        });
    }

    pub fn apply_alerts(&self, ticket: Ticket, alerts: Vec<AlertLog>) -> bool {
        self.write_if_current(ticket, || {
            self.alerts
                .send_replace(Arc::new(alerts.into_iter().map(Arc::new).collect()));
            true
        })
    }

    // ── Alert settings ───────────────────────────────────────────────

    /// Record settings fetched (or saved) for `agent_uuid`. Ignored unless
    /// it is still selected and `ticket` is current.
    pub fn apply_settings(&self, ticket: Ticket, agent_uuid: &str, settings: AlertSettings) -> bool {
        self.write_if_current(ticket, || {
            if !self.is_selected(agent_uuid) {
                return false;
            }
            self.settings
                .send_replace(Some((agent_uuid.to_owned(), Arc::new(settings))));
            true
        })
    }

    // ── Internals ────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` under the write lock, unless the store has been closed.
    fn write<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let _guard = self.lock();
        if self.is_closed() {
            debug!("store closed; dropping write");
            return None;
        }
        Some(f())
    }

    fn write_if_current(&self, ticket: Ticket, f: impl FnOnce() -> bool) -> bool {
        self.write(|| {
            if self.sequencer.is_current(ticket) {
                self.sequencer.complete(ticket);
                f()
            } else {
                debug!(
                    resource = %ticket.resource(),
                    seq = ticket.seq(),
                    "discarding stale response"
                );
                false
            }
        })
        .unwrap_or(false)
    }

    fn is_selected(&self, uuid: &str) -> bool {
        self.selected
            .borrow()
            .as_ref()
            .is_some_and(|a| a.uuid == uuid)
    }

    fn install_agents(&self, agents: Vec<Agent>) {
        let agents: AgentSet = Arc::new(agents.into_iter().map(Arc::new).collect());

        let next = match self.selected_uuid() {
            Some(uuid) => agents
                .iter()
                .find(|a| a.uuid == uuid)
                .cloned()
                .or_else(|| match self.fallback {
                    SelectionFallback::FirstRemaining => agents.first().cloned(),
                    SelectionFallback::Clear => None,
                }),
            None => None,
        };

        self.agents.send_replace(agents);
        self.select(next);
    }

    fn try_select(&self, uuid: Option<&str>) -> bool {
        match uuid {
            None => {
                self.select(None);
                true
            }
            Some(uuid) => match self.agent(uuid) {
                Some(agent) => {
                    self.select(Some(agent));
                    true
                }
                None => false,
            },
        }
    }

    /// Install `next` as the selection. Moving to a different cradle drops
    /// the status and settings fetched for the previous one.
    fn select(&self, next: Option<Arc<Agent>>) {
        let next_uuid = next.as_ref().map(|a| a.uuid.clone());
        let previous = self.selected.send_replace(next);
        let previous_uuid = previous.as_ref().map(|a| a.uuid.as_str());

        if previous_uuid != next_uuid.as_deref() {
            debug!(from = ?previous_uuid, to = ?next_uuid, "selection changed");
            self.status.send_replace(None);
            self.settings.send_replace(None);
        }
    }

    fn install_status(&self, agent_uuid: &str, status: AgentStatus) -> bool {
        if !self.is_selected(agent_uuid) {
            debug!(agent_uuid, "status for unselected cradle; ignoring");
            return false;
        }
        self.status.send_replace(Some(Arc::new(status)));
        true
    }
}

impl Default for CradleStore {
    fn default() -> Self {
        Self::new(SelectionFallback::default())
    }
}
