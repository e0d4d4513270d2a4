// ── Status poller ──
//
// Fixed-period refresher for the selected cradle's status snapshot.
// Activation hands back a `PollGuard`; the background task lives exactly
// as long as the guard. Ticks never wait for the previous response, so
// several fetches can be in flight; the sequencer decides which of them
// may still write.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use cradle_api::{AgentStatus, CradleClient};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::DEFAULT_POLL_INTERVAL;
use crate::error::CoreError;
use crate::sequence::{Resource, Ticket};
use crate::store::CradleStore;

// ── StatusSource ─────────────────────────────────────────────────

/// Anything that can fetch one status snapshot.
pub trait StatusSource: Send + Sync + 'static {
    fn fetch_status(
        &self,
        agent_uuid: &str,
    ) -> impl Future<Output = Result<AgentStatus, CoreError>> + Send;
}

impl StatusSource for CradleClient {
    async fn fetch_status(&self, agent_uuid: &str) -> Result<AgentStatus, CoreError> {
        Ok(self.agent_status(agent_uuid).await?)
    }
}

// ── PollerState ──────────────────────────────────────────────────

/// Observable poller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerState {
    /// Not activated, or activated with nothing selected.
    Idle,
    /// Fetching the given cradle's status every period.
    Polling { agent_uuid: String },
}

// ── StatusPoller ─────────────────────────────────────────────────

/// Polls the selected cradle while a [`PollGuard`] is held.
pub struct StatusPoller<S: StatusSource> {
    source: Arc<S>,
    store: Arc<CradleStore>,
    period: Duration,
    state: Arc<watch::Sender<PollerState>>,
    active: Arc<Mutex<Option<CancellationToken>>>,
}

impl<S: StatusSource> StatusPoller<S> {
    /// A zero `period` falls back to [`DEFAULT_POLL_INTERVAL`].
    pub fn new(source: Arc<S>, store: Arc<CradleStore>, period: Duration) -> Self {
        let period = if period.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            period
        };
        let (state, _) = watch::channel(PollerState::Idle);
        Self {
            source,
            store,
            period,
            state: Arc::new(state),
            active: Arc::new(Mutex::new(None)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> PollerState {
        self.state.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<PollerState> {
        self.state.subscribe()
    }

    /// Start polling. Must be called from within a Tokio runtime.
    ///
    /// A previous activation of this poller, if still running, is cancelled
    /// first: one poller never drives two loops.
    pub fn activate(&self) -> PollGuard {
        let cancel = CancellationToken::new();
        {
            let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = active.replace(cancel.clone()) {
                previous.cancel();
            }
        }

        let task = tokio::spawn(poll_task(
            Arc::clone(&self.source),
            Arc::clone(&self.store),
            self.period,
            Arc::clone(&self.state),
            Arc::clone(&self.active),
            cancel.clone(),
        ));

        debug!(period_ms = self.period.as_millis(), "status poller activated");
        PollGuard {
            cancel,
            task: Some(task),
        }
    }
}

// ── PollGuard ────────────────────────────────────────────────────

/// Keeps the poller running. Dropping it stops the loop and aborts any
/// fetch still in flight.
#[must_use = "polling stops as soon as the guard is dropped"]
pub struct PollGuard {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollGuard {
    /// Stop polling and wait for the background task to wind down.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Background task ──────────────────────────────────────────────

type Fetched = (Ticket, String, Result<AgentStatus, CoreError>);

async fn poll_task<S: StatusSource>(
    source: Arc<S>,
    store: Arc<CradleStore>,
    period: Duration,
    state: Arc<watch::Sender<PollerState>>,
    active: Arc<Mutex<Option<CancellationToken>>>,
    cancel: CancellationToken,
) {
    let mut selected = store.subscribe_selected();
    let mut target = selected.borrow_and_update().as_ref().map(|a| a.uuid.clone());
    publish(&state, target.as_deref());

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight: JoinSet<Fetched> = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = selected.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = selected.borrow_and_update().as_ref().map(|a| a.uuid.clone());
                if next != target {
                    target = next;
                    publish(&state, target.as_deref());
                    ticker.reset_immediately();
                }
            }
            _ = ticker.tick(), if target.is_some() => {
                if let Some(uuid) = target.clone() {
                    let ticket = store.begin(Resource::Status);
                    let source = Arc::clone(&source);
                    in_flight.spawn(async move {
                        let result = source.fetch_status(&uuid).await;
                        (ticket, uuid, result)
                    });
                }
            }
            Some(joined) = in_flight.join_next() => {
                match joined {
                    Ok((ticket, uuid, result)) => apply(&store, ticket, &uuid, result),
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => warn!(error = %e, "status fetch task failed"),
                }
            }
        }
    }

    in_flight.abort_all();

    // A newer activation owns the state from here on.
    let superseded = active
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|token| !token.is_cancelled());
    if !superseded {
        state.send_replace(PollerState::Idle);
    }
    debug!("status poller stopped");
}

fn apply(store: &CradleStore, ticket: Ticket, uuid: &str, result: Result<AgentStatus, CoreError>) {
    match result {
        Ok(status) => {
            store.apply_status(ticket, uuid, status);
        }
        Err(CoreError::SessionExpired) => {
            warn!(agent_uuid = uuid, "status poll rejected: session expired");
            store.set_session(None);
        }
        Err(e) => warn!(agent_uuid = uuid, error = %e, "status poll failed"),
    }
}

fn publish(state: &watch::Sender<PollerState>, target: Option<&str>) {
    let next = match target {
        Some(uuid) => PollerState::Polling {
            agent_uuid: uuid.to_owned(),
        },
        None => PollerState::Idle,
    };
    state.send_if_modified(|current| {
        if *current == next {
            false
        } else {
            *current = next;
            true
        }
    });
}
