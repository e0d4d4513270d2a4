#![allow(clippy::unwrap_used)]
// Status poller behaviour under paused Tokio time.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cradle_core::{
    Agent, AgentStatus, CoreError, CradleStore, PollerState, SelectionFallback, StatusPoller,
    StatusSource,
};

const PERIOD: Duration = Duration::from_secs(2);

// ── Fake source ─────────────────────────────────────────────────────

/// Counts calls; answers with the call number as the temperature after
/// a per-call delay (default: immediate).
#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
    delays: Mutex<VecDeque<Duration>>,
}

impl CountingSource {
    fn with_delays(delays: &[Duration]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delays: Mutex::new(delays.iter().copied().collect()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StatusSource for CountingSource {
    async fn fetch_status(&self, agent_uuid: &str) -> Result<AgentStatus, CoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(AgentStatus {
            agent_uuid: agent_uuid.to_owned(),
            temperature: Some(f64::from(u32::try_from(call).unwrap())),
            crying: None,
            direction: None,
            face_direction: None,
            last_direction_time: None,
            last_normal_face_time: None,
            last_update: None,
        })
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn agent(id: i64, uuid: &str) -> Agent {
    Agent {
        id,
        uuid: uuid.into(),
        ip: None,
        created_at: None,
        updated_at: None,
    }
}

fn store_with_selection(selected: Option<&str>) -> Arc<CradleStore> {
    let store = Arc::new(CradleStore::new(SelectionFallback::FirstRemaining));
    store.replace_agents(vec![agent(1, "a"), agent(2, "b")]);
    store.set_selected(selected);
    store
}

async fn advance(d: Duration) {
    tokio::time::sleep(d).await;
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_polls_immediately_then_every_period() {
    let source = Arc::new(CountingSource::default());
    let store = store_with_selection(Some("a"));
    let poller = StatusPoller::new(Arc::clone(&source), Arc::clone(&store), PERIOD);

    let guard = poller.activate();
    advance(Duration::from_millis(4_100)).await;

    assert_eq!(source.calls(), 3);
    assert_eq!(
        poller.state(),
        PollerState::Polling {
            agent_uuid: "a".into()
        }
    );
    assert_eq!(store.status().unwrap().temperature, Some(3.0));
    guard.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_no_calls_after_stop() {
    let source = Arc::new(CountingSource::default());
    let store = store_with_selection(Some("a"));
    let poller = StatusPoller::new(Arc::clone(&source), Arc::clone(&store), PERIOD);

    let guard = poller.activate();
    advance(Duration::from_millis(2_100)).await;
    guard.stop().await;
    let before = source.calls();
    assert!(before > 0);

    advance(PERIOD * 2).await;
    assert_eq!(source.calls(), before);
    assert_eq!(poller.state(), PollerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_guard_stops_polling() {
    let source = Arc::new(CountingSource::default());
    let store = store_with_selection(Some("a"));
    let poller = StatusPoller::new(Arc::clone(&source), Arc::clone(&store), PERIOD);

    let guard = poller.activate();
    advance(Duration::from_millis(100)).await;
    drop(guard);
    tokio::task::yield_now().await;
    let before = source.calls();

    advance(PERIOD * 2).await;
    assert_eq!(source.calls(), before);
}

#[tokio::test(start_paused = true)]
async fn test_response_after_stop_is_dropped() {
    let source = Arc::new(CountingSource::with_delays(&[Duration::from_secs(1)]));
    let store = store_with_selection(Some("a"));
    let poller = StatusPoller::new(Arc::clone(&source), Arc::clone(&store), PERIOD);

    let guard = poller.activate();
    advance(Duration::from_millis(500)).await;
    assert_eq!(source.calls(), 1);
    guard.stop().await;

    advance(PERIOD * 2).await;
    assert_eq!(store.status(), None);
}

#[tokio::test(start_paused = true)]
async fn test_idle_without_selection_then_follows_it() {
    let source = Arc::new(CountingSource::default());
    let store = store_with_selection(None);
    let poller = StatusPoller::new(Arc::clone(&source), Arc::clone(&store), PERIOD);

    let guard = poller.activate();
    advance(PERIOD * 3).await;
    assert_eq!(source.calls(), 0);
    assert_eq!(poller.state(), PollerState::Idle);

    store.set_selected(Some("b"));
    advance(Duration::from_millis(100)).await;
    assert_eq!(source.calls(), 1);
    assert_eq!(
        poller.state(),
        PollerState::Polling {
            agent_uuid: "b".into()
        }
    );

    store.set_selected(None);
    advance(Duration::from_millis(100)).await;
    assert_eq!(poller.state(), PollerState::Idle);
    let before = source.calls();
    advance(PERIOD * 2).await;
    assert_eq!(source.calls(), before);

    guard.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_slow_response_does_not_overwrite_newer() {
    // Call 1 takes 5s, call 2 takes 0.5s, call 3 never lands in time.
    let source = Arc::new(CountingSource::with_delays(&[
        Duration::from_secs(5),
        Duration::from_millis(500),
        Duration::from_secs(60),
    ]));
    let store = store_with_selection(Some("a"));
    let poller = StatusPoller::new(Arc::clone(&source), Arc::clone(&store), PERIOD);

    let guard = poller.activate();

    // t=2.6: call 2 has answered, call 1 is still in flight.
    advance(Duration::from_millis(2_600)).await;
    assert_eq!(store.status().unwrap().temperature, Some(2.0));

    // t=5.6: call 1 answered late and was discarded.
    advance(Duration::from_secs(3)).await;
    assert_eq!(store.status().unwrap().temperature, Some(2.0));

    guard.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_status_is_total_overwrite() {
    struct Scripted {
        calls: AtomicUsize,
    }

    impl StatusSource for Scripted {
        async fn fetch_status(&self, agent_uuid: &str) -> Result<AgentStatus, CoreError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let (temperature, crying) = if call == 0 {
                (Some(36.5), Some("none".to_owned()))
            } else {
                (None, Some("Crying".to_owned()))
            };
            Ok(AgentStatus {
                agent_uuid: agent_uuid.to_owned(),
                temperature,
                crying,
                direction: None,
                face_direction: None,
                last_direction_time: None,
                last_normal_face_time: None,
                last_update: None,
            })
        }
    }

    let source = Arc::new(Scripted {
        calls: AtomicUsize::new(0),
    });
    let store = store_with_selection(Some("a"));
    let poller = StatusPoller::new(source, Arc::clone(&store), PERIOD);

    let guard = poller.activate();
    advance(Duration::from_millis(100)).await;
    assert_eq!(store.status().unwrap().temperature, Some(36.5));

    advance(PERIOD).await;
    let status = store.status().unwrap();
    assert_eq!(status.temperature, None);
    assert_eq!(status.crying.as_deref(), Some("Crying"));

    guard.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_failures_are_skipped() {
    struct Failing {
        calls: AtomicUsize,
    }

    impl StatusSource for Failing {
        async fn fetch_status(&self, _agent_uuid: &str) -> Result<AgentStatus, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(CoreError::Timeout { timeout_secs: 10 })
        }
    }

    let source = Arc::new(Failing {
        calls: AtomicUsize::new(0),
    });
    let store = store_with_selection(Some("a"));
    let poller = StatusPoller::new(Arc::clone(&source), Arc::clone(&store), PERIOD);

    let guard = poller.activate();
    advance(Duration::from_millis(4_100)).await;

    // Kept ticking through failures; nothing written.
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    assert_eq!(store.status(), None);
    guard.stop().await;
}
