#![allow(clippy::unwrap_used)]
// End-to-end `Monitor` flows against a wiremock service.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cradle_core::{
    AlertSettingsUpdate, CoreError, ErrorKind, Monitor, MonitorConfig, MotorAction,
    SelectionFallback,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

fn config(server: &MockServer) -> MonitorConfig {
    MonitorConfig::new(Url::parse(&server.uri()).unwrap()).with_credentials("mom", secret("pw1234"))
}

fn agents_json(uuids: &[&str]) -> Value {
    Value::Array(
        uuids
            .iter()
            .zip(1..)
            .map(|(uuid, id)| json!({ "id": id, "uuid": uuid, "ip": "10.0.0.1" }))
            .collect(),
    )
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": { "id": 7, "username": "mom" }
        })))
        .mount(server)
        .await;
}

/// Serve `uuids` from `GET /api/agents`, `times` times (or forever).
async fn mount_agents(server: &MockServer, uuids: &[&str], times: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(agents_json(uuids)));
    let mock = match times {
        Some(n) => mock.up_to_n_times(n),
        None => mock,
    };
    mock.mount(server).await;
}

async fn mount_ack(server: &MockServer, route: &str) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(server)
        .await;
}

/// A monitor that is logged in with `uuids` loaded and nothing selected.
async fn logged_in(server: &MockServer, cfg: MonitorConfig, uuids: &[&str]) -> Monitor {
    mount_login(server).await;
    mount_agents(server, uuids, Some(1)).await;
    let monitor = Monitor::new(cfg).unwrap();
    monitor.login("mom", &secret("pw1234")).await.unwrap();
    monitor.refresh_agents().await.unwrap();
    monitor
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_sets_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let monitor = Monitor::new(config(&server)).unwrap();

    let user = monitor.login("mom", &secret("pw1234")).await.unwrap();
    assert_eq!(user.username, "mom");
    assert!(monitor.store().is_authenticated());
}

#[tokio::test]
async fn test_invalid_login_leaves_session_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "아이디 또는 비밀번호가 올바르지 않습니다"
        })))
        .mount(&server)
        .await;
    let monitor = Monitor::new(config(&server)).unwrap();

    let err = monitor.login("mom", &secret("wrong")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(
        err.server_message(),
        Some("아이디 또는 비밀번호가 올바르지 않습니다")
    );
    assert!(!monitor.store().is_authenticated());
}

#[tokio::test]
async fn test_empty_credentials_never_reach_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let monitor = Monitor::new(config(&server)).unwrap();

    let err = monitor.login("", &secret("pw")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_register_user_checks_confirmation_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let monitor = Monitor::new(config(&server)).unwrap();

    let err = monitor
        .register_user("mom", &secret("1234"), &secret("12345"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { field: "password", .. }));
}

#[tokio::test]
async fn test_calls_without_session_are_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let monitor = Monitor::new(config(&server)).unwrap();

    let err = monitor.refresh_agents().await.unwrap_err();
    assert!(matches!(err, CoreError::NotAuthenticated));
}

#[tokio::test]
async fn test_expired_session_clears_session() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a"]).await;

    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = monitor.refresh_agents().await.unwrap_err();
    assert!(matches!(err, CoreError::SessionExpired));
    assert!(!monitor.store().is_authenticated());
}

#[tokio::test]
async fn test_logout_resets_store() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a"]).await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    monitor.logout().await.unwrap();
    assert!(!monitor.store().is_authenticated());
    assert!(monitor.store().agents().is_empty());
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_register_agent_selects_new_device() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a"]).await;

    Mock::given(method("POST"))
        .and(path("/register_cradle"))
        .and(body_json(json!({ "cradle_uuid": "new-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "agent": { "id": 2, "uuid": "new-1" }
        })))
        .mount(&server)
        .await;
    mount_agents(&server, &["a", "new-1"], None).await;

    let agent = monitor.register_agent("  new-1 ").await.unwrap();
    assert_eq!(agent.uuid, "new-1");
    assert_eq!(monitor.store().selected_uuid().as_deref(), Some("new-1"));

    let agents = monitor.store().agents();
    assert_eq!(agents.iter().filter(|a| a.uuid == "new-1").count(), 1);
}

#[tokio::test]
async fn test_select_unknown_agent_is_rejected_without_network() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a", "b"]).await;
    Mock::given(method("POST"))
        .and(path("/select_cradle"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = monitor.select_agent("zzz").await.unwrap_err();
    assert!(matches!(err, CoreError::AgentNotFound { ref uuid } if uuid == "zzz"));
    assert_eq!(monitor.store().selected(), None);
}

#[tokio::test]
async fn test_select_agent() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a", "b"]).await;
    mount_ack(&server, "/select_cradle").await;

    monitor.select_agent("b").await.unwrap();
    assert_eq!(monitor.store().selected_uuid().as_deref(), Some("b"));
}

#[tokio::test]
async fn test_failed_select_keeps_previous_selection() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a", "b"]).await;
    monitor.store().set_selected(Some("a"));

    Mock::given(method("POST"))
        .and(path("/select_cradle"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
        .mount(&server)
        .await;

    let err = monitor.select_agent("b").await.unwrap_err();
    assert_eq!(err.server_message(), Some("db down"));
    assert_eq!(monitor.store().selected_uuid().as_deref(), Some("a"));
}

#[tokio::test]
async fn test_delete_selected_falls_back_to_first_remaining() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a", "b", "c"]).await;
    monitor.store().set_selected(Some("b"));

    mount_ack(&server, "/delete_cradle").await;
    mount_agents(&server, &["a", "c"], None).await;

    monitor.delete_agent("b").await.unwrap();
    assert_eq!(monitor.store().selected_uuid().as_deref(), Some("a"));
    assert_eq!(monitor.store().agents().len(), 2);
}

#[tokio::test]
async fn test_delete_selected_clears_when_configured() {
    let server = MockServer::start().await;
    let mut cfg = config(&server);
    cfg.selection_fallback = SelectionFallback::Clear;
    let monitor = logged_in(&server, cfg, &["a", "b"]).await;
    monitor.store().set_selected(Some("b"));

    mount_ack(&server, "/delete_cradle").await;
    mount_agents(&server, &["a"], None).await;

    monitor.delete_agent("b").await.unwrap();
    assert_eq!(monitor.store().selected(), None);
}

// ── Status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_status_requires_selection() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a", "b"]).await;

    let err = monitor.refresh_status().await.unwrap_err();
    assert!(matches!(err, CoreError::NoAgentSelected));
}

#[tokio::test]
async fn test_refresh_status_overwrites_snapshot() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a"]).await;
    monitor.store().set_selected(Some("a"));

    Mock::given(method("GET"))
        .and(path("/api/agent_status/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "agent_uuid": "a", "temperature": 36.5, "crying": "none"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/agent_status/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "agent_uuid": "a", "temperature": null, "crying": "Crying"
        })))
        .mount(&server)
        .await;

    monitor.refresh_status().await.unwrap();
    monitor.refresh_status().await.unwrap();

    let status = monitor.store().status().unwrap();
    assert_eq!(status.temperature, None);
    assert_eq!(status.crying.as_deref(), Some("Crying"));
}

// ── Alerts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_resolve_alert_refetches_list() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a"]).await;

    Mock::given(method("POST"))
        .and(path("/api/alert_logs/10/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/alert_logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 10,
            "alert_type": "high_temperature",
            "alert_message": "38.2°C",
            "resolved": true,
            "created_at": "2025-03-02T10:00:00",
            "resolved_at": "2025-03-02T10:05:00"
        }])))
        .expect(2)
        .mount(&server)
        .await;

    let alerts = monitor.resolve_alert(10).await.unwrap();
    assert!(alerts[0].resolved);

    // Resolving again is harmless and leaves the timestamp alone.
    let again = monitor.resolve_alert(10).await.unwrap();
    assert_eq!(again[0].resolved_at.as_deref(), Some("2025-03-02T10:05:00"));
    assert_eq!(monitor.store().alerts().len(), 1);
}

#[tokio::test]
async fn test_update_settings_merges_into_cached() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a"]).await;
    monitor.store().set_selected(Some("a"));

    Mock::given(method("GET"))
        .and(path("/api/alert_settings/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "max_temperature": 38.0,
            "abnormal_position_timeout": 30,
            "crying_duration_threshold": 30,
            "push_notifications_enabled": true,
            "email_notifications_enabled": false
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/alert_settings/a"))
        .and(body_json(json!({ "crying_duration_threshold": 60 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    monitor.alert_settings().await.unwrap();
    let saved = monitor
        .update_alert_settings(&AlertSettingsUpdate {
            crying_duration_threshold: Some(60),
            ..AlertSettingsUpdate::default()
        })
        .await
        .unwrap();

    assert_eq!(saved.crying_duration_threshold, 60);
    assert_eq!(saved.abnormal_position_timeout, 30);
    assert_eq!(*monitor.store().settings().unwrap(), saved);
}

#[tokio::test]
async fn test_motor_control_targets_selection() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a", "b"]).await;
    monitor.store().set_selected(Some("b"));

    Mock::given(method("POST"))
        .and(path("/control_motor/b"))
        .and(body_json(json!({ "action": "stop" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    monitor.control_motor(MotorAction::Stop).await.unwrap();
}

#[tokio::test]
async fn test_stream_url_uses_selection() {
    let server = MockServer::start().await;
    let monitor = logged_in(&server, config(&server), &["a"]).await;

    assert!(matches!(monitor.stream_url(), Err(CoreError::NoAgentSelected)));
    monitor.store().set_selected(Some("a"));
    assert_eq!(
        monitor.stream_url().unwrap().as_str(),
        format!("{}/stream/a", server.uri())
    );
}

// ── One-shot ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_oneshot_connects_runs_and_logs_out() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_agents(&server, &["a", "b"], None).await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut cfg = config(&server);
    cfg.preferred_agent = Some("b".into());

    let selected = Monitor::oneshot(cfg, |monitor| async move {
        Ok(monitor.store().selected_uuid())
    })
    .await
    .unwrap();
    assert_eq!(selected.as_deref(), Some("b"));
}

#[tokio::test]
async fn test_oneshot_without_credentials_fails() {
    let server = MockServer::start().await;
    let cfg = MonitorConfig::new(Url::parse(&server.uri()).unwrap());

    let result = Monitor::oneshot(cfg, |_| async { Ok(()) }).await;
    assert!(matches!(result, Err(CoreError::Config { .. })));
}
