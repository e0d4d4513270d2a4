#![allow(clippy::unwrap_used)]
// Integration tests for `CradleClient` using wiremock.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cradle_api::{
    AlertSettingsUpdate, AlertType, CradleClient, Error, MotorAction, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CradleClient) {
    let server = MockServer::start().await;
    let client = client_for(&server.uri(), Duration::from_secs(10));
    (server, client)
}

fn client_for(base: &str, timeout: Duration) -> CradleClient {
    let transport = TransportConfig::default().with_timeout(timeout);
    CradleClient::new(Url::parse(base).unwrap(), &transport).unwrap()
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "username": "mom", "password": "pw1234" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc123; Path=/")
                .set_body_json(json!({
                    "success": true,
                    "user": { "id": 7, "username": "mom" }
                })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.login("mom", &secret("pw1234")).await.unwrap();
    assert!(resp.success);
    assert_eq!(resp.user.unwrap().username, "mom");

    let agents = client.list_agents().await.unwrap();
    assert!(agents.is_empty());
}

#[tokio::test]
async fn test_login_rejected_in_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "비밀번호가 틀렸습니다"
        })))
        .mount(&server)
        .await;

    let err = client.login("mom", &secret("nope")).await.unwrap_err();
    match err {
        Error::Authentication { message } => assert_eq!(message, "비밀번호가 틀렸습니다"),
        other => panic!("expected Authentication, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_unauthorized_status_is_not_session_expiry() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "success": false, "message": "unknown user" })),
        )
        .mount(&server)
        .await;

    let err = client.login("ghost", &secret("pw")).await.unwrap_err();
    assert!(
        matches!(&err, Error::Authentication { message } if message == "unknown user"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_register_user_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "username taken"
        })))
        .mount(&server)
        .await;

    let err = client.register_user("mom", &secret("pw1234")).await.unwrap_err();
    assert_eq!(err.server_message(), Some("username taken"));
}

#[tokio::test]
async fn test_check_username() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/check_username/mom"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "exists": true })))
        .mount(&server)
        .await;

    assert!(client.check_username("mom").await.unwrap());
}

#[tokio::test]
async fn test_logout_accepts_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await.unwrap();
}

// ── Agents ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_agents() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "uuid": "8f14e45f-ceea-467f-a0e6-7c5f0e1b2a3d",
                "ip": "192.168.0.21",
                "created_at": "2025-03-01T09:00:00",
                "updated_at": "2025-03-02T09:00:00"
            },
            { "id": 2, "uuid": "c9f0f895-fb98-4b91-9e2b-1d0a6f5c7e88", "created_at": null }
        ])))
        .mount(&server)
        .await;

    let agents = client.list_agents().await.unwrap();
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[0].ip.as_deref(), Some("192.168.0.21"));
    assert_eq!(agents[1].uuid, "c9f0f895-fb98-4b91-9e2b-1d0a6f5c7e88");
    assert_eq!(agents[1].ip, None);
}

#[tokio::test]
async fn test_expired_session_maps_to_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.list_agents().await.unwrap_err();
    assert!(err.is_auth_expired(), "got {err:?}");
}

#[tokio::test]
async fn test_register_cradle_sends_uuid() {
    let (server, client) = setup().await;
    let uuid = "8f14e45f-ceea-467f-a0e6-7c5f0e1b2a3d";

    Mock::given(method("POST"))
        .and(path("/register_cradle"))
        .and(body_json(json!({ "cradle_uuid": uuid })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "agent": { "id": 5, "uuid": uuid, "ip": "10.0.0.5" }
        })))
        .mount(&server)
        .await;

    let resp = client.register_cradle(uuid).await.unwrap();
    assert_eq!(resp.agent.unwrap().id, 5);
}

#[tokio::test]
async fn test_register_cradle_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/register_cradle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "이미 등록된 요람입니다"
        })))
        .mount(&server)
        .await;

    let err = client.register_cradle("dup").await.unwrap_err();
    assert!(matches!(err, Error::Rejected { .. }));
    assert_eq!(err.server_message(), Some("이미 등록된 요람입니다"));
}

#[tokio::test]
async fn test_select_and_delete_cradle() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/select_cradle"))
        .and(body_json(json!({ "uuid": "u-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/delete_cradle"))
        .and(body_json(json!({ "uuid": "u-1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "error", "message": "not yours" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.select_cradle("u-1").await.unwrap();
    let err = client.delete_cradle("u-1").await.unwrap_err();
    assert_eq!(err.server_message(), Some("not yours"));
}

#[tokio::test]
async fn test_agent_status_with_missing_readings() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/agent_status/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "agent_uuid": "u-1",
            "temperature": null,
            "crying": "Crying",
            "face_direction": "정면 유지 중",
            "last_update": "2025-03-02 10:00:01"
        })))
        .mount(&server)
        .await;

    let status = client.agent_status("u-1").await.unwrap();
    assert_eq!(status.temperature, None);
    assert_eq!(status.crying.as_deref(), Some("Crying"));
    assert_eq!(status.direction, None);
    assert_eq!(status.last_update.as_deref(), Some("2025-03-02 10:00:01"));
}

// ── Alerts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_alert_logs_parse_types() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alert_logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 10,
                "agent_uuid": "u-1",
                "alert_type": "high_temperature",
                "alert_message": "38.4°C",
                "temperature": 38.4,
                "face_detected": null,
                "resolved": false,
                "created_at": "2025-03-02T10:00:00",
                "resolved_at": null
            },
            {
                "id": 11,
                "alert_type": "door_open",
                "alert_message": "",
                "message": "legacy text",
                "resolved": true,
                "created_at": "2025-03-02T11:00:00",
                "resolved_at": "2025-03-02T11:05:00"
            }
        ])))
        .mount(&server)
        .await;

    let alerts = client.alert_logs().await.unwrap();
    assert_eq!(alerts[0].alert_type, AlertType::HighTemperature);
    assert_eq!(alerts[0].temperature, Some(38.4));
    assert_eq!(alerts[1].alert_type, AlertType::Other("door_open".into()));
    assert_eq!(alerts[1].text(), "legacy text");
    assert!(alerts[1].resolved);
}

#[tokio::test]
async fn test_resolve_alert() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/alert_logs/10/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.resolve_alert(10).await.unwrap();
}

#[tokio::test]
async fn test_alert_detail() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alert_detail/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "alert": {
                "id": 10,
                "alert_type": "face_not_detected",
                "alert_message": "face lost",
                "resolved": false,
                "created_at": "2025-03-02T10:00:00"
            },
            "sensor_data": [
                { "timestamp": "2025-03-02T09:59:58", "temperature": 36.6 }
            ],
            "video_frames": [
                { "id": 300, "timestamp": "2025-03-02T09:59:59" },
                { "id": 301, "timestamp": "2025-03-02T10:00:00" }
            ],
            "total_frames": 2
        })))
        .mount(&server)
        .await;

    let detail = client.alert_detail(10).await.unwrap();
    assert_eq!(detail.alert.alert_type, AlertType::FaceNotDetected);
    assert_eq!(detail.sensor_data.len(), 1);
    assert_eq!(detail.video_frames[1].id, 301);
    assert_eq!(detail.total_frames, 2);
}

#[tokio::test]
async fn test_update_alert_settings_sends_only_present_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/alert_settings/u-1"))
        .and(body_json(json!({ "max_temperature": 37.5 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let update = AlertSettingsUpdate {
        max_temperature: Some(37.5),
        ..AlertSettingsUpdate::default()
    };
    client.update_alert_settings("u-1", &update).await.unwrap();
}

#[tokio::test]
async fn test_alert_settings() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alert_settings/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "max_temperature": 38.0,
            "abnormal_position_timeout": 45,
            "crying_duration_threshold": 20,
            "push_notifications_enabled": true,
            "email_notifications_enabled": false
        })))
        .mount(&server)
        .await;

    let settings = client.alert_settings("u-1").await.unwrap();
    assert_eq!(settings.abnormal_position_timeout, 45);
    assert_eq!(settings.crying_duration_threshold, 20);
}

// ── Sensors / control ───────────────────────────────────────────────

#[tokio::test]
async fn test_sensor_data_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensor_data/u-1"))
        .and(query_param("start_date", "2025-03-01T00:00:00.000Z"))
        .and(query_param("end_date", "2025-03-02T00:00:00.000Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "timestamp": "2025-03-01T01:00:00", "temperature": 36.5, "crying": "none" }
        ])))
        .mount(&server)
        .await;

    let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
    let samples = client.sensor_data("u-1", start, end).await.unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].temperature, Some(36.5));
}

#[tokio::test]
async fn test_control_motor() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/control_motor/u-1"))
        .and(body_json(json!({ "action": "start" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.control_motor("u-1", MotorAction::Start).await.unwrap();
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_carries_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/control_motor/u-1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "motor offline" })))
        .mount(&server)
        .await;

    let err = client
        .control_motor("u-1", MotorAction::Stop)
        .await
        .unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "motor offline");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_without_body_uses_reason() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alert_detail/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.alert_detail(404).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.server_message(), Some("Not Found"));
}

#[tokio::test]
async fn test_timeout_is_connectivity() {
    let server = MockServer::start().await;
    let client = client_for(&server.uri(), Duration::from_secs(1));

    Mock::given(method("GET"))
        .and(path("/api/agent_status/u-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_json(json!({ "agent_uuid": "u-1" })),
        )
        .mount(&server)
        .await;

    let err = client.agent_status("u-1").await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_secs: 1 }), "got {err:?}");
    assert!(err.is_connectivity());
}

#[tokio::test]
async fn test_unreachable_server_is_connectivity() {
    let client = client_for("http://127.0.0.1:9", Duration::from_secs(2));
    let err = client.list_agents().await.unwrap_err();
    assert!(err.is_connectivity(), "got {err:?}");
}

#[tokio::test]
async fn test_bad_json_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.list_agents().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization, got {other:?}"),
    }
}

// ── URL builders ────────────────────────────────────────────────────

#[test]
fn test_media_urls() {
    let client = client_for("http://www.smartcradle.kro.kr", Duration::from_secs(10));

    assert_eq!(
        client.stream_url("u-1").unwrap().as_str(),
        "http://www.smartcradle.kro.kr/stream/u-1"
    );
    assert_eq!(
        client.alert_frame_url(301).unwrap().as_str(),
        "http://www.smartcradle.kro.kr/api/alert_frame/301"
    );
    assert_eq!(
        client.video_url("u-1", "2025-03-02", "10:00").unwrap().as_str(),
        "http://www.smartcradle.kro.kr/api/video/u-1?date=2025-03-02&time=10%3A00"
    );
}
