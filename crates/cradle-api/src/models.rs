// Cradle service request/response types
//
// Fields use `#[serde(default)]` liberally: the service omits nullable
// fields instead of sending `null` on some endpoints, and older agents
// never report face-direction data at all.

use serde::{Deserialize, Serialize};

// ── Generic acknowledgement ──────────────────────────────────────────

/// Loose acknowledgement body returned by the mutation endpoints.
///
/// The service is not consistent about its shape; all of these occur:
/// ```json
/// { "success": true }
/// { "success": false, "message": "..." }
/// { "status": "error", "message": "..." }
/// { "error": "..." }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    /// `true` when the body reports failure despite a 2xx status.
    pub fn is_rejected(&self) -> bool {
        self.success == Some(false) || self.status.as_deref() == Some("error")
    }

    /// Best available human-readable message.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

// ── Accounts ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Body of `GET /check_username/{username}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UsernameCheck {
    pub exists: bool,
}

// ── Agents (cradle units) ────────────────────────────────────────────

/// A registered cradle unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub uuid: String,
    /// Last network address the agent reported.
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /register_cradle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCradleResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub agent: Option<Agent>,
}

/// Point-in-time sensor readings for one agent (`GET /api/agent_status/{uuid}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub agent_uuid: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Cry-detection label, e.g. `"Crying"`.
    #[serde(default)]
    pub crying: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    /// Face-direction label as produced by the agent's vision model.
    #[serde(default)]
    pub face_direction: Option<String>,
    #[serde(default)]
    pub last_direction_time: Option<String>,
    #[serde(default)]
    pub last_normal_face_time: Option<String>,
    /// Server-side timestamp of the last sample.
    #[serde(default)]
    pub last_update: Option<String>,
}

/// One row of `GET /api/sensor_data/{uuid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub timestamp: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub crying: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
}

// ── Alerts ───────────────────────────────────────────────────────────

/// Alert type tag. Unknown tags are preserved in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertType {
    HighTemperature,
    FaceNotDetected,
    AbnormalPosition,
    Other(String),
}

impl AlertType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::HighTemperature => "high_temperature",
            Self::FaceNotDetected => "face_not_detected",
            Self::AbnormalPosition => "abnormal_position",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for AlertType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "high_temperature" => Self::HighTemperature,
            "face_not_detected" => Self::FaceNotDetected,
            "abnormal_position" => Self::AbnormalPosition,
            _ => Self::Other(tag),
        }
    }
}

impl From<AlertType> for String {
    fn from(t: AlertType) -> Self {
        match t {
            AlertType::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server-raised alert. Alert logs and alert history share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertLog {
    pub id: i64,
    #[serde(default)]
    pub agent_uuid: Option<String>,
    pub alert_type: AlertType,
    #[serde(default)]
    pub alert_message: String,
    /// Older servers send the text here instead of `alert_message`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub face_detected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_sent: Option<bool>,
    #[serde(default)]
    pub resolved: bool,
    pub created_at: String,
    #[serde(default)]
    pub resolved_at: Option<String>,
}

impl AlertLog {
    /// Human-readable alert text, whichever field the server filled.
    pub fn text(&self) -> &str {
        if self.alert_message.is_empty() {
            self.message.as_deref().unwrap_or_default()
        } else {
            &self.alert_message
        }
    }
}

/// A captured video frame attached to an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFrameInfo {
    pub id: i64,
    pub timestamp: String,
}

/// Body of `GET /api/alert_detail/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertDetail {
    pub alert: AlertLog,
    #[serde(default)]
    pub sensor_data: Vec<SensorSample>,
    #[serde(default)]
    pub video_frames: Vec<VideoFrameInfo>,
    #[serde(default)]
    pub total_frames: u32,
}

// ── Alert settings ───────────────────────────────────────────────────

/// Per-agent alert configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Temperature ceiling in °C.
    pub max_temperature: f64,
    /// Seconds in an abnormal position before alerting.
    pub abnormal_position_timeout: u32,
    /// Seconds of continuous crying before alerting.
    pub crying_duration_threshold: u32,
    pub push_notifications_enabled: bool,
    pub email_notifications_enabled: bool,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            max_temperature: 38.0,
            abnormal_position_timeout: 30,
            crying_duration_threshold: 30,
            push_notifications_enabled: true,
            email_notifications_enabled: false,
        }
    }
}

impl AlertSettings {
    /// Return a copy with every field present in `update` overwritten.
    pub fn merged(&self, update: &AlertSettingsUpdate) -> Self {
        Self {
            max_temperature: update.max_temperature.unwrap_or(self.max_temperature),
            abnormal_position_timeout: update
                .abnormal_position_timeout
                .unwrap_or(self.abnormal_position_timeout),
            crying_duration_threshold: update
                .crying_duration_threshold
                .unwrap_or(self.crying_duration_threshold),
            push_notifications_enabled: update
                .push_notifications_enabled
                .unwrap_or(self.push_notifications_enabled),
            email_notifications_enabled: update
                .email_notifications_enabled
                .unwrap_or(self.email_notifications_enabled),
        }
    }
}

/// Partial settings body for `POST /api/alert_settings/{uuid}`.
/// Absent fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertSettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abnormal_position_timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crying_duration_threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_notifications_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_notifications_enabled: Option<bool>,
}

impl AlertSettingsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<AlertSettings> for AlertSettingsUpdate {
    fn from(s: AlertSettings) -> Self {
        Self {
            max_temperature: Some(s.max_temperature),
            abnormal_position_timeout: Some(s.abnormal_position_timeout),
            crying_duration_threshold: Some(s.crying_duration_threshold),
            push_notifications_enabled: Some(s.push_notifications_enabled),
            email_notifications_enabled: Some(s.email_notifications_enabled),
        }
    }
}

// ── Motor control ────────────────────────────────────────────────────

/// Rocking motor command for `POST /control_motor/{uuid}`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MotorAction {
    Start,
    Stop,
}
