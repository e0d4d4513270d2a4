// ── Presentation helpers ──
//
// Classification of raw readings for display. These carry no state and
// make no decisions the service has not already made; they only bucket
// values so every front end colours them the same way.

use cradle_api::AlertType;

/// Temperature band of a reading, in °C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TemperatureLevel {
    /// Below 37.0.
    Normal,
    /// 37.0 up to (not including) 38.0.
    Elevated,
    /// 38.0 and above.
    High,
    /// No reading.
    Unknown,
}

impl TemperatureLevel {
    pub const ELEVATED_AT: f64 = 37.0;
    pub const HIGH_AT: f64 = 38.0;

    pub fn classify(temperature: Option<f64>) -> Self {
        match temperature {
            Some(t) if t.is_nan() => Self::Unknown,
            Some(t) if t >= Self::HIGH_AT => Self::High,
            Some(t) if t >= Self::ELEVATED_AT => Self::Elevated,
            Some(_) => Self::Normal,
            None => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Elevated => "slightly high",
            Self::High => "high - needs attention",
            Self::Unknown => "no data",
        }
    }
}

/// Face-direction reading as reported by the cradle's vision model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum PostureLevel {
    /// Facing up.
    Normal,
    /// Turned away, but the face is still tracked.
    Warning,
    /// Face not recognised.
    Lost,
    Unknown,
}

impl PostureLevel {
    const FACING_UP: &'static str = "정면 유지 중";
    const NOT_RECOGNISED: &'static str = "인식";

    pub fn classify(direction: Option<&str>) -> Self {
        match direction {
            None | Some("") => Self::Unknown,
            Some(d) if d == Self::FACING_UP => Self::Normal,
            Some(d) if d.contains(Self::NOT_RECOGNISED) => Self::Lost,
            Some(_) => Self::Warning,
        }
    }
}

/// Display helpers for [`AlertType`].
pub trait AlertTypeExt {
    /// Short human-readable name.
    fn label(&self) -> &'static str;
    /// Whether the alert demands immediate attention.
    fn is_critical(&self) -> bool;
}

impl AlertTypeExt for AlertType {
    fn label(&self) -> &'static str {
        match self {
            AlertType::HighTemperature => "High temperature",
            AlertType::FaceNotDetected => "Face not detected",
            AlertType::AbnormalPosition => "Abnormal position",
            AlertType::Other(_) => "Alert",
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, AlertType::HighTemperature | AlertType::FaceNotDetected)
    }
}
