// ── Core error types ──
//
// User-facing errors from cradle-core. Consumers never see reqwest errors
// or JSON decoding failures directly: the `From<cradle_api::Error>` impl
// folds transport-layer failures into the three kinds a user can act on
// (connectivity, server, validation).

use thiserror::Error;

/// Coarse classification shown to the user alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The request never reached the service, or timed out.
    Connectivity,
    /// The service answered with a failure.
    Server,
    /// Input was rejected locally, before any network call.
    Validation,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connectivity ─────────────────────────────────────────────────
    #[error("Cannot reach cradle service at {url}: {reason}")]
    Connectivity { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Server ───────────────────────────────────────────────────────
    #[error("{message}")]
    Server {
        message: String,
        /// HTTP status, when the failure came with one.
        status: Option<u16>,
    },

    #[error("Login failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- log in again")]
    SessionExpired,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("No cradle selected")]
    NoAgentSelected,

    #[error("Cradle not found: {uuid}")]
    AgentNotFound { uuid: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Which of the three user-facing kinds this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connectivity { .. } | Self::Timeout { .. } => ErrorKind::Connectivity,
            Self::Server { .. }
            | Self::AuthenticationFailed { .. }
            | Self::SessionExpired
            | Self::Internal(_) => ErrorKind::Server,
            Self::Validation { .. }
            | Self::NotAuthenticated
            | Self::NoAgentSelected
            | Self::AgentNotFound { .. }
            | Self::Config { .. } => ErrorKind::Validation,
        }
    }

    /// The server-supplied message, if the service sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } | Self::AuthenticationFailed { message } => {
                Some(message)
            }
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<cradle_api::Error> for CoreError {
    fn from(err: cradle_api::Error) -> Self {
        match err {
            cradle_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            cradle_api::Error::SessionExpired => CoreError::SessionExpired,
            // Raw timeouts carry no duration; they stay connectivity failures.
            cradle_api::Error::Transport(ref e) => match e.status() {
                Some(status) => CoreError::Server {
                    message: e.to_string(),
                    status: Some(status.as_u16()),
                },
                None => CoreError::Connectivity {
                    url: e
                        .url()
                        .map_or_else(|| "<unknown>".into(), |u| u.origin().ascii_serialization()),
                    reason: e.to_string(),
                },
            },
            cradle_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            cradle_api::Error::UnsupportedBaseUrl(url) => CoreError::Config {
                message: format!("Unsupported server URL: {url}"),
            },
            cradle_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            cradle_api::Error::Tls(msg) => CoreError::Connectivity {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            cradle_api::Error::Api { status, message } => CoreError::Server {
                message,
                status: Some(status),
            },
            cradle_api::Error::Rejected { message } => CoreError::Server {
                message,
                status: None,
            },
            cradle_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response from server: {message}"))
            }
        }
    }
}
