use thiserror::Error;

/// Top-level error type for the `cradle-api` crate.
///
/// Covers every failure mode of a single round trip to the cradle service:
/// transport, HTTP status, application-level rejection, and decoding.
/// `cradle-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, unknown user, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session cookie missing, expired, or revoked.
    #[error("Session expired -- log in again")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Unsupported base URL: {0}")]
    UnsupportedBaseUrl(String),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server ──────────────────────────────────────────────────────
    /// Non-2xx response. `message` is the server-supplied text when present.
    #[error("Server error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body reports failure (`success: false`).
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request never completed a round trip
    /// (connection failure, DNS, timeout).
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Transport(e) => e.status().is_none(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the session is gone and logging in again might help.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Returns `true` if this is a "not found" response.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status: 404, .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// The message supplied by the server, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Authentication { message }
            | Self::Api { message, .. }
            | Self::Rejected { message } => Some(message),
            _ => None,
        }
    }
}
