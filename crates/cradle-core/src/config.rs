// ── Runtime monitor configuration ──
//
// Describes *how* to talk to a cradle service: where it lives, who to log
// in as, and how to keep status fresh. Never touches disk; the CLI builds
// a `MonitorConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default service origin.
pub const DEFAULT_SERVER: &str = "http://www.smartcradle.kro.kr";

/// Default status polling period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Username and password for the session login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab servers).
    DangerAcceptInvalid,
}

/// What happens to the selection when the selected cradle disappears from
/// the device set (deleted here, or removed elsewhere and dropped on the
/// next refresh).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SelectionFallback {
    /// Select the first remaining cradle, if any.
    #[default]
    FirstRemaining,
    /// Leave nothing selected.
    Clear,
}

/// Configuration for one monitoring session.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Service origin, e.g. `http://www.smartcradle.kro.kr`.
    pub url: Url,
    /// Used by [`Monitor::oneshot`](crate::Monitor::oneshot) and
    /// [`Monitor::connect`](crate::Monitor::connect).
    pub credentials: Option<Credentials>,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Period of the status poller.
    pub poll_interval: Duration,
    pub selection_fallback: SelectionFallback,
    /// Cradle UUID to select after connecting, if it is still registered.
    pub preferred_agent: Option<String>,
}

impl MonitorConfig {
    /// Config for `url` with every other field at its default.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: cradle_api::transport::DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            selection_fallback: SelectionFallback::default(),
            preferred_agent: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password,
        });
        self
    }
}
