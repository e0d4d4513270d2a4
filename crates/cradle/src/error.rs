//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use cradle_config::ConfigError;
use cradle_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to the cradle service at {url}")]
    #[diagnostic(
        code(cradle::connection_failed),
        help(
            "Check your network connection and the server URL.\n\
             Reason: {reason}\n\
             Override the server with --server or `cradle config set server <url>`."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(cradle::timeout),
        help("Increase the timeout with --timeout or check the service's responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Login failed: {message}")]
    #[diagnostic(
        code(cradle::auth_failed),
        help(
            "Verify your username and password.\n\
             Run: cradle config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("Session is no longer valid")]
    #[diagnostic(
        code(cradle::session_expired),
        help("The service ended the session. Run the command again to log in afresh.")
    )]
    SessionExpired,

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(cradle::no_credentials),
        help(
            "Configure credentials with: cradle config init\n\
             Or pass --username and set CRADLE_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(cradle::not_found),
        help("Run: cradle {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("No cradle selected")]
    #[diagnostic(
        code(cradle::no_agent_selected),
        help(
            "Pass --agent <uuid>, or remember one with: cradle agents select <uuid>\n\
             Run: cradle agents list"
        )
    )]
    NoAgentSelected,

    // ── API ──────────────────────────────────────────────────────────

    #[error("Service error ({code}): {message}")]
    #[diagnostic(code(cradle::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cradle::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(cradle::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: cradle config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(cradle::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(cradle::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::SessionExpired | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::NoAgentSelected
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Wrap an interactive prompt failure.
    pub fn prompt(e: impl std::fmt::Display) -> Self {
        Self::Validation {
            field: "interactive".into(),
            reason: format!("prompt failed: {e}"),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Connectivity { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::SessionExpired | CoreError::NotAuthenticated => CliError::SessionExpired,

            CoreError::Server { message, status } => CliError::ApiError {
                code: status.map_or_else(|| "rejected".into(), |s| s.to_string()),
                message,
            },

            CoreError::Validation { field, message } => CliError::Validation {
                field: field.into(),
                reason: message,
            },

            CoreError::NoAgentSelected => CliError::NoAgentSelected,

            CoreError::AgentNotFound { uuid } => CliError::NotFound {
                resource_type: "cradle".into(),
                identifier: uuid,
                list_command: "agents list".into(),
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
