//! CLI configuration: thin wrapper around `cradle_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--server, --username, --agent, etc.).

use std::io::IsTerminal;

use secrecy::SecretString;

use cradle_config::ConfigError;
use cradle_core::{Credentials, MonitorConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use cradle_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// `ProfileNotFound` listing what is configured.
pub fn profile_not_found(config: &Config, name: String) -> CliError {
    let available = config.profile_names();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

/// The active profile with CLI flag overrides applied.
///
/// A missing profile is only an error when it was named explicitly;
/// otherwise the built-in defaults stand in for it.
pub fn resolve_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    let mut profile = match config.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => return Err(profile_not_found(config, name)),
        None => Profile::default(),
    };

    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if let Some(ref agent) = global.agent {
        profile.agent = Some(agent.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    Ok((name, profile))
}

/// Build a `MonitorConfig` from config file, profile, and flags.
///
/// Credentials are filled in when they can be resolved; whether they are
/// required is up to the command.
pub fn build_monitor_config(global: &GlobalOpts) -> Result<(String, MonitorConfig), CliError> {
    let cfg = load_config_or_default();
    let (name, profile) = resolve_profile(global, &cfg)?;

    let mut config = cradle_config::base_monitor_config(&profile, &cfg.defaults)?;
    config.credentials = match cradle_config::resolve_credentials(&profile, &name) {
        Ok(credentials) => Some(credentials),
        Err(ConfigError::NoCredentials { .. }) => profile
            .username
            .clone()
            .map(prompt_password_for)
            .transpose()?
            .flatten(),
        Err(e) => return Err(e.into()),
    };
    Ok((name, config))
}

/// Fail with `NoCredentials` unless `config` carries credentials.
pub fn require_credentials(config: &MonitorConfig, profile_name: &str) -> Result<(), CliError> {
    if config.credentials.is_some() {
        Ok(())
    } else {
        Err(CliError::NoCredentials {
            profile: profile_name.into(),
        })
    }
}

/// Ask for the password of a known user, if a terminal is attached.
///
/// Without a terminal the credentials stay unresolved.
fn prompt_password_for(username: String) -> Result<Option<Credentials>, CliError> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }
    let password = rpassword::prompt_password(format!("Password for {username}: "))
        .map_err(CliError::prompt)?;
    if password.is_empty() {
        return Ok(None);
    }
    Ok(Some(Credentials {
        username,
        password: SecretString::from(password),
    }))
}
