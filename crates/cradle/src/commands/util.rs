//! Shared helpers for command handlers.

use std::io::IsTerminal;

use chrono::{DateTime, Utc};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(CliError::prompt)
}

/// Parse an RFC 3339 timestamp given on the command line.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::Validation {
            field: field.into(),
            reason: format!("expected RFC 3339 (e.g. 2025-03-01T00:00:00Z): {e}"),
        })
}

/// Record `uuid` (or nothing) as the active profile's cradle.
pub fn remember_agent(global: &GlobalOpts, uuid: Option<&str>) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let name = config::active_profile_name(global, &cfg);
    let profile = cfg.profiles.entry(name).or_default();
    if profile.agent.as_deref() == uuid {
        return Ok(());
    }
    profile.agent = uuid.map(str::to_owned);
    config::save_config(&cfg)?;
    Ok(())
}

/// `"-"` for missing values.
pub fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_owned()
}

/// `36.5°C`, or `-`.
pub fn celsius(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |t| format!("{t:.1}°C"))
}

/// Whether a crying reading means the baby is crying.
pub fn is_crying(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("crying"))
}
