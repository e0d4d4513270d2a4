// ── Client-side input validation ──
//
// Checks that run before any network call. A failure here never reaches
// the service and always surfaces as `CoreError::Validation`.

use cradle_api::AlertSettingsUpdate;
use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 4;

/// Login form: both fields present.
pub fn login(username: &str, password: &SecretString) -> Result<(), CoreError> {
    if username.trim().is_empty() || password.expose_secret().is_empty() {
        return Err(CoreError::validation(
            "credentials",
            "username and password are required",
        ));
    }
    Ok(())
}

/// Sign-up form: all fields present, minimum lengths, confirmation matches.
pub fn registration(
    username: &str,
    password: &SecretString,
    confirmation: &SecretString,
) -> Result<(), CoreError> {
    let password = password.expose_secret();
    let confirmation = confirmation.expose_secret();

    if username.trim().is_empty() || password.is_empty() || confirmation.is_empty() {
        return Err(CoreError::validation("registration", "all fields are required"));
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(CoreError::validation(
            "username",
            format!("must be at least {MIN_USERNAME_LEN} characters"),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::validation(
            "password",
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if password != confirmation {
        return Err(CoreError::validation("password", "confirmation does not match"));
    }
    Ok(())
}

/// A cradle UUID typed in or scanned: trimmed, non-empty.
pub fn agent_uuid(raw: &str) -> Result<String, CoreError> {
    let uuid = raw.trim();
    if uuid.is_empty() {
        return Err(CoreError::validation("cradle UUID", "must not be empty"));
    }
    Ok(uuid.to_owned())
}

/// A settings update: at least one field, numeric fields in range.
pub fn settings_update(update: &AlertSettingsUpdate) -> Result<(), CoreError> {
    if update.is_empty() {
        return Err(CoreError::validation("settings", "nothing to update"));
    }
    if let Some(max) = update.max_temperature {
        if !max.is_finite() || max <= 0.0 {
            return Err(CoreError::validation(
                "max_temperature",
                format!("{max} is not a usable temperature"),
            ));
        }
    }
    if update.abnormal_position_timeout == Some(0) {
        return Err(CoreError::validation(
            "abnormal_position_timeout",
            "must be at least 1 second",
        ));
    }
    if update.crying_duration_threshold == Some(0) {
        return Err(CoreError::validation(
            "crying_duration_threshold",
            "must be at least 1 second",
        ));
    }
    Ok(())
}
