//! Login, logout, and account creation.
//!
//! These run before the shared connect step: `login` may have to ask for
//! credentials first, and `signup` never logs in at all.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use cradle_core::{Credentials, Monitor};

use crate::cli::{GlobalOpts, LoginArgs, LogoutArgs, SignupArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct LoginSummary {
    username: String,
    agents: usize,
    selected: Option<String>,
}

fn login_detail(s: &LoginSummary) -> String {
    [
        format!("Logged in as {}", s.username),
        format!("Cradles:  {}", s.agents),
        format!("Selected: {}", s.selected.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

/// Ask for whatever part of the credentials is missing.
fn prompt_credentials(username: Option<String>) -> Result<Credentials, CliError> {
    let username = match username {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(CliError::prompt)?,
    };
    let password = rpassword::prompt_password("Password: ").map_err(CliError::prompt)?;
    Ok(Credentials {
        username,
        password: SecretString::from(password),
    })
}

// ── Login ───────────────────────────────────────────────────────────

pub async fn login(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (profile_name, mut monitor_config) = config::build_monitor_config(global)?;

    if monitor_config.credentials.is_none() {
        if !std::io::stdin().is_terminal() {
            return Err(CliError::NoCredentials {
                profile: profile_name,
            });
        }
        let cfg = config::load_config_or_default();
        let (_, profile) = config::resolve_profile(global, &cfg)?;
        monitor_config.credentials = Some(prompt_credentials(profile.username)?);
    }
    let Some(credentials) = monitor_config.credentials.clone() else {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    };

    let monitor = Monitor::new(monitor_config)?;
    if let Err(e) = monitor.connect().await {
        monitor.disconnect().await;
        return Err(e.into());
    }

    let summary = LoginSummary {
        username: monitor
            .store()
            .session()
            .map_or_else(|| credentials.username.clone(), |u| u.username.clone()),
        agents: monitor.store().agents().len(),
        selected: monitor.store().selected_uuid(),
    };
    monitor.disconnect().await;

    if args.save {
        save_login(global, &profile_name, &credentials)?;
        output::note(
            &format!("✓ Credentials saved to profile '{profile_name}'"),
            global.quiet,
        );
    }

    let out = output::render_single(&global.output, &summary, login_detail, |s| {
        s.username.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

fn save_login(
    global: &GlobalOpts,
    profile_name: &str,
    credentials: &Credentials,
) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let profile = cfg.profiles.entry(profile_name.to_owned()).or_default();
    profile.username = Some(credentials.username.clone());
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    config::save_config(&cfg)?;
    cradle_config::store_password(profile_name, credentials.password.expose_secret())?;
    Ok(())
}

// ── Logout ──────────────────────────────────────────────────────────

pub async fn logout(args: LogoutArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (profile_name, monitor_config) = config::build_monitor_config(global)?;

    if monitor_config.credentials.is_some() {
        let monitor = Monitor::new(monitor_config)?;
        let result = match monitor.connect().await {
            Ok(()) => monitor.logout().await,
            Err(e) => Err(e),
        };
        monitor.disconnect().await;
        result?;
        output::note("✓ Logged out", global.quiet);
    } else if !args.forget {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    }

    if args.forget {
        cradle_config::forget_password(&profile_name)?;
        output::note(
            &format!("✓ Password removed from keyring for profile '{profile_name}'"),
            global.quiet,
        );
    }
    Ok(())
}

// ── Signup ──────────────────────────────────────────────────────────

pub async fn signup(args: SignupArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (_, monitor_config) = config::build_monitor_config(global)?;
    let monitor = Monitor::new(monitor_config)?;

    let username = match args.new_username {
        Some(u) => u,
        None => Input::new()
            .with_prompt("New username")
            .interact_text()
            .map_err(CliError::prompt)?,
    };

    if !monitor.username_available(&username).await? {
        return Err(CliError::Validation {
            field: "username".into(),
            reason: format!("'{username}' is already taken"),
        });
    }

    let password = SecretString::from(
        rpassword::prompt_password("Password: ").map_err(CliError::prompt)?,
    );
    let confirmation = SecretString::from(
        rpassword::prompt_password("Confirm password: ").map_err(CliError::prompt)?,
    );

    monitor
        .register_user(&username, &password, &confirmation)
        .await?;
    output::note(
        &format!("✓ Account '{username}' created. Log in with: cradle login -u {username} --save"),
        global.quiet,
    );
    Ok(())
}
