//! Alert settings handlers.

use cradle_core::{AlertSettings, AlertSettingsUpdate, Monitor};

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand, SettingsSetArgs};
use crate::error::CliError;
use crate::output;

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn detail(s: &AlertSettings) -> String {
    [
        format!("Max temperature:       {:.1}°C", s.max_temperature),
        format!("Abnormal posture after: {}s", s.abnormal_position_timeout),
        format!("Crying alert after:     {}s", s.crying_duration_threshold),
        format!("Push notifications:     {}", on_off(s.push_notifications_enabled)),
        format!("Email notifications:    {}", on_off(s.email_notifications_enabled)),
    ]
    .join("\n")
}

fn to_update(args: &SettingsSetArgs) -> AlertSettingsUpdate {
    AlertSettingsUpdate {
        max_temperature: args.max_temperature,
        abnormal_position_timeout: args.position_timeout,
        crying_duration_threshold: args.crying_threshold,
        push_notifications_enabled: args.push.map(|t| t.enabled()),
        email_notifications_enabled: args.email.map(|t| t.enabled()),
    }
}

pub async fn handle(
    monitor: &Monitor,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let settings = match args.command {
        SettingsCommand::Show => monitor.alert_settings().await?,
        SettingsCommand::Set(set) => {
            let saved = monitor.update_alert_settings(&to_update(&set)).await?;
            output::note("✓ Alert settings saved", global.quiet);
            saved
        }
    };

    let out = output::render_single(&global.output, &settings, detail, |s| {
        s.max_temperature.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
