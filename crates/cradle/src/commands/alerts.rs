//! Alert command handlers.

use tabled::Tabled;

use cradle_core::{AlertDetail, AlertLog, AlertTypeExt, Monitor};

use crate::cli::{AlertsArgs, AlertsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Cradle")]
    agent: String,
    #[tabled(rename = "Resolved")]
    resolved: String,
}

impl AlertRow {
    fn new(a: &AlertLog, color: bool) -> Self {
        Self {
            id: a.id,
            time: a.created_at.clone(),
            kind: output::paint_alarm(
                a.alert_type.label(),
                a.alert_type.is_critical() && !a.resolved,
                color,
            ),
            message: a.text().to_owned(),
            agent: util::or_dash(a.agent_uuid.as_deref()),
            resolved: a
                .resolved_at
                .clone()
                .unwrap_or_else(|| if a.resolved { "yes" } else { "no" }.into()),
        }
    }
}

fn detail(d: &AlertDetail, monitor: &Monitor) -> String {
    let a = &d.alert;
    let mut lines = vec![
        format!("ID:          {}", a.id),
        format!("Type:        {} ({})", a.alert_type.label(), a.alert_type),
        format!("Message:     {}", a.text()),
        format!("Cradle:      {}", util::or_dash(a.agent_uuid.as_deref())),
        format!("Temperature: {}", util::celsius(a.temperature)),
        format!("Raised:      {}", a.created_at),
        format!(
            "Resolved:    {}",
            a.resolved_at
                .clone()
                .unwrap_or_else(|| if a.resolved { "yes" } else { "no" }.into())
        ),
    ];

    if !d.sensor_data.is_empty() {
        lines.push(String::new());
        lines.push(format!("Samples around the alert ({}):", d.sensor_data.len()));
        for s in &d.sensor_data {
            lines.push(format!(
                "  {}  {}  {}  {}",
                s.timestamp,
                util::celsius(s.temperature),
                util::or_dash(s.crying.as_deref()),
                util::or_dash(s.direction.as_deref()),
            ));
        }
    }

    if !d.video_frames.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Frames ({} of {}):",
            d.video_frames.len(),
            d.total_frames
        ));
        for f in &d.video_frames {
            let url = monitor
                .frame_url(f.id)
                .map_or_else(|_| "-".into(), |u| u.to_string());
            lines.push(format!("  {}  {}", f.timestamp, url));
        }
    }

    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    monitor: &Monitor,
    args: AlertsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        AlertsCommand::List { unresolved } => {
            let alerts = monitor.alerts().await?;
            let alerts: Vec<_> = alerts
                .iter()
                .filter(|a| !unresolved || !a.resolved)
                .cloned()
                .collect();
            let out = output::render_list(
                &global.output,
                &alerts,
                |a| AlertRow::new(a, color),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::Resolve { ids } => {
            for id in ids {
                monitor.resolve_alert(id).await?;
                output::note(&format!("✓ Alert {id} resolved"), global.quiet);
            }
            Ok(())
        }

        AlertsCommand::History => {
            let history = monitor.alert_history().await?;
            let out = output::render_list(
                &global.output,
                &history,
                |a| AlertRow::new(a, color),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::Show { id } => {
            let detail_view = monitor.alert_detail(id).await?;
            let out = output::render_single(
                &global.output,
                &detail_view,
                |d| detail(d, monitor),
                |d| d.alert.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
