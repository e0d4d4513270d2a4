//! Status snapshot and live watch.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;

use cradle_core::{AgentStatus, Monitor, PostureLevel, StatusPoller, TemperatureLevel};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn temperature_text(status: &AgentStatus, color: bool) -> String {
    let level = TemperatureLevel::classify(status.temperature);
    let text = match status.temperature {
        Some(_) => format!("{} ({})", util::celsius(status.temperature), level.label()),
        None => level.label().to_owned(),
    };
    output::paint_temperature(&text, level, color)
}

fn posture_text(status: &AgentStatus, color: bool) -> String {
    let level = PostureLevel::classify(status.direction.as_deref());
    output::paint_posture(&util::or_dash(status.direction.as_deref()), level, color)
}

fn crying_text(status: &AgentStatus, color: bool) -> String {
    output::paint_alarm(
        &util::or_dash(status.crying.as_deref()),
        util::is_crying(status.crying.as_deref()),
        color,
    )
}

fn detail(status: &AgentStatus, color: bool) -> String {
    [
        format!("Cradle:         {}", status.agent_uuid),
        format!("Temperature:    {}", temperature_text(status, color)),
        format!("Crying:         {}", crying_text(status, color)),
        format!("Posture:        {}", posture_text(status, color)),
        format!(
            "Face direction: {}",
            util::or_dash(status.face_direction.as_deref())
        ),
        format!(
            "Last facing up: {}",
            util::or_dash(status.last_normal_face_time.as_deref())
        ),
        format!("Updated:        {}", util::or_dash(status.last_update.as_deref())),
    ]
    .join("\n")
}

/// One line per update; structured formats emit one document per update.
fn watch_line(format: &OutputFormat, status: &AgentStatus, color: bool) -> String {
    match format {
        OutputFormat::Table => format!(
            "[{}] {}  crying: {}  posture: {}",
            chrono::Local::now().format("%H:%M:%S"),
            temperature_text(status, color),
            crying_text(status, color),
            posture_text(status, color),
        ),
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json_compact(status),
        OutputFormat::Yaml => format!("---\n{}", output::render_yaml(status)),
        OutputFormat::Plain => format!(
            "{}\t{}\t{}",
            status
                .temperature
                .map_or_else(|| "-".into(), |t| t.to_string()),
            util::or_dash(status.crying.as_deref()),
            util::or_dash(status.direction.as_deref()),
        ),
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn status(monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    let status = monitor.refresh_status().await?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &status,
        |s| detail(s, color),
        |s| {
            s.temperature
                .map_or_else(|| "-".into(), |t| t.to_string())
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn watch(monitor: &Monitor, args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let uuid = monitor
        .store()
        .selected_uuid()
        .ok_or(CliError::NoAgentSelected)?;

    let poller = match args.interval {
        Some(secs) => StatusPoller::new(
            Arc::new(monitor.client().clone()),
            Arc::clone(monitor.store()),
            Duration::from_secs(secs),
        ),
        None => monitor.poller(),
    };
    output::note(
        &format!(
            "Watching cradle {uuid} every {}s (Ctrl-C to stop)",
            poller.period().as_secs()
        ),
        global.quiet,
    );

    let color = output::should_color(&global.color);
    let mut updates = monitor.store().status_stream();
    let mut session = monitor.store().subscribe_session();
    let guard = poller.activate();
    let mut seen = 0_usize;

    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break Ok(()),
            changed = session.changed() => {
                if changed.is_err() || session.borrow_and_update().is_none() {
                    break Err(CliError::SessionExpired);
                }
            }
            next = updates.next() => match next {
                Some(Some(status)) => {
                    output::print_output(&watch_line(&global.output, &status, color), global.quiet);
                    seen += 1;
                    if args.count.is_some_and(|n| seen >= n) {
                        break Ok(());
                    }
                }
                Some(None) => {}
                None => break Ok(()),
            },
        }
    };

    guard.stop().await;
    result
}
