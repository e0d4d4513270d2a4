//! Stream, frame, and clip URLs.

use cradle_core::Monitor;

use crate::cli::{GlobalOpts, VideoUrlArgs};
use crate::error::CliError;
use crate::output;

pub fn stream_url(monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    output::print_output(monitor.stream_url()?.as_str(), global.quiet);
    Ok(())
}

pub fn frame_url(monitor: &Monitor, id: i64, global: &GlobalOpts) -> Result<(), CliError> {
    output::print_output(monitor.frame_url(id)?.as_str(), global.quiet);
    Ok(())
}

pub fn video_url(monitor: &Monitor, args: &VideoUrlArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if chrono::NaiveDate::parse_from_str(&args.date, "%Y-%m-%d").is_err() {
        return Err(CliError::Validation {
            field: "date".into(),
            reason: format!("expected YYYY-MM-DD, got '{}'", args.date),
        });
    }
    if chrono::NaiveTime::parse_from_str(&args.time, "%H:%M").is_err() {
        return Err(CliError::Validation {
            field: "time".into(),
            reason: format!("expected HH:MM, got '{}'", args.time),
        });
    }
    let url = monitor.video_url(&args.date, &args.time)?;
    output::print_output(url.as_str(), global.quiet);
    Ok(())
}
