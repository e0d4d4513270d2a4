//! Recorded sensor history.

use chrono::{DateTime, Utc};
use tabled::Tabled;

use cradle_core::{Monitor, SensorSample};

use crate::cli::{GlobalOpts, SensorsArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SampleRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Temp")]
    temperature: String,
    #[tabled(rename = "Crying")]
    crying: String,
    #[tabled(rename = "Posture")]
    direction: String,
}

impl From<&SensorSample> for SampleRow {
    fn from(s: &SensorSample) -> Self {
        Self {
            time: s.timestamp.clone(),
            temperature: util::celsius(s.temperature),
            crying: util::or_dash(s.crying.as_deref()),
            direction: util::or_dash(s.direction.as_deref()),
        }
    }
}

/// `end` minus `hours`, rejecting windows chrono cannot represent.
fn lookback_start(end: DateTime<Utc>, hours: i64) -> Result<DateTime<Utc>, CliError> {
    if hours <= 0 {
        return Err(CliError::Validation {
            field: "hours".into(),
            reason: "must be positive".into(),
        });
    }
    chrono::Duration::try_hours(hours)
        .and_then(|window| end.checked_sub_signed(window))
        .ok_or_else(|| CliError::Validation {
            field: "hours".into(),
            reason: format!("{hours} hours reaches past the earliest supported date"),
        })
}

pub async fn handle(
    monitor: &Monitor,
    args: SensorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let samples = match args.since {
        Some(ref since) => {
            let start = util::parse_timestamp("since", since)?;
            let end = match args.until {
                Some(ref until) => util::parse_timestamp("until", until)?,
                None => Utc::now(),
            };
            monitor.sensor_data(start, end).await?
        }
        None if args.hours == 24 => monitor.last_day_sensor_data().await?,
        None => {
            let end = Utc::now();
            monitor.sensor_data(lookback_start(end, args.hours)?, end).await?
        }
    };

    let out = output::render_list(&global.output, &samples, |s| SampleRow::from(s), |s| {
        s.timestamp.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
