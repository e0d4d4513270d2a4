//! Command dispatch: bridges CLI args -> monitor operations -> output formatting.

pub mod agents;
pub mod alerts;
pub mod config_cmd;
pub mod media;
pub mod motor;
pub mod sensors;
pub mod session;
pub mod settings;
pub mod status;
pub mod util;

use cradle_core::Monitor;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, monitor: &Monitor, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Agents(args) => agents::handle(monitor, args, global).await,
        Command::Status => status::status(monitor, global).await,
        Command::Watch(args) => status::watch(monitor, args, global).await,
        Command::Alerts(args) => alerts::handle(monitor, args, global).await,
        Command::Settings(args) => settings::handle(monitor, args, global).await,
        Command::Motor(args) => motor::handle(monitor, args, global).await,
        Command::Sensors(args) => sensors::handle(monitor, args, global).await,
        Command::StreamUrl => media::stream_url(monitor, global),
        Command::FrameUrl { id } => media::frame_url(monitor, id, global),
        Command::VideoUrl(args) => media::video_url(monitor, &args, global),
        // Session and local commands are handled before connecting
        Command::Login(_)
        | Command::Logout(_)
        | Command::Signup(_)
        | Command::Config(_)
        | Command::Completions(_) => unreachable!(),
    }
}
