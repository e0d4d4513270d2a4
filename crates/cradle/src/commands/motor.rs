//! Rocking motor control.

use cradle_core::{Monitor, MotorAction};

use crate::cli::{GlobalOpts, MotorArgs, MotorCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(monitor: &Monitor, args: MotorArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let action = match args.command {
        MotorCommand::Start => MotorAction::Start,
        MotorCommand::Stop => MotorAction::Stop,
    };
    monitor.control_motor(action).await?;
    output::note(&format!("✓ Motor {action} sent"), global.quiet);
    Ok(())
}
