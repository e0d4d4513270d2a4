mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cradle_core::Monitor;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.quiet);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, quiet: bool) {
    let filter = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local commands never talk to the service
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "cradle", &mut std::io::stdout());
            Ok(())
        }

        // Session commands manage their own login
        Command::Login(args) => commands::session::login(args, &cli.global).await,
        Command::Logout(args) => commands::session::logout(args, &cli.global).await,
        Command::Signup(args) => commands::session::signup(args, &cli.global).await,

        // Everything else runs inside a logged-in session
        cmd => {
            let monitor = connect(&cli.global).await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &monitor, &cli.global).await;
            monitor.disconnect().await;
            result
        }
    }
}

/// Log in with the resolved profile and apply an explicit `--agent`.
async fn connect(global: &GlobalOpts) -> Result<Monitor, CliError> {
    let (profile_name, monitor_config) = config::build_monitor_config(global)?;
    config::require_credentials(&monitor_config, &profile_name)?;

    let monitor = Monitor::new(monitor_config)?;
    if let Err(e) = monitor.connect().await {
        monitor.disconnect().await;
        return Err(e.into());
    }

    // A stale saved selection only warns; a cradle named on the command
    // line has to exist.
    if let Some(ref uuid) = global.agent {
        if monitor.store().selected_uuid().as_deref() != Some(uuid.as_str()) {
            monitor.disconnect().await;
            return Err(CliError::NotFound {
                resource_type: "cradle".into(),
                identifier: uuid.clone(),
                list_command: "agents list".into(),
            });
        }
    }

    Ok(monitor)
}
