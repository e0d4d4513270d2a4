//! Clap derive structures for the `cradle` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cradle -- watch and control a smart cradle from the command line
#[derive(Debug, Parser)]
#[command(
    name = "cradle",
    version,
    about = "Monitor a smart baby cradle from the command line",
    long_about = "Command-line client for the smart cradle service.\n\n\
        Shows live status (temperature, crying, sleeping posture), lists and\n\
        resolves alerts, edits alert thresholds, and drives the rocking motor.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "CRADLE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service URL (overrides profile)
    #[arg(long, short = 's', env = "CRADLE_SERVER", global = true)]
    pub server: Option<String>,

    /// Account username (overrides profile)
    #[arg(long, short = 'u', env = "CRADLE_USERNAME", global = true)]
    pub username: Option<String>,

    /// Cradle UUID to act on (overrides the profile's saved selection)
    #[arg(long, short = 'a', env = "CRADLE_AGENT", global = true)]
    pub agent: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CRADLE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "CRADLE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "CRADLE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check credentials against the service (optionally saving them)
    Login(LoginArgs),

    /// End the service session (optionally forgetting the saved password)
    Logout(LogoutArgs),

    /// Create a new account
    Signup(SignupArgs),

    /// Manage registered cradles
    #[command(alias = "a")]
    Agents(AgentsArgs),

    /// Show the selected cradle's current status
    #[command(alias = "st")]
    Status,

    /// Follow the selected cradle's status as it changes
    Watch(WatchArgs),

    /// List, inspect, and resolve alerts
    Alerts(AlertsArgs),

    /// View and change alert thresholds
    Settings(SettingsArgs),

    /// Start or stop the rocking motor
    Motor(MotorArgs),

    /// Show recorded sensor samples
    Sensors(SensorsArgs),

    /// Print the live camera stream URL
    StreamUrl,

    /// Print the image URL of a captured alert frame
    FrameUrl {
        /// Frame ID (from `alerts show`)
        id: i64,
    },

    /// Print the URL of a recorded video clip
    VideoUrl(VideoUrlArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Save the username to the profile and the password to the keyring
    #[arg(long)]
    pub save: bool,
}

#[derive(Debug, Args)]
pub struct LogoutArgs {
    /// Also remove the profile's password from the system keyring
    #[arg(long)]
    pub forget: bool,
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Username for the new account (prompted if omitted)
    pub new_username: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AGENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AgentsArgs {
    #[command(subcommand)]
    pub command: AgentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AgentsCommand {
    /// List registered cradles
    #[command(alias = "ls")]
    List,

    /// Register a cradle by the UUID printed on its label
    Add {
        /// Cradle UUID
        uuid: String,
    },

    /// Select a cradle and remember it in the active profile
    Select {
        /// Cradle UUID
        uuid: String,
    },

    /// Delete a cradle and all of its recorded data
    #[command(alias = "rm")]
    Remove {
        /// Cradle UUID
        uuid: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STATUS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Polling period in seconds (default: profile setting, else 2)
    #[arg(long, short = 'i', value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Exit after this many status updates
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ALERTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List alerts across all cradles
    #[command(alias = "ls")]
    List {
        /// Only show unresolved alerts
        #[arg(long)]
        unresolved: bool,
    },

    /// Mark one or more alerts resolved
    Resolve {
        /// Alert IDs
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Alert history of the selected cradle
    History,

    /// Show an alert with the samples and frames captured around it
    Show {
        /// Alert ID
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SETTINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the selected cradle's alert settings
    Show,

    /// Change one or more alert settings
    Set(SettingsSetArgs),
}

#[derive(Debug, Args)]
#[command(group(
    clap::ArgGroup::new("fields")
        .required(true)
        .multiple(true)
        .args(["max_temperature", "position_timeout", "crying_threshold", "push", "email"])
))]
pub struct SettingsSetArgs {
    /// Temperature ceiling in °C
    #[arg(long)]
    pub max_temperature: Option<f64>,

    /// Seconds of abnormal posture before alerting
    #[arg(long)]
    pub position_timeout: Option<u32>,

    /// Seconds of crying before alerting
    #[arg(long)]
    pub crying_threshold: Option<u32>,

    /// Push notifications
    #[arg(long)]
    pub push: Option<Toggle>,

    /// Email notifications
    #[arg(long)]
    pub email: Option<Toggle>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MOTOR / SENSORS / MEDIA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MotorArgs {
    #[command(subcommand)]
    pub command: MotorCommand,
}

#[derive(Debug, Subcommand)]
pub enum MotorCommand {
    /// Start rocking
    Start,
    /// Stop rocking
    Stop,
}

#[derive(Debug, Args)]
pub struct SensorsArgs {
    /// Look back this many hours
    #[arg(long, default_value = "24", conflicts_with = "since")]
    pub hours: i64,

    /// Start of the window (RFC 3339, e.g. 2025-03-01T00:00:00Z)
    #[arg(long)]
    pub since: Option<String>,

    /// End of the window (RFC 3339, default: now)
    #[arg(long, requires = "since")]
    pub until: Option<String>,
}

#[derive(Debug, Args)]
pub struct VideoUrlArgs {
    /// Recording date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Recording time (HH:MM)
    #[arg(long)]
    pub time: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (server, username, password_env, agent, timeout,
        /// poll_interval, selection_fallback, insecure, ca_cert)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
