// cradle-core: Session, device, and polling state between cradle-api and consumers.

pub mod config;
pub mod error;
pub mod monitor;
pub mod poller;
pub mod presentation;
pub mod sequence;
pub mod store;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Credentials, MonitorConfig, SelectionFallback, TlsVerification};
pub use error::{CoreError, ErrorKind};
pub use monitor::Monitor;
pub use poller::{PollGuard, PollerState, StatusPoller, StatusSource};
pub use presentation::{AlertTypeExt, PostureLevel, TemperatureLevel};
pub use sequence::{RequestSequencer, Resource, Ticket};
pub use store::{CradleStore, StatusStream};

// Wire types consumers need alongside the store.
pub use cradle_api::{
    Agent, AgentStatus, AlertDetail, AlertLog, AlertSettings, AlertSettingsUpdate, AlertType,
    MotorAction, SensorSample, User, VideoFrameInfo,
};
