// cradle-api: Async Rust client for the Smart Cradle monitoring service

pub mod agents;
pub mod alerts;
pub mod auth;
pub mod client;
pub mod control;
pub mod error;
pub mod media;
pub mod models;
pub mod sensors;
pub mod transport;

pub use client::CradleClient;
pub use error::Error;
pub use models::{
    Agent, AgentStatus, AlertDetail, AlertLog, AlertSettings, AlertSettingsUpdate, AlertType,
    LoginResponse, MotorAction, Outcome, RegisterCradleResponse, SensorSample, User,
    VideoFrameInfo,
};
pub use transport::{TlsMode, TransportConfig};
