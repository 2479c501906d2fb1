//! Shared research assistant client library (config, HTTP client, session state).
//! Used by the `research` CLI and the terminal UI.

pub mod client;
pub mod config;
pub mod messages;
pub mod session;

pub use client::{Client, ClientError};
pub use config::{default_config_path, ClientSection, Config, ConfigError, DEFAULT_ENDPOINT};
pub use messages::{ResearchResponse, ServiceStatus};
pub use session::{HistoryEntry, Message, MessageKind, Role, Session, SessionStats};
