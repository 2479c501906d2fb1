//! Terminal chat UI for the research assistant: application state, events and rendering.
//! The binary in `main.rs` owns the terminal and the event loop.

pub mod app;
pub mod event;
pub mod ui;

pub use app::{Action, App, BackendStatus};
pub use event::AppEvent;
