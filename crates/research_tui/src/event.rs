//! TUI event types for input and backend replies.

use crossterm::event::KeyEvent;
use research_client::session::PendingQuery;
use research_client::{ClientError, ResearchResponse, ServiceStatus};

/// Application event emitted by input handlers or request tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event.
    Input(KeyEvent),
    /// Periodic tick event (drives the thinking indicator).
    Tick,
    /// Scroll event in the chat view.
    Scroll(i16),
    /// A research request settled.
    Reply {
        pending: PendingQuery,
        outcome: Result<ResearchResponse, ClientError>,
    },
    /// A health probe settled.
    Health {
        endpoint: String,
        outcome: Result<ServiceStatus, ClientError>,
    },
}
