//! Application state for the research TUI.

use crate::event::AppEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info, warn};
use research_client::config::{self, Config};
use research_client::session::{PendingQuery, SUGGESTIONS};
use research_client::{ClientError, ServiceStatus, Session};
use std::cmp::min;
use std::path::PathBuf;

/// What the event loop should do after an event was applied.
#[derive(Debug)]
pub enum Action {
    /// Nothing beyond a redraw.
    None,
    /// Leave the application.
    Quit,
    /// Send this query to the backend.
    Research(PendingQuery),
    /// Probe `GET /` on this endpoint.
    Probe(String),
}

/// Last known reachability of the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Unknown,
    Online(String),
    Unreachable(String),
}

/// Top-level application state for the TUI.
pub struct App {
    /// Transcript, loading flag, history and stats.
    pub session: Session,
    /// Current input buffer.
    pub input: String,
    /// Loaded config; updated when the endpoint is edited.
    pub config: Config,
    /// Where edits to the config are saved, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Whether the endpoint panel is open.
    pub config_open: bool,
    /// Endpoint text being edited in the panel.
    pub endpoint_draft: String,
    /// Index into [`SUGGESTIONS`] last copied into the input.
    pub suggestion: Option<usize>,
    /// Index into the history last copied into the input.
    pub history_cursor: Option<usize>,
    pub backend: BackendStatus,
    /// Status line text.
    pub status: String,
    /// Tick counter for the thinking animation.
    pub frame: u64,
    /// Current scroll offset.
    pub scroll: u16,
    /// Whether to auto-scroll to the bottom.
    pub auto_scroll: bool,
    /// Maximum scroll offset for the chat view.
    pub chat_max_scroll: u16,
}

impl App {
    /// Create application state for `endpoint`.
    pub fn new(config: Config, config_path: Option<PathBuf>, endpoint: &str) -> Self {
        Self {
            session: Session::new(endpoint),
            input: String::new(),
            config,
            config_path,
            config_open: false,
            endpoint_draft: String::new(),
            suggestion: None,
            history_cursor: None,
            backend: BackendStatus::Unknown,
            status: String::new(),
            frame: 0,
            scroll: 0,
            auto_scroll: true,
            chat_max_scroll: 0,
        }
    }

    /// Apply one event and report what the loop should do next.
    pub fn handle_event(&mut self, event: AppEvent) -> Action {
        match event {
            AppEvent::Input(key) => self.handle_key(key),
            AppEvent::Tick => {
                self.frame = self.frame.wrapping_add(1);
                Action::None
            }
            AppEvent::Scroll(delta) => {
                if delta < 0 {
                    self.scroll_up(delta.unsigned_abs());
                } else {
                    self.scroll_down(delta as u16);
                }
                Action::None
            }
            AppEvent::Reply { pending, outcome } => {
                self.session.complete(pending, outcome);
                self.maybe_enable_auto_scroll();
                Action::None
            }
            AppEvent::Health { endpoint, outcome } => {
                self.apply_health(&endpoint, outcome);
                Action::None
            }
        }
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        if ctrl && key.code == KeyCode::Char('e') {
            self.toggle_config();
            return Action::None;
        }
        if self.config_open {
            return self.handle_config_key(key);
        }

        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
            {
                self.input.push('\n');
            }
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab => self.cycle_suggestion(),
            KeyCode::Up if ctrl => self.history_older(),
            KeyCode::Down if ctrl => self.history_newer(),
            KeyCode::PageUp => self.scroll_up(5),
            KeyCode::PageDown => self.scroll_down(5),
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::Home => self.scroll_to_top(),
            KeyCode::End => self.enable_auto_scroll(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) if !ctrl => self.input.push(ch),
            _ => {}
        }
        Action::None
    }

    /// Submit the input buffer. A no-op while a request is in flight or when
    /// the input is blank; the buffer is kept in that case.
    pub fn submit(&mut self) -> Action {
        match self.session.begin_query(&self.input) {
            Some(pending) => {
                self.input.clear();
                self.suggestion = None;
                self.history_cursor = None;
                self.status.clear();
                self.enable_auto_scroll();
                Action::Research(pending)
            }
            None => Action::None,
        }
    }

    fn handle_config_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => {
                self.config_open = false;
                self.endpoint_draft.clear();
            }
            KeyCode::Enter => return self.apply_endpoint_draft(),
            KeyCode::Backspace => {
                self.endpoint_draft.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.endpoint_draft.push(ch);
            }
            _ => {}
        }
        Action::None
    }

    /// Open or close the endpoint panel. Opening seeds the draft with the
    /// current endpoint.
    pub fn toggle_config(&mut self) {
        self.config_open = !self.config_open;
        if self.config_open {
            self.endpoint_draft = self.session.endpoint().to_string();
        } else {
            self.endpoint_draft.clear();
        }
    }

    /// Make the draft the active endpoint and persist it.
    pub fn apply_endpoint_draft(&mut self) -> Action {
        let draft = self.endpoint_draft.trim().to_string();
        if draft.is_empty() {
            self.status = "endpoint cannot be empty".to_string();
            return Action::None;
        }
        self.session.set_endpoint(&draft);
        self.config.set_endpoint(self.session.endpoint());
        self.config_open = false;
        self.endpoint_draft.clear();

        match &self.config_path {
            Some(path) => match config::save(path, &self.config) {
                Ok(()) => {
                    info!("endpoint saved (path={})", path.display());
                    self.status = format!("endpoint saved to {}", path.display());
                }
                Err(e) => {
                    warn!("failed to save config: {}", e);
                    self.status = format!("failed to save config: {e}");
                }
            },
            None => self.status = "endpoint updated".to_string(),
        }
        self.probe_backend()
    }

    /// Request a health probe of the session's endpoint, tagged the way
    /// the result will be compared when it comes back.
    pub fn probe_backend(&mut self) -> Action {
        self.backend = BackendStatus::Unknown;
        Action::Probe(self.session.endpoint().to_string())
    }

    fn apply_health(&mut self, endpoint: &str, outcome: Result<ServiceStatus, ClientError>) {
        if endpoint != self.session.endpoint() {
            debug!("stale health result ignored (endpoint={})", endpoint);
            return;
        }
        self.backend = match outcome {
            Ok(status) => BackendStatus::Online(status.status),
            Err(e) => BackendStatus::Unreachable(match e.status() {
                Some(code) => format!("HTTP {code}"),
                None => "unreachable".to_string(),
            }),
        };
    }

    /// Copy the next suggestion into the input. Only offered on an empty transcript.
    pub fn cycle_suggestion(&mut self) {
        if !self.session.messages().is_empty() {
            return;
        }
        let next = self.suggestion.map_or(0, |i| (i + 1) % SUGGESTIONS.len());
        self.suggestion = Some(next);
        self.input = SUGGESTIONS[next].to_string();
    }

    /// Step back through history, copying the query into the input.
    pub fn history_older(&mut self) {
        let next = self.history_cursor.map_or(0, |i| i + 1);
        if let Some(query) = self.session.recall(next) {
            self.input = query.to_string();
            self.history_cursor = Some(next);
        }
    }

    /// Step forward through history; past the newest entry clears the input.
    pub fn history_newer(&mut self) {
        match self.history_cursor {
            None => {}
            Some(0) => {
                self.history_cursor = None;
                self.input.clear();
            }
            Some(i) => {
                if let Some(query) = self.session.recall(i - 1) {
                    self.input = query.to_string();
                }
                self.history_cursor = Some(i - 1);
            }
        }
    }

    /// Scroll the chat view upward by a number of lines.
    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scroll the chat view downward by a number of lines.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = min(self.scroll.saturating_add(lines), self.chat_max_scroll);
        if self.scroll >= self.chat_max_scroll {
            self.auto_scroll = true;
        }
    }

    /// Scroll to the top of the chat view.
    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll = 0;
    }

    /// Enable auto-scrolling to the bottom.
    pub fn enable_auto_scroll(&mut self) {
        self.auto_scroll = true;
        self.scroll = self.chat_max_scroll;
    }

    /// Update scroll bounds after layout changes. Snaps to the new bottom only
    /// when auto-scroll is on or the view was already pinned to the bottom.
    pub fn update_scroll_bounds(&mut self, max_scroll: u16) {
        let was_at_bottom = self.scroll >= self.chat_max_scroll;
        self.chat_max_scroll = max_scroll;
        if self.auto_scroll || was_at_bottom {
            self.scroll = max_scroll;
            self.auto_scroll = true;
        } else {
            self.scroll = self.scroll.min(max_scroll);
        }
    }

    fn maybe_enable_auto_scroll(&mut self) {
        if self.auto_scroll {
            self.scroll = self.chat_max_scroll;
        }
    }
}
