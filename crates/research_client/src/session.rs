//! Chat session state: transcript, in-flight flag, query history and stats.
//!
//! Front ends own one [`Session`] and drive it with [`Session::begin_query`] and
//! [`Session::complete`]; the HTTP call in between is theirs to schedule.
//! [`Session::submit`] runs the whole cycle inline for callers that can block.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use log::{debug, info};

use crate::client::{normalize_endpoint, Client, ClientError, RESEARCH_PATH};
use crate::messages::ResearchResponse;

/// Most recent queries kept in the history.
pub const HISTORY_LIMIT: usize = 15;

/// Example prompts offered on an empty transcript.
pub const SUGGESTIONS: [&str; 4] = [
    "Latest AI breakthroughs 2025",
    "Quantum computing progress",
    "Climate tech innovations",
    "Space exploration missions",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// What a transcript entry shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Text(String),
    /// Placeholder while a request is in flight.
    Thinking,
    Result(ResearchResponse),
    Error(String),
}

/// One transcript entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub kind: MessageKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub query: String,
    pub time: DateTime<Local>,
}

/// Running counters over successful responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub queries: u64,
    pub sources: u64,
    pub tools: u64,
    pub last_elapsed: Option<Duration>,
}

impl SessionStats {
    /// Last latency in seconds with one decimal, or `—` before any success.
    pub fn last_elapsed_label(&self) -> String {
        match self.last_elapsed {
            Some(d) => format!("{:.1}", d.as_secs_f64()),
            None => "—".to_string(),
        }
    }
}

/// A query accepted by [`Session::begin_query`] and awaiting its response.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub query: String,
    /// Endpoint at submission time; later edits do not affect this request.
    pub endpoint: String,
    pub thinking_id: u64,
    pub started: Instant,
}

#[derive(Debug)]
pub struct Session {
    messages: Vec<Message>,
    loading: bool,
    endpoint: String,
    history: VecDeque<HistoryEntry>,
    stats: SessionStats,
    next_id: u64,
}

impl Session {
    pub fn new(endpoint: &str) -> Self {
        Self {
            messages: Vec::new(),
            loading: false,
            endpoint: normalize_endpoint(endpoint),
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            stats: SessionStats::default(),
            next_id: 0,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn set_endpoint(&mut self, endpoint: &str) {
        self.endpoint = normalize_endpoint(endpoint);
        info!("endpoint set (endpoint={})", self.endpoint);
    }

    pub fn research_url(&self) -> String {
        format!("{}{}", self.endpoint, RESEARCH_PATH)
    }

    /// Query text of the history entry at `index` (0 = most recent).
    pub fn recall(&self, index: usize) -> Option<&str> {
        self.history.get(index).map(|h| h.query.as_str())
    }

    /// Accept a query: append the user message, record history, append the
    /// thinking placeholder and mark the session loading.
    ///
    /// Returns `None` without touching state when the trimmed query is empty
    /// or a request is already in flight.
    pub fn begin_query(&mut self, raw: &str) -> Option<PendingQuery> {
        let query = raw.trim();
        if query.is_empty() {
            return None;
        }
        if self.loading {
            debug!("query ignored, request already in flight");
            return None;
        }
        self.loading = true;

        self.push(Role::User, MessageKind::Text(query.to_string()));
        self.history.push_front(HistoryEntry {
            query: query.to_string(),
            time: Local::now(),
        });
        self.history.truncate(HISTORY_LIMIT);
        let thinking_id = self.push(Role::Assistant, MessageKind::Thinking);

        info!(
            "query accepted (query_len={}, endpoint={})",
            query.len(),
            self.endpoint
        );
        Some(PendingQuery {
            query: query.to_string(),
            endpoint: self.endpoint.clone(),
            thinking_id,
            started: Instant::now(),
        })
    }

    /// Settle `pending` using the wall time since it started.
    pub fn complete(
        &mut self,
        pending: PendingQuery,
        outcome: Result<ResearchResponse, ClientError>,
    ) {
        let elapsed = pending.started.elapsed();
        self.complete_after(pending, outcome, elapsed);
    }

    /// Settle `pending`: drop its placeholder, append the result or error and
    /// clear the loading flag. Stats only move on success.
    pub fn complete_after(
        &mut self,
        pending: PendingQuery,
        outcome: Result<ResearchResponse, ClientError>,
        elapsed: Duration,
    ) {
        self.messages.retain(|m| m.id != pending.thinking_id);
        match outcome {
            Ok(response) => {
                self.stats.queries += 1;
                self.stats.sources += response.sources.len() as u64;
                self.stats.tools += response.tools_used.len() as u64;
                self.stats.last_elapsed = Some(elapsed);
                info!(
                    "query completed (sources={}, tools_used={}, elapsed={:.1}s)",
                    response.sources.len(),
                    response.tools_used.len(),
                    elapsed.as_secs_f64()
                );
                self.push(Role::Assistant, MessageKind::Result(response));
            }
            Err(err) => {
                info!("query failed (status={:?})", err.status());
                self.push(Role::Assistant, MessageKind::Error(err.to_string()));
            }
        }
        self.loading = false;
    }

    /// Run one full request cycle against the session's endpoint.
    /// Returns `false` when the query was not accepted.
    pub async fn submit(&mut self, client: &Client, raw: &str) -> bool {
        let Some(pending) = self.begin_query(raw) else {
            return false;
        };
        let outcome = client
            .with_endpoint(&pending.endpoint)
            .research(&pending.query)
            .await;
        self.complete(pending, outcome);
        true
    }

    fn push(&mut self, role: Role, kind: MessageKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message { id, role, kind });
        id
    }
}
