//! HTTP message types exchanged with the research backend. Client ↔ server JSON.

use serde::{Deserialize, Serialize};

/// Client → server: body of `POST /research`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

impl<'a> QueryRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }
}

/// Server → client: structured research result.
///
/// Missing `sources` / `tools_used` arrays are treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResponse {
    pub topic: String,
    pub summary: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub tools_used: Vec<String>,
}

impl ResearchResponse {
    /// Plain-text rendering used by the CLI.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.topic);
        out.push_str("\n\n");
        out.push_str(&self.summary);
        out.push('\n');
        if !self.sources.is_empty() {
            out.push_str("\nSources:\n");
            for source in &self.sources {
                out.push_str("  ");
                out.push_str(source);
                out.push('\n');
            }
        }
        if !self.tools_used.is_empty() {
            out.push_str("\nTools used:\n");
            for tool in &self.tools_used {
                out.push_str("  ");
                out.push_str(tool);
                out.push('\n');
            }
        }
        out
    }
}

/// Server → client: response of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}
