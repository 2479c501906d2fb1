//! HTTP client: send a research query, probe backend health.

use log::{debug, info, warn};
use thiserror::Error;

use crate::messages::{QueryRequest, ResearchResponse, ServiceStatus};

/// Path of the research route, relative to the endpoint.
pub const RESEARCH_PATH: &str = "/research";

/// Errors surfaced to the user from a backend call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-2xx status.
    #[error("Server error {status}: {body}")]
    Status { status: u16, body: String },
    /// The request never completed (refused, DNS, reset).
    #[error(
        "Could not connect to {url}\n\nMake sure your FastAPI backend is running:\n  uvicorn main:app --reload"
    )]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// A 2xx body that is not the documented JSON shape.
    #[error("Invalid response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ClientError {
    /// Numeric HTTP status, when the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Strip trailing slashes so `{endpoint}{path}` never doubles them.
pub fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}

/// Research backend client bound to one endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
}

impl Client {
    /// Create a client for `endpoint` (e.g. `http://localhost:8000`).
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: normalize_endpoint(endpoint),
        }
    }

    /// Same connection pool, different endpoint.
    pub fn with_endpoint(&self, endpoint: &str) -> Self {
        Self {
            http: self.http.clone(),
            endpoint: normalize_endpoint(endpoint),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn research_url(&self) -> String {
        format!("{}{}", self.endpoint, RESEARCH_PATH)
    }

    /// `POST {endpoint}/research` with `{"query": ...}`.
    pub async fn research(&self, query: &str) -> Result<ResearchResponse, ClientError> {
        let url = self.research_url();
        info!("sending research query (url={}, query_len={})", url, query.len());

        let response = self
            .http
            .post(&url)
            .json(&QueryRequest::new(query))
            .send()
            .await
            .map_err(|source| connect_error(&url, source))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| connect_error(&url, source))?;

        if !status.is_success() {
            warn!("research backend returned {} (url={})", status.as_u16(), url);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ResearchResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode {
                url: url.clone(),
                message: e.to_string(),
            })?;
        debug!(
            "research response parsed (sources={}, tools_used={})",
            parsed.sources.len(),
            parsed.tools_used.len()
        );
        Ok(parsed)
    }

    /// `GET {endpoint}/`; the backend answers with its status.
    pub async fn health(&self) -> Result<ServiceStatus, ClientError> {
        let url = format!("{}/", self.endpoint);
        debug!("probing backend health (url={})", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| connect_error(&url, source))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| connect_error(&url, source))?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

fn connect_error(url: &str, source: reqwest::Error) -> ClientError {
    warn!("request to {} failed: {}", url, source);
    ClientError::Connect {
        url: url.to_string(),
        source,
    }
}
