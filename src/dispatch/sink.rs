use crate::dispatch::payload::PhrasePayload;
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Destination for phrase batches
#[async_trait]
pub trait PhraseSink: Send + Sync {
    /// Deliver one batch. Resolves to the collector's JSON reply on a 2xx
    /// answer with a parseable body, and to an error otherwise.
    async fn submit(&self, payload: &PhrasePayload) -> Result<serde_json::Value>;
}

/// Posts phrase batches to an HTTP collector
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSink {
    /// Create a sink for `endpoint` with a per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AgentError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint: endpoint.into() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PhraseSink for HttpSink {
    async fn submit(&self, payload: &PhrasePayload) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Rejected { status: status.as_u16() });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AgentError::MalformedResponse(e.to_string()))
    }
}
