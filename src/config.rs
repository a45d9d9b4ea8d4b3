use crate::error::{AgentError, Result};
use std::time::Duration;

/// Minimum gap between two successful dispatches
pub const DEFAULT_MIN_SEND_INTERVAL: Duration = Duration::from_millis(10_000);

/// How often the current URL is compared against the last one seen
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_000);

/// Upper bound for a single collector request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tags whose text children are never harvested
pub const DEFAULT_EXCLUDED_TAGS: [&str; 5] = ["script", "style", "noscript", "code", "pre"];

/// Attributes scanned for translatable values, in scan order
pub const DEFAULT_SCANNED_ATTRIBUTES: [&str; 4] = ["placeholder", "alt", "title", "aria-label"];

/// Static agent configuration, fixed for the lifetime of an attached agent
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Project the harvested phrases belong to
    pub project_key: String,

    /// Collector endpoint receiving the phrase batches
    pub endpoint: String,

    /// Minimum interval between dispatches
    pub min_send_interval: Duration,

    /// Lowercase tag names excluded from text scanning
    pub excluded_tags: Vec<String>,

    /// Attribute names whose values are harvested
    pub scanned_attributes: Vec<String>,

    /// URL polling period
    pub poll_interval: Duration,

    /// Timeout applied to each collector request
    pub request_timeout: Duration,
}

impl AgentConfig {
    /// Create a configuration with default timings and tag/attribute sets
    pub fn new(project_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            endpoint: endpoint.into(),
            min_send_interval: DEFAULT_MIN_SEND_INTERVAL,
            excluded_tags: DEFAULT_EXCLUDED_TAGS.iter().map(|t| t.to_string()).collect(),
            scanned_attributes: DEFAULT_SCANNED_ATTRIBUTES.iter().map(|a| a.to_string()).collect(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Builder method: set the minimum send interval
    pub fn min_send_interval(mut self, interval: Duration) -> Self {
        self.min_send_interval = interval;
        self
    }

    /// Builder method: replace the excluded tag set
    pub fn excluded_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_tags = tags.into_iter().map(|t| t.into().to_ascii_lowercase()).collect();
        self
    }

    /// Builder method: replace the scanned attribute set
    pub fn scanned_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scanned_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method: set the URL polling period
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builder method: set the collector request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check that the configuration can drive an agent
    pub fn validate(&self) -> Result<()> {
        if self.project_key.trim().is_empty() {
            return Err(AgentError::InvalidConfig("project key is empty".to_string()));
        }

        let endpoint = self.endpoint.trim();
        let host = endpoint
            .strip_prefix("https://")
            .or_else(|| endpoint.strip_prefix("http://"));
        if host.is_none_or(str::is_empty) {
            return Err(AgentError::InvalidConfig(format!(
                "endpoint '{}' is not an absolute http(s) URL",
                self.endpoint
            )));
        }

        if self.poll_interval.is_zero() {
            return Err(AgentError::InvalidConfig("poll interval must be positive".to_string()));
        }

        Ok(())
    }
}
