use thiserror::Error;

/// Errors raised while hosting the phrase agent on a page
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Script evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Failed to read DOM snapshot: {0}")]
    DomParseFailed(String),

    #[error("Failed to install page hooks: {0}")]
    HookInstallFailed(String),

    /// The request never completed (unreachable host, timeout, aborted)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The collector answered with a non-2xx status
    #[error("Collector rejected phrases with status {status}")]
    Rejected { status: u16 },

    #[error("Collector returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;
