use async_trait::async_trait;

/// The chat-completion capability: a system instruction plus one user message in,
/// the model's raw text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}

/// Transport-level failures. A reply that arrives but cannot be parsed is not
/// an error at this level.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(String),
    #[error("completion request timed out")]
    Timeout,
    #[error("completion endpoint returned HTTP {status}")]
    Status { status: u16, body: String },
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),
    #[error("completion client misconfigured: {0}")]
    Config(String),
}
