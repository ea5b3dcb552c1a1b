//! Completion gateway: the single seam between the assistant and the hosted
//! language model.

use async_trait::async_trait;
use thiserror::Error;

pub mod openai;

pub use openai::OpenAiCompletionGateway;

/// Failure of a remote completion. Always recoverable from the session's point
/// of view.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service is not configured: {0}")]
    NotConfigured(String),
    #[error("completion request failed: {0}")]
    Request(String),
    #[error("completion service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("completion service returned an empty answer")]
    EmptyResponse,
}

impl CompletionError {
    /// Short machine-friendly kind, used when annotating degraded output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => "NotConfigured",
            Self::Request(_) => "RequestError",
            Self::Status { .. } => "StatusError",
            Self::EmptyResponse => "EmptyResponse",
        }
    }
}

/// One system + user exchange sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[async_trait]
pub trait CompletionGateway: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new("sys", "user")
            .with_temperature(0.2)
            .with_max_tokens(700);

        assert_eq!(request.system, "sys");
        assert_eq!(request.user, "user");
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, Some(700));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            CompletionError::Request("timeout".to_string()).kind(),
            "RequestError"
        );
        assert_eq!(CompletionError::EmptyResponse.kind(), "EmptyResponse");
        let err = CompletionError::Status {
            status: 429,
            message: "quota".to_string(),
        };
        assert_eq!(err.to_string(), "completion service returned 429: quota");
    }
}
