//! API error handling for consistent JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::logs::LogError;
use crate::speech::SpeechError;

/// API error type that converts to JSON responses.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": true,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<LogError> for ApiError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::NotFound(_) => Self::not_found("Log não encontrado"),
            LogError::InvalidName(_) => Self::bad_request(err.to_string()),
            LogError::AlreadyExists(_) => Self::new(StatusCode::CONFLICT, err.to_string()),
            LogError::Storage(e) => Self::internal(e.to_string()),
        }
    }
}

impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::EmptyAudio => Self::bad_request(err.to_string()),
            SpeechError::NotConfigured(_) => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            SpeechError::Request(_) | SpeechError::Status { .. } => {
                Self::new(StatusCode::BAD_GATEWAY, err.to_string())
            }
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_errors_map_to_status() {
        assert_eq!(
            ApiError::from(LogError::NotFound("a".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(LogError::InvalidName("..".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(LogError::AlreadyExists("b".into())).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_speech_errors_map_to_status() {
        assert_eq!(
            ApiError::from(SpeechError::EmptyAudio).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SpeechError::NotConfigured("key".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(SpeechError::Status {
                status: 429,
                message: "quota".into()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
