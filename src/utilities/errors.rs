//! Error types for MoodyBot.
//!
//! One enum per concern. [`ApiError`] is the only one that crosses the HTTP
//! boundary; it renders as `{"error": "<message>"}` with a matching status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors from the LLM provider client.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key configured.
    #[error("OpenRouter API key not set. Set OPENROUTER_API_KEY in the environment.")]
    MissingApiKey,

    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned 429.
    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    /// Provider returned 401.
    #[error("API key is invalid or missing: {0}")]
    Unauthorized(String),

    /// Provider returned 400.
    #[error("Invalid request format: {0}")]
    BadRequest(String),

    /// Any other non-success status.
    #[error("OpenRouter API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The response body could not be interpreted.
    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    /// Too many consecutive failures; calls are short-circuited.
    #[error("Service temporarily unavailable (circuit open)")]
    CircuitOpen,
}

impl LlmError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(_) => true,
            LlmError::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether a failure that exhausted its retries counts toward the circuit
    /// breaker. Only transport failures do; status errors never open it.
    pub fn trips_breaker(&self) -> bool {
        matches!(self, LlmError::Http(_))
    }

    /// In-character reply shown to the user when a chat call fails.
    pub fn user_message(&self) -> &'static str {
        match self {
            LlmError::MissingApiKey => {
                "MoodyBot is not properly configured. Please check the API key setup."
            }
            LlmError::Http(_) => {
                "MoodyBot is having connection issues. Please check your internet and try again."
            }
            LlmError::RateLimited => {
                "MoodyBot is getting too many requests. Please try again in a moment."
            }
            LlmError::Unauthorized(_) => "MoodyBot's API key is invalid. Please contact support.",
            LlmError::BadRequest(_) => {
                "MoodyBot received an invalid request. Please try rephrasing your message."
            }
            _ => "MoodyBot is in a bad mood. Try again later.",
        }
    }
}

/// Errors from the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Username already exists: {0}")]
    UsernameTaken(String),
}

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unknown chat mode: {0}")]
    UnknownMode(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::Store(StoreError::NotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Store(StoreError::UsernameTaken(_)) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) | ApiError::UnknownMode(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Llm(LlmError::CircuitOpen) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Llm(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(!LlmError::RateLimited.is_retryable());
        assert!(!LlmError::RateLimited.trips_breaker());
        assert!(!LlmError::Upstream { status: 503, body: String::new() }.trips_breaker());
        assert!(!LlmError::CircuitOpen.trips_breaker());
        assert!(LlmError::Upstream { status: 503, body: String::new() }.is_retryable());
        assert!(!LlmError::Upstream { status: 404, body: String::new() }.is_retryable());
        assert!(!LlmError::BadRequest("x".into()).is_retryable());
        assert!(!LlmError::MissingApiKey.is_retryable());
    }

    #[test]
    fn test_user_messages() {
        assert!(LlmError::RateLimited.user_message().contains("too many requests"));
        assert!(LlmError::MissingApiKey.user_message().contains("not properly configured"));
        assert_eq!(
            LlmError::CircuitOpen.user_message(),
            "MoodyBot is in a bad mood. Try again later."
        );
    }

    #[test]
    fn test_api_error_status_mapping() {
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Store(StoreError::NotFound { entity: "Session", id: 3 }).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::UnknownMode("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Llm(LlmError::CircuitOpen).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(ApiError::Llm(LlmError::RateLimited).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_store_error_message() {
        let err = StoreError::NotFound { entity: "Session", id: 7 };
        assert_eq!(err.to_string(), "Session 7 not found");
    }
}
