//! API error type and its JSON rendering.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Json, Response},
};
use bingo_engine::{ErrorKind, GameError};
use serde::Serialize;
use std::time::Duration;

/// Error body: `{ok: false, error, kind}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    pub kind: &'static str,
}

/// Errors returned by HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Game(#[from] GameError),

    /// Malformed request body or parameters
    #[error("{0}")]
    BadRequest(String),

    #[error("Missing or invalid API key")]
    Unauthorized,

    #[error("Too many requests, retry in {} seconds", .retry_after.as_secs().max(1))]
    RateLimited { retry_after: Duration },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Game(e) => match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::InvalidState => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Machine-readable error category
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Game(e) => match e.kind() {
                ErrorKind::NotFound => "not_found",
                ErrorKind::Conflict => "conflict",
                ErrorKind::InvalidState => "invalid_state",
                ErrorKind::Validation => "validation",
            },
            ApiError::BadRequest(_) => "validation",
            ApiError::Unauthorized => "unauthorized",
            ApiError::RateLimited { .. } => "rate_limited",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            ok: false,
            error: self.to_string(),
            kind: self.kind(),
        });

        let mut response = (status, body).into_response();
        if let ApiError::RateLimited { retry_after } = &self
            && let Ok(value) = HeaderValue::from_str(&retry_after.as_secs().max(1).to_string())
        {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bingo_engine::Stage;

    #[test]
    fn test_status_follows_error_kind() {
        let cases = [
            (GameError::GameNotFound("x".to_string()), StatusCode::NOT_FOUND),
            (GameError::DuplicatePending, StatusCode::CONFLICT),
            (
                GameError::StageMismatch(Stage::Single),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                GameError::Validation("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = ApiError::RateLimited {
            retry_after: Duration::from_millis(2500),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(RETRY_AFTER).unwrap(), "2");
    }

    #[test]
    fn test_error_message_passes_through() {
        let err = ApiError::from(GameError::AlreadyCalled(42));
        assert_eq!(err.to_string(), GameError::AlreadyCalled(42).to_string());
        assert_eq!(err.kind(), "conflict");
    }
}
