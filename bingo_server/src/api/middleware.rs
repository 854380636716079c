//! Admin authentication middleware.
//!
//! Admin endpoints require a configured API key, sent either as
//! `X-API-Key: <key>` or `Authorization: Bearer <key>`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::post, middleware};
//! # use bingo_server::api::middleware::api_key_middleware;
//! # use bingo_server::api::AppState;
//! # async fn handler() {}
//! # let state: AppState = unimplemented!();
//!
//! let admin_routes: Router<AppState> = Router::new()
//!     .route("/bingo/roll", post(handler))
//!     .layer(middleware::from_fn_with_state(state.clone(), api_key_middleware));
//! # let _ = admin_routes;
//! ```

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use super::{AppState, error::ApiError};
use crate::{logging::log_security_event, metrics};

/// Header carrying the admin API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extract the presented key from `X-API-Key` or a bearer token
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
        })
        .map(str::trim)
        .filter(|key| !key.is_empty())
}

/// Compare against every configured key without short-circuiting
fn key_matches(presented: &str, keys: &[String]) -> bool {
    keys.iter().fold(false, |found, key| {
        found | bool::from(presented.as_bytes().ct_eq(key.as_bytes()))
    })
}

/// Rejects requests without a valid admin API key.
///
/// - **Valid key**: Calls next handler
/// - **Missing or unknown key**: Returns `401 Unauthorized` with a JSON error body
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = presented_key(request.headers())
        .is_some_and(|key| key_matches(key, &state.api_keys));

    if !authorized {
        metrics::api_key_rejections_total();
        log_security_event(
            "invalid_api_key",
            Some(request.uri().path()),
            "Rejected admin request",
        );
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn keys() -> Vec<String> {
        vec![
            "first-admin-key-0001".to_string(),
            "second-admin-key-002".to_string(),
        ]
    }

    #[test]
    fn test_key_from_x_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("first-admin-key-0001"));
        assert_eq!(presented_key(&headers), Some("first-admin-key-0001"));
    }

    #[test]
    fn test_key_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_static("Bearer second-admin-key-002"),
        );
        assert_eq!(presented_key(&headers), Some("second-admin-key-002"));
    }

    #[test]
    fn test_missing_key() {
        let mut headers = HeaderMap::new();
        assert_eq!(presented_key(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(presented_key(&headers), None);
    }

    #[test]
    fn test_key_matches() {
        assert!(key_matches("first-admin-key-0001", &keys()));
        assert!(key_matches("second-admin-key-002", &keys()));
        assert!(!key_matches("first-admin-key-000", &keys()));
        assert!(!key_matches("", &keys()));
        assert!(!key_matches("anything", &[]));
    }
}
