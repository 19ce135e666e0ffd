//! Bearer-token authentication.

use crate::{ApiError, AppState};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// Proof that the request carried the configured API token.
///
/// Add it as a handler argument to protect a route.
#[derive(Debug, Clone, Copy)]
pub struct Authorized;

#[axum::async_trait]
impl FromRequestParts<AppState> for Authorized {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        if tokens_match(token.trim(), state.config().api_token()) {
            Ok(Authorized)
        } else {
            tracing::warn!("Rejected request with invalid token");
            Err(ApiError::unauthorized("Invalid token"))
        }
    }
}

/// Compare without short-circuiting on the first differing byte.
fn tokens_match(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    if given.len() != expected.len() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
