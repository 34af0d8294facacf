//! Request gating middleware
//!
//! Two independent gates protect the API:
//!
//! - [`AuthUser`]: an extractor that verifies the bearer access token on
//!   protected routes. A missing Authorization header fails closed with
//!   401; a present but unverifiable token is rejected with 403.
//! - [`require_api_key`]: a layer applied to every `/api` route that
//!   checks the shared `x-api-key` header. This gate is independent of
//!   the per-user token gate.
//!
//! Neither gate attempts a token refresh; refresh is an explicit,
//! client-initiated call.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Name of the shared API-key header
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authenticated identity extracted from a verified access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // Missing header fails closed with 401.
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        // Anything present but unverifiable is 403 from here on.
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Forbidden("Invalid authorization format".to_string()))?;

        let claims = app_state
            .jwt()
            .verify_access_token(token)
            .map_err(|_| ApiError::Forbidden("Invalid access token".to_string()))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Forbidden("Invalid user ID in token".to_string()))?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
        })
    }
}

/// API-key gate applied to the `/api` router
///
/// Compares the `x-api-key` header against the configured value and
/// rejects with 401 on a missing or mismatched key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(key) if key == state.config().api.key => Ok(next.run(request).await),
        _ => Err(ApiError::Unauthorized(
            "Access denied. Invalid or missing API key.".to_string(),
        )),
    }
}
