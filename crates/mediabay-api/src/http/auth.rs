//! Session authentication middleware for the HTTP layer.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use crate::http::constants::BEARER_PREFIX;
use crate::http::errors::ApiError;
use crate::state::ApiState;

/// Validates the bearer token on every protected route and attaches the
/// resolved [`crate::sessions::CurrentUser`] to the request extensions.
/// Failures short-circuit before any handler or store access.
pub(crate) async fn require_session(
    State(state): State<Arc<ApiState>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(AUTHORIZATION)
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("missing authorization header"))?;
    let token = header_value
        .to_str()
        .map_err(|_| ApiError::bad_request("authorization header must be valid UTF-8"))?
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| ApiError::unauthorized("authorization header must use the bearer scheme"))?
        .trim()
        .to_string();

    let user = state
        .sessions
        .authenticate(&token)
        .await
        .map_err(|err| {
            error!(error = %err, "failed to verify session token");
            ApiError::internal("failed to verify session token")
        })?;

    let Some(user) = user else {
        warn!("rejected request with invalid session token");
        return Err(ApiError::unauthorized("invalid or expired session token"));
    };

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
