use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;

use crate::{ApiError, AppState};

/// Header carrying the pre-shared server key.
pub const SERVER_KEY_HEADER: &str = "x-server-key";

/// Axum middleware guarding the trigger with an optional pre-shared key.
///
/// When `KICKOFF_SERVER_KEY` is not configured every request passes through,
/// matching an unauthenticated Cloud Run service fronted by IAM. When it is,
/// the `X-Server-Key` header must match exactly.
///
/// Usage:
/// ```rust,no_run
/// use axum::{Router, middleware, routing::post};
/// use kickoff::{AppState, ServerKeyAuth};
/// use kickoff_core::WorkflowConfig;
///
/// async fn handler() -> &'static str { "ok" }
///
/// let state = AppState::new(None, None, WorkflowConfig::default());
/// let app: Router = Router::new()
///     .route("/", post(handler))
///     .layer(middleware::from_fn_with_state(state.clone(), ServerKeyAuth::verify))
///     .with_state(state);
/// ```
pub struct ServerKeyAuth;

impl ServerKeyAuth {
    pub async fn verify(
        State(state): State<AppState>,
        request: Request,
        next: Next,
    ) -> Result<Response, ApiError> {
        let Some(expected) = state.server_key.as_ref() else {
            return Ok(next.run(request).await);
        };

        let provided = request
            .headers()
            .get(SERVER_KEY_HEADER)
            // arch-lint: allow(no-silent-result-drop) reason="non-ASCII HeaderValue is invalid for server key; treating as absent"
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!(path = %request.uri(), "missing X-Server-Key header");
                ApiError::Unauthorized
            })?;

        if !constant_time_eq(provided.as_bytes(), expected.expose_secret().as_bytes()) {
            tracing::warn!(path = %request.uri(), "invalid server key");
            return Err(ApiError::Unauthorized);
        }

        tracing::debug!(path = %request.uri(), "authenticated via server key");
        Ok(next.run(request).await)
    }
}

/// Constant-time byte comparison to prevent timing attacks on server key validation.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
