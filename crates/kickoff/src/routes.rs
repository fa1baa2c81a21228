use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::post,
};
use kickoff_core::TriggerResponse;
use tower_http::trace::TraceLayer;

use crate::{ApiError, AppState, ServerKeyAuth, workflow::run_trigger};

const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// The service's router: `POST /` starts the workflow, `OPTIONS /` answers
/// CORS preflight. Other methods on `/` get `405 Method Not Allowed`.
pub fn router(state: AppState) -> Router {
    let trigger = post(start_workflow)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            ServerKeyAuth::verify,
        ))
        .options(preflight);

    Router::new()
        .route("/", trigger)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn preflight(State(state): State<AppState>) -> impl IntoResponse {
    let allowed_headers = if state.server_key.is_some() {
        format!("{ALLOWED_HEADERS}, X-Server-Key")
    } else {
        ALLOWED_HEADERS.to_owned()
    };

    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_owned()),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS".to_owned()),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, allowed_headers),
            (header::ACCESS_CONTROL_MAX_AGE, "3600".to_owned()),
        ],
    )
}

async fn start_workflow(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let (Some(store), Some(publisher)) = (state.store.as_deref(), state.publisher.as_deref())
    else {
        tracing::error!("a critical component (Firestore or Pub/Sub) is not initialized");
        return Err(ApiError::NotConfigured);
    };

    tracing::info!(
        status = %state.workflow.pending_status,
        "workflow trigger received"
    );

    let summary = run_trigger(store, publisher, &state.workflow)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "an error occurred during workflow execution");
            ApiError::Internal(e)
        })?;

    Ok((
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(TriggerResponse::from(summary)),
    ))
}
