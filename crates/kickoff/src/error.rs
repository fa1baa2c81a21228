use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use kickoff_cloud::CloudError;
use kickoff_core::ErrorResponse;

/// Failures returned by the trigger endpoint.
///
/// Response bodies stay generic; the cause is logged where the error is raised.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Firestore or Pub/Sub client is not initialized")]
    NotConfigured,

    #[error("missing or invalid server key")]
    Unauthorized,

    #[error("workflow execution failed")]
    Internal(#[source] CloudError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotConfigured | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::NotConfigured => "Server configuration error.",
            Self::Unauthorized => "Unauthorized.",
            Self::Internal(_) => "An internal error occurred.",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
            Json(ErrorResponse::new(self.public_message())),
        )
            .into_response()
    }
}

/// Why a backend client could not be built at startup.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("{0} is not set")]
    MissingSetting(&'static str),

    #[error(transparent)]
    Cloud(#[from] CloudError),
}
