//! JSON HTTP API used by the staff dashboard and the public lookup page.

pub mod lookup;
pub mod tramites;

use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::error;

use crate::service::{ServiceError, TramiteService, MSG_NO_MATCH};
use crate::workflow::status_update::MSG_NOT_FOUND;

/// Shared application state.
pub type AppState = Arc<TramiteService>;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(tramites::routes())
        .merge(lookup::routes())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Error response body: `{"message": ..., "error": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            error: None,
        }
    }
}

const MSG_BAD_REQUEST: &str = "Datos de la solicitud no válidos";

impl ApiError {
    /// Extractor failures keep axum's status; its text goes in `error`.
    fn rejected(status: StatusCode, detail: String) -> Self {
        Self {
            status,
            message: MSG_BAD_REQUEST.to_string(),
            error: Some(detail),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(message) => ApiError::bad_request(message),
            ServiceError::NotFound { .. } => ApiError {
                status: StatusCode::NOT_FOUND,
                message: MSG_NOT_FOUND.to_string(),
                error: None,
            },
            ServiceError::NoMatch { .. } => ApiError {
                status: StatusCode::NOT_FOUND,
                message: MSG_NO_MATCH.to_string(),
                error: None,
            },
            ServiceError::Persistence { context, source } => {
                error!("{}: {}", context, source);
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: context.to_string(),
                    error: Some(source.to_string()),
                }
            }
        }
    }
}
