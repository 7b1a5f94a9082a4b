use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::service::{IntakeForm, MSG_CREATED, MSG_DELETED};
use crate::tramite::{TemplateKind, Tramite, TramiteStatus};
use crate::workflow::StatusUpdate;
use crate::worklist::{Page, WorklistFilter};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tramites", post(create_tramite).get(list_tramites))
        .route(
            "/tramites/{id}",
            get(get_tramite).patch(update_tramite).delete(delete_tramite),
        )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedBody {
    message: &'static str,
    id: i64,
    numero_expediente: Option<String>,
}

async fn create_tramite(
    State(svc): State<AppState>,
    form: Result<Json<IntakeForm>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedBody>), ApiError> {
    let Json(form) = form?;
    let tramite = svc.create_from_form(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedBody {
            message: MSG_CREATED,
            id: tramite.id,
            numero_expediente: tramite.case_number,
        }),
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorklistQuery {
    numero_expediente: Option<String>,
    nombre_cliente: Option<String>,
    cups: Option<String>,
    estado: Option<String>,
    page: Option<usize>,
    per_page: Option<usize>,
}

impl WorklistQuery {
    fn filter(&self) -> Result<WorklistFilter, ApiError> {
        let status = match self.estado.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                raw.parse::<TramiteStatus>()
                    .map_err(|e| ApiError::bad_request(e.to_string()))?,
            ),
            None => None,
        };
        Ok(WorklistFilter {
            case_number: self.numero_expediente.clone(),
            client_name: self.nombre_cliente.clone(),
            cups: self.cups.clone(),
            status,
        })
    }
}

async fn list_tramites(
    State(svc): State<AppState>,
    query: Result<Query<WorklistQuery>, QueryRejection>,
) -> Result<Json<Page<Tramite>>, ApiError> {
    let Query(query) = query?;
    let filter = query.filter()?;
    let page = svc.worklist(&filter, query.page, query.per_page).await?;
    Ok(Json(page))
}

async fn get_tramite(
    State(svc): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Tramite>, ApiError> {
    let Path(id) = id?;
    Ok(Json(svc.get(id).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBody {
    numero_expediente: Option<String>,
    estado: Option<String>,
    cups: Option<String>,
    #[serde(default)]
    enviar_correo: bool,
    email_template_type: Option<String>,
    mensaje_incidencia: Option<String>,
}

impl UpdateBody {
    fn status_update(&self) -> Result<StatusUpdate, ApiError> {
        let status = self
            .estado
            .as_deref()
            .map(str::parse::<TramiteStatus>)
            .transpose()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        let template_kind = self
            .email_template_type
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(str::parse::<TemplateKind>)
            .transpose()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        Ok(StatusUpdate {
            case_number: self.numero_expediente.clone(),
            status,
            cups: self.cups.clone(),
            notify: self.enviar_correo,
            template_kind,
            incident_message: self.mensaje_incidencia.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatedBody {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn update_tramite(
    State(svc): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<UpdatedBody>, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let update = body.status_update()?;
    let outcome = svc.update_status(id, update).await?;

    Ok(Json(UpdatedBody {
        message: outcome.message(),
        email_sent: outcome.email_sent(),
        error: outcome.notification_error().map(str::to_string),
    }))
}

async fn delete_tramite(
    State(svc): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Path(id) = id?;
    svc.delete(id).await?;
    Ok(Json(serde_json::json!({ "message": MSG_DELETED })))
}
