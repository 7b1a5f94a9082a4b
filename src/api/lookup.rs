use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::service::{LookupKey, PublicStatus, ServiceError};

const MSG_MISSING_PARAMS: &str = "Se requieren los parámetros tipo y valor";

pub fn routes() -> Router<AppState> {
    Router::new().route("/expedientes/consulta", get(lookup_expediente))
}

#[derive(Debug, Deserialize)]
struct LookupQuery {
    tipo: Option<String>,
    valor: Option<String>,
}

async fn lookup_expediente(
    State(svc): State<AppState>,
    query: Result<Query<LookupQuery>, QueryRejection>,
) -> Result<Json<PublicStatus>, ApiError> {
    let Query(query) = query?;
    let (Some(tipo), Some(valor)) = (
        query.tipo.filter(|t| !t.is_empty()),
        query.valor.filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::bad_request(MSG_MISSING_PARAMS));
    };

    let key: LookupKey = tipo.parse().map_err(ServiceError::from)?;
    Ok(Json(svc.lookup(key, &valor).await?))
}

#[cfg(test)]
mod tests {
    use super::super::{router, test_support::api};
    use crate::email::MockEmailNotifier;
    use crate::service::TramiteService;
    use crate::store::MockTramiteStore;
    use crate::tramite::{Documents, KindDetails, Tramite, TramiteKind, TramiteStatus};
    use axum::http::StatusCode;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn cancelled() -> Tramite {
        Tramite {
            id: 21,
            case_number: Some("EXP-21".to_string()),
            kind: TramiteKind::Modificacion,
            form_label: "Modificación".to_string(),
            client_name: "Iván".to_string(),
            email: "ivan@example.com".to_string(),
            phone: "677".to_string(),
            cups: "ES0077".to_string(),
            address: "Paseo del Prado 1".to_string(),
            cadastral_ref: "RC-21".to_string(),
            voltage: None,
            power: "4.6".to_string(),
            status: TramiteStatus::Cancelled,
            opened_at: Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap(),
            details: KindDetails::default(),
            documents: Documents::default(),
        }
    }

    fn router_with(store: MockTramiteStore) -> axum::Router {
        let service = TramiteService::new(Arc::new(store), Arc::new(MockEmailNotifier::new()));
        router(Arc::new(service))
    }

    #[tokio::test]
    async fn test_lookup_by_case_number() {
        let mut store = MockTramiteStore::new();
        store
            .expect_find_by_case_number()
            .withf(|case_number| case_number == "EXP-21")
            .returning(|_| Ok(Some(cancelled())));
        let router = router_with(store);

        let (status, body) = api(
            &router,
            "GET",
            "/api/expedientes/consulta?tipo=expediente&valor=EXP-21",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["numeroExpediente"], "EXP-21");
        assert_eq!(body["fechaCreacion"], "2025-03-04");
        assert_eq!(body["comentarios"], "Su expediente ha sido anulado");
    }

    #[tokio::test]
    async fn test_lookup_errors() {
        let mut store = MockTramiteStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        let router = router_with(store);

        let (status, body) = api(&router, "GET", "/api/expedientes/consulta?tipo=email", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Se requieren los parámetros tipo y valor");

        let (status, body) = api(
            &router,
            "GET",
            "/api/expedientes/consulta?tipo=dni&valor=123",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "El tipo debe ser expediente o email");

        let (status, body) = api(
            &router,
            "GET",
            "/api/expedientes/consulta?tipo=email&valor=nadie%40example.com",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["message"],
            "No se encontró ningún expediente con los datos proporcionados"
        );
    }
}
