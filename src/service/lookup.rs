use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::tramite::{Tramite, TramiteKind, TramiteStatus};

pub const COMMENT_FINISHED: &str = "Su expediente ha sido completado satisfactoriamente";
pub const COMMENT_CANCELLED: &str = "Su expediente ha sido anulado";
pub const COMMENT_IN_PROGRESS: &str = "Su expediente está siendo procesado por nuestro equipo";

/// What the requester searches by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    CaseNumber,
    Email,
}

impl LookupKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKey::CaseNumber => "expediente",
            LookupKey::Email => "email",
        }
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("El tipo debe ser expediente o email")]
pub struct UnknownLookupKey(pub String);

impl FromStr for LookupKey {
    type Err = UnknownLookupKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expediente" => Ok(LookupKey::CaseNumber),
            "email" => Ok(LookupKey::Email),
            other => Err(UnknownLookupKey(other.to_string())),
        }
    }
}

/// Reduced view of a trámite shown to the requester.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStatus {
    pub id: i64,
    pub numero_expediente: Option<String>,
    pub tipo: TramiteKind,
    pub nombre_cliente: String,
    pub email: String,
    pub cups: String,
    pub direccion: String,
    pub estado: TramiteStatus,
    pub fecha_creacion: String,
    pub comentarios: &'static str,
}

impl From<&Tramite> for PublicStatus {
    fn from(tramite: &Tramite) -> Self {
        Self {
            id: tramite.id,
            numero_expediente: tramite.case_number.clone(),
            tipo: tramite.kind,
            nombre_cliente: tramite.client_name.clone(),
            email: tramite.email.clone(),
            cups: tramite.cups.clone(),
            direccion: tramite.address.clone(),
            estado: tramite.status,
            fecha_creacion: tramite.opened_at.format("%Y-%m-%d").to_string(),
            comentarios: comment_for(tramite.status),
        }
    }
}

pub fn comment_for(status: TramiteStatus) -> &'static str {
    match status {
        TramiteStatus::Finished => COMMENT_FINISHED,
        TramiteStatus::Cancelled => COMMENT_CANCELLED,
        _ => COMMENT_IN_PROGRESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tramite::{Documents, KindDetails};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_lookup_key_parsing() {
        assert_eq!("expediente".parse::<LookupKey>(), Ok(LookupKey::CaseNumber));
        assert_eq!("email".parse::<LookupKey>(), Ok(LookupKey::Email));
        let err = "telefono".parse::<LookupKey>().unwrap_err();
        assert_eq!(err.to_string(), "El tipo debe ser expediente o email");
    }

    #[test]
    fn test_comment_depends_on_status() {
        assert_eq!(comment_for(TramiteStatus::Finished), COMMENT_FINISHED);
        assert_eq!(comment_for(TramiteStatus::Cancelled), COMMENT_CANCELLED);
        assert_eq!(comment_for(TramiteStatus::PaymentManagement), COMMENT_IN_PROGRESS);
        assert_eq!(comment_for(TramiteStatus::PendingSubmission), COMMENT_IN_PROGRESS);
    }

    #[test]
    fn test_public_view_serializes_creation_date() {
        let tramite = Tramite {
            id: 11,
            case_number: Some("EXP-11".to_string()),
            kind: TramiteKind::Alta,
            form_label: "Alta".to_string(),
            client_name: "Rosa".to_string(),
            email: "rosa@example.com".to_string(),
            phone: "699".to_string(),
            cups: "ES0099".to_string(),
            address: "Camino Real 8".to_string(),
            cadastral_ref: "RC-11".to_string(),
            voltage: Some("230".to_string()),
            power: "9.2".to_string(),
            status: TramiteStatus::Finished,
            opened_at: Utc.with_ymd_and_hms(2024, 12, 31, 23, 15, 0).unwrap(),
            details: KindDetails::default(),
            documents: Documents::default(),
        };

        let json = serde_json::to_value(PublicStatus::from(&tramite)).unwrap();
        assert_eq!(json["fechaCreacion"], "2024-12-31");
        assert_eq!(json["estado"], "Finalizado");
        assert_eq!(json["tipo"], "Alta");
        assert_eq!(json["comentarios"], COMMENT_FINISHED);
        assert!(json.get("telefonoMovil").is_none());
    }
}
