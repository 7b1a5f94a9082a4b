use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::status::TramiteStatus;

/// Reason for the connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TramiteKind {
    #[serde(rename = "Modificación")]
    Modificacion,
    #[serde(rename = "Individual")]
    Individual,
    #[serde(rename = "Alta")]
    Alta,
}

impl TramiteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TramiteKind::Modificacion => "Modificación",
            TramiteKind::Individual => "Individual",
            TramiteKind::Alta => "Alta",
        }
    }
}

impl fmt::Display for TramiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Tipo de trámite no válido: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for TramiteKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Modificación" => Ok(TramiteKind::Modificacion),
            "Individual" => Ok(TramiteKind::Individual),
            "Alta" => Ok(TramiteKind::Alta),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Fields that only apply to one kind of request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindDetails {
    /// Modificación
    #[serde(rename = "aumentoPotencia")]
    pub power_increase: bool,
    /// Individual
    #[serde(rename = "vivienda")]
    pub housing_type: Option<String>,
    /// Alta
    #[serde(rename = "variosSuministros")]
    pub multiple_supplies: bool,
    /// Alta
    #[serde(rename = "acometidaCentralizada")]
    pub centralized_connection: bool,
}

impl KindDetails {
    /// Drop the fields that do not belong to `kind`.
    pub fn normalized_for(self, kind: TramiteKind) -> Self {
        match kind {
            TramiteKind::Modificacion => KindDetails {
                power_increase: self.power_increase,
                ..KindDetails::default()
            },
            TramiteKind::Individual => KindDetails {
                housing_type: Some(self.housing_type.unwrap_or_default()),
                ..KindDetails::default()
            },
            TramiteKind::Alta => KindDetails {
                multiple_supplies: self.multiple_supplies,
                centralized_connection: self.centralized_connection,
                ..KindDetails::default()
            },
        }
    }
}

/// Stored filenames of the documents attached at intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documents {
    #[serde(rename = "dniPdf")]
    pub identity_document: Option<String>,
    #[serde(rename = "formatoAutorizacion")]
    pub authorization_form: Option<String>,
    #[serde(rename = "plantillaRelacionPuntos")]
    pub point_relation_template: Option<String>,
}

/// A persisted trámite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tramite {
    pub id: i64,
    #[serde(rename = "numeroExpediente")]
    pub case_number: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: TramiteKind,
    #[serde(rename = "formulario")]
    pub form_label: String,
    #[serde(rename = "nombreCliente")]
    pub client_name: String,
    pub email: String,
    #[serde(rename = "telefonoMovil")]
    pub phone: String,
    pub cups: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "refCatastral")]
    pub cadastral_ref: String,
    #[serde(rename = "tension")]
    pub voltage: Option<String>,
    #[serde(rename = "potenciaNumerica")]
    pub power: String,
    #[serde(rename = "estado")]
    pub status: TramiteStatus,
    #[serde(rename = "fecha")]
    pub opened_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: KindDetails,
    #[serde(flatten)]
    pub documents: Documents,
}

impl Tramite {
    /// Case number if one has been assigned. Only the empty string counts as
    /// unassigned; whitespace is kept as entered.
    pub fn assigned_case_number(&self) -> Option<&str> {
        self.case_number.as_deref().filter(|n| !n.is_empty())
    }
}

/// Intake form contents, before an id and open date are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTramite {
    pub case_number: Option<String>,
    pub kind: TramiteKind,
    pub form_label: String,
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub cups: String,
    pub address: String,
    pub cadastral_ref: String,
    pub voltage: Option<String>,
    pub power: String,
    pub details: KindDetails,
    pub documents: Documents,
}
