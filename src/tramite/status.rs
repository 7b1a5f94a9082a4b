use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Processing status of a trámite.
///
/// The serialized form is the exact literal the back office has always used,
/// accents and casing included. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TramiteStatus {
    #[default]
    #[serde(rename = "Pendiente de enviar")]
    PendingSubmission,
    #[serde(rename = "En trámite Solicitud")]
    RequestInProgress,
    #[serde(rename = "Pendiente aceptar Carta de Condiciones")]
    AwaitingConditionsLetter,
    #[serde(rename = "Gestión de Pago")]
    PaymentManagement,
    #[serde(rename = "Gestión de pago trámite")]
    PaymentProcessing,
    #[serde(rename = "Solicitud de Incidencia")]
    IncidentRequest,
    #[serde(rename = "Trámite de licencia/obras")]
    PermitsAndWorks,
    #[serde(rename = "Finalizado")]
    Finished,
    #[serde(rename = "Anulado")]
    Cancelled,
}

impl TramiteStatus {
    pub const ALL: [TramiteStatus; 9] = [
        TramiteStatus::PendingSubmission,
        TramiteStatus::RequestInProgress,
        TramiteStatus::AwaitingConditionsLetter,
        TramiteStatus::PaymentManagement,
        TramiteStatus::PaymentProcessing,
        TramiteStatus::IncidentRequest,
        TramiteStatus::PermitsAndWorks,
        TramiteStatus::Finished,
        TramiteStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TramiteStatus::PendingSubmission => "Pendiente de enviar",
            TramiteStatus::RequestInProgress => "En trámite Solicitud",
            TramiteStatus::AwaitingConditionsLetter => "Pendiente aceptar Carta de Condiciones",
            TramiteStatus::PaymentManagement => "Gestión de Pago",
            TramiteStatus::PaymentProcessing => "Gestión de pago trámite",
            TramiteStatus::IncidentRequest => "Solicitud de Incidencia",
            TramiteStatus::PermitsAndWorks => "Trámite de licencia/obras",
            TramiteStatus::Finished => "Finalizado",
            TramiteStatus::Cancelled => "Anulado",
        }
    }
}

impl fmt::Display for TramiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Estado no válido: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TramiteStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TramiteStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Email template family sent to the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Finalizado,
    Incidencia,
    Pago,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [
        TemplateKind::Finalizado,
        TemplateKind::Incidencia,
        TemplateKind::Pago,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Finalizado => "finalizado",
            TemplateKind::Incidencia => "incidencia",
            TemplateKind::Pago => "pago",
        }
    }

    /// Template offered to staff when moving a record into `status`.
    ///
    /// Only these three statuses go through the notify-confirmation step;
    /// every other status is applied straight away.
    pub fn for_status(status: TramiteStatus) -> Option<TemplateKind> {
        match status {
            TramiteStatus::Finished => Some(TemplateKind::Finalizado),
            TramiteStatus::IncidentRequest => Some(TemplateKind::Incidencia),
            TramiteStatus::PaymentManagement => Some(TemplateKind::Pago),
            _ => None,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Tipo de plantilla no válido: {0}")]
pub struct UnknownTemplateKind(pub String);

impl FromStr for TemplateKind {
    type Err = UnknownTemplateKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownTemplateKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_literals_parse_back() {
        for status in TramiteStatus::ALL {
            assert_eq!(status.as_str().parse::<TramiteStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_serializes_to_exact_literal() {
        let json = serde_json::to_string(&TramiteStatus::PaymentProcessing).unwrap();
        assert_eq!(json, "\"Gestión de pago trámite\"");

        let parsed: TramiteStatus = serde_json::from_str("\"Trámite de licencia/obras\"").unwrap();
        assert_eq!(parsed, TramiteStatus::PermitsAndWorks);
    }

    #[test]
    fn test_status_parse_is_case_sensitive() {
        assert!("finalizado".parse::<TramiteStatus>().is_err());
        assert!("Gestión de pago".parse::<TramiteStatus>().is_err());
    }

    #[test]
    fn test_notify_prompt_statuses() {
        assert_eq!(
            TemplateKind::for_status(TramiteStatus::Finished),
            Some(TemplateKind::Finalizado)
        );
        assert_eq!(
            TemplateKind::for_status(TramiteStatus::IncidentRequest),
            Some(TemplateKind::Incidencia)
        );
        assert_eq!(
            TemplateKind::for_status(TramiteStatus::PaymentManagement),
            Some(TemplateKind::Pago)
        );

        let prompting = TramiteStatus::ALL
            .into_iter()
            .filter(|s| TemplateKind::for_status(*s).is_some())
            .count();
        assert_eq!(prompting, 3);
    }

    #[test]
    fn test_template_kind_round_trip_and_rejection() {
        assert_eq!("pago".parse::<TemplateKind>(), Ok(TemplateKind::Pago));
        assert_eq!(
            "urgente".parse::<TemplateKind>(),
            Err(UnknownTemplateKind("urgente".to_string()))
        );
    }
}
