//! Templated email notifications to requesters.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::tramite::{TemplateKind, Tramite};

pub mod sendgrid;
pub mod templates;

pub use sendgrid::SendGridClient;
pub use templates::TemplateRegistry;

/// Shown to the requester when no case number has been assigned yet.
pub const UNASSIGNED_CASE_NUMBER: &str = "Sin asignar";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("no template configured for kind '{kind}'")]
    TemplateNotConfigured { kind: TemplateKind },
    #[error("email provider API key is not configured")]
    MissingApiKey,
    #[error("email provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("email provider rejected the message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Data handed to the provider for template substitution.
///
/// Keys keep the names the provider templates were authored with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    #[serde(skip)]
    pub recipient: String,
    #[serde(rename = "nombreCliente")]
    pub client_name: String,
    #[serde(rename = "numeroExpediente")]
    pub case_number: String,
    #[serde(rename = "tipoTramite")]
    pub tramite_type: String,
    pub cups: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "fechaApertura")]
    pub opened_on: String,
    #[serde(rename = "mensajeIncidencia", skip_serializing_if = "Option::is_none")]
    pub incident_message: Option<String>,
}

impl NotificationPayload {
    /// Build the payload from the record as it stands after the update.
    pub fn from_tramite(tramite: &Tramite, incident_message: Option<String>) -> Self {
        Self {
            recipient: tramite.email.clone(),
            client_name: tramite.client_name.clone(),
            case_number: tramite
                .assigned_case_number()
                .unwrap_or(UNASSIGNED_CASE_NUMBER)
                .to_string(),
            tramite_type: tramite.kind.to_string(),
            cups: tramite.cups.clone(),
            address: tramite.address.clone(),
            opened_on: tramite.opened_at.format("%d/%m/%Y").to_string(),
            incident_message,
        }
    }
}

/// Sends a provider-side template to one recipient
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmailNotifier: Send + Sync {
    async fn send_template(
        &self,
        kind: TemplateKind,
        payload: &NotificationPayload,
    ) -> Result<(), EmailError>;
}
