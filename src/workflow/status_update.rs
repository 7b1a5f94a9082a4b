use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn, Instrument};

use crate::email::{EmailNotifier, NotificationPayload};
use crate::store::{RecordPatch, StoreError, TramiteStore};
use crate::telemetry::{create_workflow_span, generate_correlation_id};
use crate::tramite::{TemplateKind, Tramite, TramiteStatus};

pub const MSG_UPDATED: &str = "Trámite actualizado correctamente";
pub const MSG_UPDATED_EMAIL_FAILED: &str =
    "Trámite actualizado, pero hubo un error al enviar el correo";
pub const MSG_NOT_FOUND: &str = "Trámite no encontrado";
pub const MSG_UPDATE_FAILED: &str = "Error al actualizar el trámite";

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("tramite {id} not found")]
    NotFound { id: i64 },
    #[error("failed to persist tramite update: {0}")]
    Persistence(#[source] StoreError),
}

/// A staff request against one record. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusUpdate {
    pub case_number: Option<String>,
    pub status: Option<TramiteStatus>,
    pub cups: Option<String>,
    pub notify: bool,
    pub template_kind: Option<TemplateKind>,
    pub incident_message: Option<String>,
}

impl StatusUpdate {
    fn patch(&self) -> RecordPatch {
        RecordPatch {
            case_number: self.case_number.clone(),
            status: self.status,
            cups: self.cups.clone(),
        }
    }
}

/// Result of the notification step, independent of the record write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    NotRequested,
    Sent { kind: TemplateKind },
    Failed {
        kind: Option<TemplateKind>,
        error: String,
    },
}

/// A persisted update plus what happened to its notification.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub tramite: Tramite,
    pub notification: NotificationOutcome,
}

impl UpdateOutcome {
    pub fn message(&self) -> &'static str {
        match self.notification {
            NotificationOutcome::Failed { .. } => MSG_UPDATED_EMAIL_FAILED,
            _ => MSG_UPDATED,
        }
    }

    /// `None` when no email was requested.
    pub fn email_sent(&self) -> Option<bool> {
        match self.notification {
            NotificationOutcome::NotRequested => None,
            NotificationOutcome::Sent { .. } => Some(true),
            NotificationOutcome::Failed { .. } => Some(false),
        }
    }

    pub fn notification_error(&self) -> Option<&str> {
        match &self.notification {
            NotificationOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Applies status, case-number and CUPS changes in one write, then
/// optionally notifies.
#[derive(Clone)]
pub struct StatusWorkflow {
    store: Arc<dyn TramiteStore>,
    notifier: Arc<dyn EmailNotifier>,
}

impl StatusWorkflow {
    pub fn new(store: Arc<dyn TramiteStore>, notifier: Arc<dyn EmailNotifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn update_status(
        &self,
        id: i64,
        update: StatusUpdate,
    ) -> Result<UpdateOutcome, WorkflowError> {
        let correlation_id = generate_correlation_id();
        let span = create_workflow_span("update_status", Some(id), Some(&correlation_id));

        async move {
            let tramite = self.persist(id, &update).await?;
            let notification = if update.notify {
                self.notify(&tramite, &update).await
            } else {
                NotificationOutcome::NotRequested
            };

            Ok(UpdateOutcome {
                tramite,
                notification,
            })
        }
        .instrument(span)
        .await
    }

    async fn persist(&self, id: i64, update: &StatusUpdate) -> Result<Tramite, WorkflowError> {
        let mut tramite = self
            .store
            .get(id)
            .await
            .map_err(WorkflowError::Persistence)?
            .ok_or(WorkflowError::NotFound { id })?;

        let patch = update.patch();
        if !patch.is_empty() {
            self.store
                .update_fields(id, &patch)
                .await
                .map_err(|e| match e {
                    StoreError::NotFound { id } => WorkflowError::NotFound { id },
                    other => WorkflowError::Persistence(other),
                })?;
            patch.apply_to(&mut tramite);
        }

        info!(
            "Tramite {} updated (status: {}, case number: {:?})",
            id, tramite.status, tramite.case_number
        );
        Ok(tramite)
    }

    async fn notify(&self, tramite: &Tramite, update: &StatusUpdate) -> NotificationOutcome {
        let Some(kind) = update.template_kind else {
            warn!("Notification requested for tramite {} without a template kind", tramite.id);
            return NotificationOutcome::Failed {
                kind: None,
                error: "template kind not specified".to_string(),
            };
        };

        let payload = NotificationPayload::from_tramite(tramite, update.incident_message.clone());
        match self.notifier.send_template(kind, &payload).await {
            Ok(()) => {
                info!("Email of kind {} sent to {}", kind, tramite.email);
                NotificationOutcome::Sent { kind }
            }
            Err(e) => {
                warn!("Failed to send {} email for tramite {}: {}", kind, tramite.id, e);
                NotificationOutcome::Failed {
                    kind: Some(kind),
                    error: e.to_string(),
                }
            }
        }
    }
}
