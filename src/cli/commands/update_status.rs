use anyhow::Result;

use super::with_service;
use crate::config::TramitesConfig;
use crate::tramite::{TemplateKind, TramiteStatus};
use crate::workflow::{NotificationOutcome, StatusUpdate};

pub struct UpdateStatusCommand {
    pub id: i64,
    pub update: StatusUpdate,
}

impl UpdateStatusCommand {
    pub fn new(
        id: i64,
        status: Option<TramiteStatus>,
        case_number: Option<String>,
        notify: bool,
        template: Option<TemplateKind>,
        message: Option<String>,
    ) -> Self {
        Self {
            id,
            update: StatusUpdate {
                case_number,
                status,
                cups: None,
                notify,
                template_kind: resolve_template(notify, template, status),
                incident_message: message,
            },
        }
    }

    pub async fn execute(&self, config: &TramitesConfig) -> Result<()> {
        with_service(config, |service| async move {
            let outcome = service.update_status(self.id, self.update.clone()).await?;

            println!("✅ {}", outcome.message());
            println!("   📌 Status: {}", outcome.tramite.status);
            if let Some(case_number) = outcome.tramite.assigned_case_number() {
                println!("   🏷️  Case number: {case_number}");
            }
            match &outcome.notification {
                NotificationOutcome::NotRequested => {}
                NotificationOutcome::Sent { kind } => {
                    println!("   📧 Email '{kind}' sent to {}", outcome.tramite.email)
                }
                NotificationOutcome::Failed { error, .. } => {
                    println!("   ⚠️  Email not sent: {error}")
                }
            }
            Ok(())
        })
        .await
    }
}

/// Explicit template wins; otherwise infer it from the new status when an
/// email was requested.
fn resolve_template(
    notify: bool,
    explicit: Option<TemplateKind>,
    status: Option<TramiteStatus>,
) -> Option<TemplateKind> {
    if !notify {
        return explicit;
    }
    explicit.or_else(|| status.and_then(TemplateKind::for_status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_inferred_from_status_only_when_notifying() {
        assert_eq!(
            resolve_template(true, None, Some(TramiteStatus::Finished)),
            Some(TemplateKind::Finalizado)
        );
        assert_eq!(
            resolve_template(true, None, Some(TramiteStatus::PaymentManagement)),
            Some(TemplateKind::Pago)
        );
        assert_eq!(resolve_template(true, None, Some(TramiteStatus::Cancelled)), None);
        assert_eq!(resolve_template(false, None, Some(TramiteStatus::Finished)), None);
        assert_eq!(
            resolve_template(true, Some(TemplateKind::Incidencia), Some(TramiteStatus::Finished)),
            Some(TemplateKind::Incidencia)
        );
    }
}
