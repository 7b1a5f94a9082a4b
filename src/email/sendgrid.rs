use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{EmailError, EmailNotifier, NotificationPayload, TemplateRegistry};
use crate::config::EmailConfig;
use crate::tramite::TemplateKind;

/// SendGrid v3 dynamic-template sender.
///
/// One request per call; no retries.
#[derive(Debug, Clone)]
pub struct SendGridClient {
    http: reqwest::Client,
    api_key: Option<String>,
    sender: String,
    endpoint: String,
    templates: TemplateRegistry,
}

impl SendGridClient {
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let templates = TemplateRegistry::new(config.templates.clone());
        for kind in templates.missing() {
            warn!("No SendGrid template configured for '{}'", kind);
        }
        if config.api_key.is_none() {
            warn!("SendGrid API key not configured, notifications will fail");
        }

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            sender: config.sender.clone(),
            endpoint: format!("{}/v3/mail/send", config.api_base_url.trim_end_matches('/')),
            templates,
        })
    }
}

#[async_trait]
impl EmailNotifier for SendGridClient {
    async fn send_template(
        &self,
        kind: TemplateKind,
        payload: &NotificationPayload,
    ) -> Result<(), EmailError> {
        let template_id = self.templates.resolve(kind)?;
        let api_key = self.api_key.as_deref().ok_or(EmailError::MissingApiKey)?;

        let body = json!({
            "personalizations": [{
                "to": [{ "email": payload.recipient }],
                "dynamic_template_data": payload,
            }],
            "from": { "email": self.sender },
            "template_id": template_id,
        });

        debug!("Sending '{}' template to {}", kind, payload.recipient);
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            "Email '{}' sent to {} (HTTP {})",
            kind,
            payload.recipient,
            status.as_u16()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TemplateIds, TramitesConfig};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn email_config(base_url: &str, api_key: Option<&str>) -> EmailConfig {
        EmailConfig {
            api_key: api_key.map(str::to_string),
            sender: "avisos@example.com".to_string(),
            api_base_url: base_url.to_string(),
            timeout_seconds: 5,
            templates: TemplateIds {
                finalizado: Some("d-fin".to_string()),
                incidencia: Some("d-inc".to_string()),
                pago: None,
            },
        }
    }

    fn payload() -> NotificationPayload {
        NotificationPayload {
            recipient: "cliente@example.com".to_string(),
            client_name: "Cliente".to_string(),
            case_number: "EXP-1".to_string(),
            tramite_type: "Alta".to_string(),
            cups: "ES0021".to_string(),
            address: "Calle Luna 3".to_string(),
            opened_on: "01/03/2025".to_string(),
            incident_message: Some("Falta DNI".to_string()),
        }
    }

    #[tokio::test]
    async fn test_send_template_posts_dynamic_template_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .and(header("authorization", "Bearer SG.test"))
            .and(body_partial_json(json!({
                "template_id": "d-inc",
                "from": { "email": "avisos@example.com" },
                "personalizations": [{
                    "to": [{ "email": "cliente@example.com" }],
                    "dynamic_template_data": {
                        "numeroExpediente": "EXP-1",
                        "mensajeIncidencia": "Falta DNI"
                    }
                }]
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let client = SendGridClient::new(&email_config(&server.uri(), Some("SG.test"))).unwrap();
        client
            .send_template(TemplateKind::Incidencia, &payload())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_provider_rejection_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/mail/send"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let client = SendGridClient::new(&email_config(&server.uri(), Some("SG.bad"))).unwrap();
        let err = client
            .send_template(TemplateKind::Finalizado, &payload())
            .await
            .unwrap_err();

        match err {
            EmailError::Rejected { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_template_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202))
            .expect(0)
            .mount(&server)
            .await;

        let client = SendGridClient::new(&email_config(&server.uri(), Some("SG.test"))).unwrap();
        let err = client
            .send_template(TemplateKind::Pago, &payload())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EmailError::TemplateNotConfigured {
                kind: TemplateKind::Pago
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_at_send_time() {
        let mut config = TramitesConfig::default().email;
        config.templates.finalizado = Some("d-fin".to_string());

        let client = SendGridClient::new(&config).unwrap();
        let err = client
            .send_template(TemplateKind::Finalizado, &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, EmailError::MissingApiKey));
    }
}
