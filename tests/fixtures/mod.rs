//! Shared helpers for trámites integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use tramites::config::DatabaseConfig;
use tramites::{
    DatabaseManager, EmailError, EmailNotifier, NewTramite, NotificationPayload,
    SqliteTramiteStore, TemplateKind, TramiteKind,
};
use tramites::tramite::{Documents, KindDetails};

/// A file-backed database that lives as long as the returned dir.
pub async fn temp_database() -> (DatabaseManager, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("tramites.db").display()),
        max_connections: 2,
        auto_migrate: true,
    };
    let database = DatabaseManager::new(&config).await.expect("open database");
    (database, dir)
}

pub async fn temp_store() -> (Arc<SqliteTramiteStore>, DatabaseManager, TempDir) {
    let (database, dir) = temp_database().await;
    (Arc::new(SqliteTramiteStore::new(&database)), database, dir)
}

pub fn new_tramite(client_name: &str) -> NewTramite {
    NewTramite {
        case_number: None,
        kind: TramiteKind::Individual,
        form_label: "Suministro individual".to_string(),
        client_name: client_name.to_string(),
        email: format!("{}@example.com", client_name.to_lowercase().replace(' ', ".")),
        phone: "600123456".to_string(),
        cups: "ES0021000000000001AB".to_string(),
        address: "Calle de la Paz 14, Valencia".to_string(),
        cadastral_ref: "4417012YJ2741N0001AB".to_string(),
        voltage: Some("230".to_string()),
        power: "5.75".to_string(),
        details: KindDetails {
            housing_type: Some("Unifamiliar".to_string()),
            ..KindDetails::default()
        },
        documents: Documents {
            identity_document: Some("3f2a_dni.pdf".to_string()),
            ..Documents::default()
        },
    }
}

/// Notifier that records every call and answers with a fixed result.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(TemplateKind, NotificationPayload)>>>,
    fail_with: Option<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(TemplateKind, NotificationPayload)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailNotifier for RecordingNotifier {
    async fn send_template(
        &self,
        kind: TemplateKind,
        payload: &NotificationPayload,
    ) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push((kind, payload.clone()));
        match &self.fail_with {
            Some(body) => Err(EmailError::Rejected {
                status: 500,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}
