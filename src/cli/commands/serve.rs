use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use super::build_service;
use crate::api;
use crate::config::TramitesConfig;
use crate::database::DatabaseManager;
use crate::shutdown::{shutdown_signal, ShutdownCoordinator};

pub struct ServeCommand {
    pub bind: Option<String>,
}

impl ServeCommand {
    pub fn new(bind: Option<String>) -> Self {
        Self { bind }
    }

    pub async fn execute(&self, config: &TramitesConfig) -> Result<()> {
        let database = DatabaseManager::new(&config.database)
            .await
            .with_context(|| format!("Failed to open database {}", config.database.url))?;
        let service = build_service(config, &database)?;

        let address = self
            .bind
            .clone()
            .unwrap_or_else(|| config.server.bind_address.clone());
        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;

        info!("Trámites API listening on {}", address);
        println!("🚀 Trámites API listening on http://{address}");
        println!("   Press Ctrl-C to stop");

        axum::serve(listener, api::router(Arc::new(service)))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")?;

        ShutdownCoordinator::new(database)
            .shutdown_all_services()
            .await
    }
}
