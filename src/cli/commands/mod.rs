use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;

use crate::config::TramitesConfig;
use crate::database::DatabaseManager;
use crate::email::SendGridClient;
use crate::service::TramiteService;
use crate::store::SqliteTramiteStore;

pub mod delete;
pub mod init_config;
pub mod list;
pub mod lookup;
pub mod serve;
pub mod set_cups;
pub mod show;
pub mod update_status;

/// Wire the SQLite store and the SendGrid notifier into a service.
pub fn build_service(config: &TramitesConfig, database: &DatabaseManager) -> Result<TramiteService> {
    let store = SqliteTramiteStore::new(database);
    let notifier = SendGridClient::new(&config.email).context("Failed to build email client")?;
    Ok(TramiteService::new(Arc::new(store), Arc::new(notifier))
        .with_default_page_size(config.server.default_page_size))
}

/// Open the database, run `f` against a service, then close the pool.
pub async fn with_service<F, Fut, R>(config: &TramitesConfig, f: F) -> Result<R>
where
    F: FnOnce(TramiteService) -> Fut,
    Fut: std::future::Future<Output = Result<R>>,
{
    print!("🔄 Opening database... ");
    std::io::stdout().flush()?;

    let database = match DatabaseManager::new(&config.database).await {
        Ok(database) => {
            println!("✅");
            database
        }
        Err(e) => {
            println!("❌ Failed to open {}: {e}", config.database.url);
            return Err(e);
        }
    };

    let result = match build_service(config, &database) {
        Ok(service) => f(service).await,
        Err(e) => Err(e),
    };
    database.shutdown().await;
    result
}

pub fn show_usage() -> Result<()> {
    println!("📋 Trámites - connection paperwork back office");
    println!();
    println!("Staff commands:");
    println!("  🚀 tramites serve                 # Run the dashboard API");
    println!("  📋 tramites list                  # Browse the worklist");
    println!("  🔎 tramites show <id>             # Inspect one trámite");
    println!("  🔁 tramites update-status <id>    # Change status, optionally email");
    println!();
    println!("Setup:");
    println!("  ⚙️  tramites init-config           # Write tramites.toml");
    println!();
    println!("💡 Run 'tramites --help' for every command and option");
    Ok(())
}
