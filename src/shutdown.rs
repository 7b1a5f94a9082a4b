use anyhow::Result;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::database::DatabaseManager;

const DATABASE_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves on SIGINT, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

/// Graceful shutdown coordinator for the trámites server
pub struct ShutdownCoordinator {
    database: DatabaseManager,
}

impl ShutdownCoordinator {
    pub fn new(database: DatabaseManager) -> Self {
        Self { database }
    }

    /// Release resources once the server has stopped accepting requests
    pub async fn shutdown_all_services(self) -> Result<()> {
        info!("Initiating graceful shutdown of all services...");

        if let Err(e) = close_database(&self.database).await {
            warn!("Error closing database pool: {}", e);
        }

        info!("Graceful shutdown completed successfully");
        Ok(())
    }
}

async fn close_database(database: &DatabaseManager) -> Result<()> {
    info!("Closing database connections...");

    timeout(DATABASE_CLOSE_TIMEOUT, database.shutdown())
        .await
        .map_err(|_| anyhow::anyhow!("Timeout waiting for database pool to close"))?;

    info!("Database connections closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;

    #[tokio::test]
    async fn test_shutdown_closes_pool() {
        let (database, _dir) = temp_database().await;
        let pool = database.pool().clone();

        ShutdownCoordinator::new(database)
            .shutdown_all_services()
            .await
            .unwrap();

        assert!(pool.is_closed());
    }
}
