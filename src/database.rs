use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, SqlitePool};
use tracing::info;

use crate::config::DatabaseConfig;

/// Database manager owning the SQLite pool
#[derive(Debug, Clone)]
pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    /// Initialize database with automatic migrations
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        // Create database if it doesn't exist
        if !sqlx::Sqlite::database_exists(&config.url).await? {
            info!("Creating database at {}", config.url);
            sqlx::Sqlite::create_database(&config.url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect(&config.url)
            .await?;

        if config.auto_migrate {
            info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Database migrations completed");
        }

        Ok(Self { pool })
    }

    /// Get database pool for queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close database connections gracefully
    pub async fn shutdown(&self) {
        info!("Shutting down database connections...");
        self.pool.close().await;
        info!("Database connections closed");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// File-backed database in a temp dir; keep the dir alive for the test.
    pub async fn temp_database() -> (DatabaseManager, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("tramites.db").display()),
            max_connections: 2,
            auto_migrate: true,
        };
        let manager = DatabaseManager::new(&config).await.unwrap();
        (manager, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::temp_database;
    use sqlx::Row;

    #[tokio::test]
    async fn test_new_creates_database_and_runs_migrations() {
        let (manager, _dir) = temp_database().await;

        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'tramites'",
        )
        .fetch_one(manager.pool())
        .await
        .unwrap();
        let n: i64 = row.get("n");
        assert_eq!(n, 1);

        manager.shutdown().await;
        assert!(manager.pool().is_closed());
    }

    #[tokio::test]
    async fn test_status_column_rejects_unknown_literal() {
        let (manager, _dir) = temp_database().await;

        let result = sqlx::query(
            r#"
            INSERT INTO tramites (kind, client_name, email, phone, cups, address,
                                  cadastral_ref, power, status, opened_at)
            VALUES ('Alta', 'A', 'a@example.com', '600', 'ES00', 'Calle', 'RC', '5', 'Completado',
                    '2025-01-01T00:00:00Z')
            "#,
        )
        .execute(manager.pool())
        .await;

        assert!(result.is_err());
    }
}
