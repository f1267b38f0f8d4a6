//! PostgreSQL Connection Pool

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::error::DbError;
use crate::repository::DatabaseConfig;

/// Wrapper um den PostgreSQL Connection Pool
#[derive(Debug, Clone)]
pub struct PostgresDb {
    pub(crate) pool: PgPool,
}

impl PostgresDb {
    /// Verbindet sich mit dem Server und fuehrt Migrationen aus
    pub async fn oeffnen(config: &DatabaseConfig) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_verbindungen)
            .connect(&config.url)
            .await?;

        // Die URL enthaelt Zugangsdaten und wird nicht geloggt
        info!(
            max_verbindungen = config.max_verbindungen,
            "PostgreSQL-Pool geoeffnet"
        );

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Datenbank-Migrationen abgeschlossen");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
