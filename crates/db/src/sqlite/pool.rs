//! SQLite-Pool: Datei im WAL-Modus oder In-Memory fuer Tests

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::info;

use crate::repository::{DatabaseConfig, DbResult};

/// Wartezeit auf eine gesperrte Datenbank, bevor SQLITE_BUSY zurueckkommt
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Wrapper um den SQLite Connection Pool
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
}

/// Verbindungsoptionen fuer eine Datei-Datenbank
///
/// Mit WAL reicht `synchronous = NORMAL`, ohne WAL bleibt es bei FULL.
fn datei_optionen(config: &DatabaseConfig) -> DbResult<SqliteConnectOptions> {
    let (journal, synchron) = if config.sqlite_wal {
        (SqliteJournalMode::Wal, SqliteSynchronous::Normal)
    } else {
        (SqliteJournalMode::Delete, SqliteSynchronous::Full)
    };

    Ok(SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(journal)
        .synchronous(synchron)
        .busy_timeout(BUSY_TIMEOUT))
}

impl SqliteDb {
    /// Oeffnet die Datei (legt sie bei Bedarf an) und bringt das Schema auf Stand
    pub async fn oeffnen(config: &DatabaseConfig) -> DbResult<Self> {
        let optionen = datei_optionen(config)?;
        let datei = optionen.get_filename().display().to_string();

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_verbindungen)
            .connect_with(optionen)
            .await?;

        info!(
            datei = %datei,
            wal = config.sqlite_wal,
            max_verbindungen = config.max_verbindungen,
            "SQLite-Pool geoeffnet"
        );
        Self::migriert(pool).await
    }

    /// In-Memory-Datenbank mit genau einer dauerhaften Verbindung
    ///
    /// Jede neue Verbindung saehe eine leere Datenbank, daher darf der Pool
    /// seine einzige Verbindung nie schliessen.
    pub async fn in_memory() -> DbResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await?;

        Self::migriert(pool).await
    }

    async fn migriert(pool: SqlitePool) -> DbResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("SQLite-Migrationen abgeschlossen");
        Ok(Self { pool })
    }

    /// Direkter Pool-Zugriff, z.B. fuer Tests mit rohem SQL
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
