//! Laufzeitauswahl des Backends anhand der Verbindungs-URL

use crate::models::{BenutzerRecord, NeuerBenutzer};
use crate::postgres::PostgresDb;
use crate::repository::{DatabaseBackend, DatabaseConfig, DbResult, UserRepository};
use crate::sqlite::SqliteDb;

/// Geoeffnete Datenbank, entweder SQLite oder PostgreSQL
#[derive(Debug, Clone)]
pub enum Datenbank {
    Sqlite(SqliteDb),
    Postgres(PostgresDb),
}

impl Datenbank {
    /// Oeffnet das zur URL passende Backend und fuehrt Migrationen aus
    pub async fn oeffnen(config: &DatabaseConfig) -> DbResult<Self> {
        match config.backend()? {
            DatabaseBackend::Sqlite => Ok(Self::Sqlite(SqliteDb::oeffnen(config).await?)),
            DatabaseBackend::Postgres => Ok(Self::Postgres(PostgresDb::oeffnen(config).await?)),
        }
    }

    pub fn backend(&self) -> DatabaseBackend {
        match self {
            Self::Sqlite(_) => DatabaseBackend::Sqlite,
            Self::Postgres(_) => DatabaseBackend::Postgres,
        }
    }
}

impl From<SqliteDb> for Datenbank {
    fn from(db: SqliteDb) -> Self {
        Self::Sqlite(db)
    }
}

impl From<PostgresDb> for Datenbank {
    fn from(db: PostgresDb) -> Self {
        Self::Postgres(db)
    }
}

impl UserRepository for Datenbank {
    async fn find_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        match self {
            Self::Sqlite(db) => db.find_by_email(email).await,
            Self::Postgres(db) => db.find_by_email(email).await,
        }
    }

    async fn insert_if_absent(&self, data: NeuerBenutzer<'_>) -> DbResult<Option<BenutzerRecord>> {
        match self {
            Self::Sqlite(db) => db.insert_if_absent(data).await,
            Self::Postgres(db) => db.insert_if_absent(data).await,
        }
    }
}
