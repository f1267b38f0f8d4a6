//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. SQLite ist das Standard-Backend fuer den
//! lokalen Betrieb, PostgreSQL wird ueber die Verbindungs-URL gewaehlt.

use std::future::Future;

use crate::error::DbError;
use crate::models::{BenutzerRecord, NeuerBenutzer};

/// Result-Alias fuer alle Repository-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Unterstuetzte Datenbank-Backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    /// SQLite – lokale Einzeldatei, Standard ohne `DATABASE_URL`
    Sqlite,
    /// PostgreSQL – fuer den gehosteten Betrieb
    Postgres,
}

impl DatabaseBackend {
    /// Leitet das Backend aus dem Schema der Verbindungs-URL ab
    pub fn aus_url(url: &str) -> DbResult<Self> {
        if url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Self::Postgres)
        } else {
            Err(DbError::Konfiguration(
                "Unbekanntes Datenbank-Schema in URL (erwartet sqlite: oder postgres://)".into(),
            ))
        }
    }
}

impl std::fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "SQLite"),
            Self::Postgres => write!(f, "PostgreSQL"),
        }
    }
}

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://local.db" oder "postgres://...")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl DatabaseConfig {
    /// Backend passend zur URL
    pub fn backend(&self) -> DbResult<DatabaseBackend> {
        DatabaseBackend::aus_url(&self.url)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://local.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer Benutzer-Datenzugriffe
///
/// Die E-Mail ist der Identitaetsschluessel. `insert_if_absent` muss die
/// Eindeutigkeit atomar in der Datenbank durchsetzen, nicht per
/// vorgelagertem Lesezugriff.
pub trait UserRepository: Send + Sync {
    /// Einen Benutzer anhand seiner E-Mail laden
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = DbResult<Option<BenutzerRecord>>> + Send;

    /// Legt den Benutzer an, falls die E-Mail noch frei ist
    ///
    /// Gibt `None` zurueck wenn bereits ein Benutzer mit dieser E-Mail existiert.
    fn insert_if_absent(
        &self,
        data: NeuerBenutzer<'_>,
    ) -> impl Future<Output = DbResult<Option<BenutzerRecord>>> + Send;

    /// Loest das Subjekt eines Tokens zu einem Benutzer auf
    ///
    /// Das Subjekt ist die E-Mail-Adresse.
    fn find_by_subject(
        &self,
        subject: &str,
    ) -> impl Future<Output = DbResult<Option<BenutzerRecord>>> + Send {
        self.find_by_email(subject)
    }
}
