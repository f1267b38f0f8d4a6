//! Datenbankmodelle fuer Einlass
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind von den HTTP-Typen getrennt und dienen als reine Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Benutzer-Datensatz aus der Datenbank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: Uuid,
    /// Identitaetsschluessel, eindeutig ueber alle Benutzer
    pub email: String,
    /// Anzeigename
    pub name: String,
    /// Argon2id-PHC-String
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
}

/// Rohzeile der `users`-Tabelle
///
/// IDs und Zeitstempel liegen in beiden Backends als TEXT vor.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BenutzerZeile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: String,
}

impl TryFrom<BenutzerZeile> for BenutzerRecord {
    type Error = crate::error::DbError;

    fn try_from(zeile: BenutzerZeile) -> Result<Self, Self::Error> {
        use crate::error::DbError;

        let id = Uuid::parse_str(&zeile.id)
            .map_err(|e| DbError::UngueltigeDaten(format!("UUID '{}': {e}", zeile.id)))?;

        let created_at = DateTime::parse_from_rfc3339(&zeile.created_at)
            .map_err(|e| {
                DbError::UngueltigeDaten(format!("created_at '{}': {e}", zeile.created_at))
            })?
            .with_timezone(&Utc);

        Ok(Self {
            id,
            email: zeile.email,
            name: zeile.name,
            password_hash: zeile.password_hash,
            created_at,
        })
    }
}
