//! SQLite-Implementierung des UserRepository

use chrono::Utc;
use uuid::Uuid;

use crate::models::{BenutzerRecord, BenutzerZeile, NeuerBenutzer};
use crate::repository::{DbResult, UserRepository};
use crate::sqlite::pool::SqliteDb;

impl UserRepository for SqliteDb {
    async fn find_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        let zeile = sqlx::query_as::<_, BenutzerZeile>(
            "SELECT id, email, name, password_hash, created_at
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        zeile.map(BenutzerRecord::try_from).transpose()
    }

    async fn insert_if_absent(&self, data: NeuerBenutzer<'_>) -> DbResult<Option<BenutzerRecord>> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        // Der UNIQUE-Index auf email entscheidet, nicht ein vorheriges SELECT
        let eingefuegt = sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, created_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(email) DO NOTHING",
        )
        .bind(id.to_string())
        .bind(data.email)
        .bind(data.name)
        .bind(data.password_hash)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if eingefuegt == 0 {
            tracing::debug!("E-Mail bereits vorhanden, kein Datensatz angelegt");
            return Ok(None);
        }

        Ok(Some(BenutzerRecord {
            id,
            email: data.email.to_string(),
            name: data.name.to_string(),
            password_hash: data.password_hash.to_string(),
            created_at: now,
        }))
    }
}
