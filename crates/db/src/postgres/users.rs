//! PostgreSQL-Implementierung des UserRepository

use chrono::Utc;
use uuid::Uuid;

use crate::models::{BenutzerRecord, BenutzerZeile, NeuerBenutzer};
use crate::postgres::pool::PostgresDb;
use crate::repository::{DbResult, UserRepository};

impl UserRepository for PostgresDb {
    async fn find_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        let zeile = sqlx::query_as::<_, BenutzerZeile>(
            "SELECT id, email, name, password_hash, created_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        zeile.map(BenutzerRecord::try_from).transpose()
    }

    async fn insert_if_absent(&self, data: NeuerBenutzer<'_>) -> DbResult<Option<BenutzerRecord>> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let eingefuegt = sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (email) DO NOTHING",
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
