//! einlass-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern bereit, das SQLite (Standard)
//! und PostgreSQL hinter einer einheitlichen Schnittstelle abstrahiert.
//! Die Eindeutigkeit der E-Mail wird von der Datenbank selbst erzwungen.

pub mod datenbank;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod sqlite;

pub use datenbank::Datenbank;
pub use error::DbError;
pub use models::{BenutzerRecord, NeuerBenutzer};
pub use postgres::PostgresDb;
pub use repository::{DatabaseBackend, DatabaseConfig, DbResult, UserRepository};
pub use sqlite::SqliteDb;
