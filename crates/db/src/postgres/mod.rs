//! PostgreSQL-Backend-Implementierung des UserRepository

pub mod pool;
pub mod users;

pub use pool::PostgresDb;
