//! Database adapters

pub mod connection;
pub mod postgres;

pub use connection::create_pool;
pub use postgres::{PgTenantRepository, PgUserRepository};

use tenancy_core::DomainError;

/// Keeps store-level constraint violations distinguishable from plain
/// connectivity/database failures when they reach the caller.
pub(crate) fn map_db_err(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::UniqueViolation(db.message().to_string())
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            DomainError::ForeignKeyViolation(db.message().to_string())
        }
        _ => DomainError::DatabaseError(err.to_string()),
    }
}
