//! # Tenancy Infrastructure
//!
//! Postgres adapters and the composition root.

pub mod bootstrap;
pub mod database;

pub use bootstrap::Backend;
pub use database::{create_pool, PgTenantRepository, PgUserRepository};
