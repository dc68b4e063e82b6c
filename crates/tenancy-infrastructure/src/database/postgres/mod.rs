//! PostgreSQL repository implementations

mod tenant_repo_impl;
mod user_repo_impl;

pub use tenant_repo_impl::PgTenantRepository;
pub use user_repo_impl::PgUserRepository;
