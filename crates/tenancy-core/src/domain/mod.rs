//! Domain entities

mod tenant;
mod user;

pub use tenant::{NewTenant, Tenant, TenantPatch};
pub use user::{NewUser, User, UserDetail, UserPatch, UserStatus};

use chrono::{DateTime, Utc};
use tenancy_shared::types::ScopedId;

/// Server-assigned facts about a persisted entity, used by the generic
/// orchestration layer to build mutation responses.
pub trait Persisted {
    fn key(&self) -> ScopedId;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;
}
