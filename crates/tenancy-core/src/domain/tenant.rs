//! Tenant domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tenancy_shared::types::{EntityId, ScopedId};

use super::Persisted;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: EntityId,
    pub name: String,
    /// URL-safe identifier, unique across all tenants.
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Persisted for Tenant {
    fn key(&self) -> ScopedId {
        ScopedId::global(self.id)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Insert shape; id and `created_at` are assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
    pub slug: String,
}

/// Partial update keyed by `id`; `None` fields are left untouched.
#[derive(Debug, Clone)]
pub struct TenantPatch {
    pub id: EntityId,
    pub name: Option<String>,
    pub slug: Option<String>,
}
