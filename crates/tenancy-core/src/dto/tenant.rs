//! Tenant requests and responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tenancy_shared::constants::{DEFAULT_PAGE_INDEX, DEFAULT_PAGE_SIZE};
use tenancy_shared::types::{EntityId, SortType};
use validator::Validate;

use crate::domain::Tenant;
use crate::repositories::{PageParams, TenantSort};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTenantRequest {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    /// Lowercase alphanumeric, beginning with a letter.
    #[validate(length(min = 3, max = 100))]
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditTenantRequest {
    pub id: EntityId,
    #[validate(length(min = 3, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 3, max = 100))]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetTenantByIdRequest {
    pub id: EntityId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetTenantBySlugRequest {
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetTenantListRequest {
    pub page_index: u32,
    pub page_size: u32,
    pub sort_by: TenantSort,
    pub sort_type: SortType,
}

impl Default for GetTenantListRequest {
    fn default() -> Self {
        Self {
            page_index: DEFAULT_PAGE_INDEX,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: TenantSort::default(),
            sort_type: SortType::default(),
        }
    }
}

impl From<&GetTenantListRequest> for PageParams<TenantSort> {
    fn from(req: &GetTenantListRequest) -> Self {
        PageParams {
            page_index: req.page_index,
            page_size: req.page_size,
            sort_by: req.sort_by,
            sort_type: req.sort_type,
            tenant_id: None,
        }
        .clamped()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteTenantRequest {
    pub ids: Vec<EntityId>,
    /// All-or-nothing batch when `true`. Defaults to `true`.
    pub is_atomic: Option<bool>,
    /// Also remove the tenant's users. Defaults to `false`; when `false`
    /// the delete is rejected while any user still references the tenant.
    pub is_cascading: Option<bool>,
}

impl DeleteTenantRequest {
    pub fn single(id: EntityId) -> Self {
        Self { ids: vec![id], is_atomic: None, is_cascading: None }
    }

    pub fn is_atomic(&self) -> bool {
        self.is_atomic.unwrap_or(true)
    }

    pub fn is_cascading(&self) -> bool {
        self.is_cascading.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantDetails {
    pub id: EntityId,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Tenant> for TenantDetails {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name,
            slug: tenant.slug,
            created_at: tenant.created_at,
            updated_at: tenant.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantListItem {
    pub id: EntityId,
    pub name: String,
    pub slug: String,
}

impl From<Tenant> for TenantListItem {
    fn from(tenant: Tenant) -> Self {
        Self { id: tenant.id, name: tenant.name, slug: tenant.slug }
    }
}
