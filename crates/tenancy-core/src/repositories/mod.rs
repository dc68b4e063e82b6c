//! Repository ports
//!
//! A generic tenant-aware CRUD port plus per-entity extensions and the
//! narrow read-only facades that break the Tenant/User service cycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tenancy_shared::constants::{DEFAULT_PAGE_INDEX, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use tenancy_shared::types::{EntityId, ScopedId, SortType};

use crate::atomic::AtomicSession;
use crate::domain::{
    NewTenant, NewUser, Persisted, Tenant, TenantPatch, User, UserDetail, UserPatch,
};
use crate::error::DomainResult;

/// Options for point lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindOptions {
    /// Join fields of related entities into the result (for users, the
    /// owning tenant's name).
    pub with_relations: bool,
}

/// Window over an ordered result set. `page_index` is 1-based.
#[derive(Debug, Clone)]
pub struct PageParams<S> {
    pub page_index: u32,
    pub page_size: u32,
    pub sort_by: S,
    pub sort_type: SortType,
    /// Restricts the window to one tenant's rows for tenant-owned entities.
    pub tenant_id: Option<EntityId>,
}

impl<S: Default> Default for PageParams<S> {
    fn default() -> Self {
        Self {
            page_index: DEFAULT_PAGE_INDEX,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: S::default(),
            sort_type: SortType::default(),
            tenant_id: None,
        }
    }
}

impl<S> PageParams<S> {
    /// Bounds the window to the configured maximum and a sane first page.
    pub fn clamped(mut self) -> Self {
        self.page_index = self.page_index.max(1);
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page_index.saturating_sub(1)) * i64::from(self.page_size)
    }
}

/// One page of rows plus the total count of all matching rows.
#[derive(Debug, Clone)]
pub struct PagedResult<E> {
    pub items: Vec<E>,
    pub total: u64,
}

/// Criteria for tenant existence/count checks.
#[derive(Debug, Clone, Default)]
pub struct TenantFilter {
    pub id: Option<EntityId>,
    pub slug: Option<String>,
}

impl TenantFilter {
    pub fn by_id(id: EntityId) -> Self {
        Self { id: Some(id), ..Self::default() }
    }

    pub fn by_slug(slug: impl Into<String>) -> Self {
        Self { slug: Some(slug.into()), ..Self::default() }
    }
}

/// Criteria for user existence/count checks.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub tenant_id: Option<EntityId>,
}

impl UserFilter {
    pub fn by_tenant(tenant_id: EntityId) -> Self {
        Self { tenant_id: Some(tenant_id) }
    }
}

/// Sortable tenant columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TenantSort {
    Name,
    Slug,
    #[default]
    CreatedAt,
}

/// Sortable user columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserSort {
    Name,
    Status,
    #[default]
    CreatedAt,
}

/// Generic CRUD port over the relational store.
///
/// Key lookups that match zero rows are never errors: they surface as
/// `None` or a zero affected count. Store-level failures (constraint
/// violations, connectivity) surface as `Err`.
#[async_trait]
pub trait CrudRepository: Send + Sync {
    /// Persisted shape returned by writes and paged queries.
    type Entity: Persisted + Send + Sync;
    /// Insert shape; the repository assigns id and creation stamp.
    type Draft: Send + Sync;
    /// Partial-update shape carrying the entity's key fields.
    type Patch: Send + Sync;
    /// Point-lookup result, possibly carrying joined related fields.
    type Detail: Send + Sync;
    /// Existence/count criteria.
    type Filter: Send + Sync;
    /// Whitelisted sort column.
    type Sort: Default + Send + Sync;

    /// Fetches by primary key; wrong-tenant access yields `None`.
    async fn find_by_id(
        &self,
        key: &ScopedId,
        opts: &FindOptions,
    ) -> DomainResult<Option<Self::Detail>>;

    async fn exists(&self, filter: &Self::Filter) -> DomainResult<bool>;

    async fn count_all(&self, filter: &Self::Filter) -> DomainResult<u64>;

    async fn page(
        &self,
        params: &PageParams<Self::Sort>,
    ) -> DomainResult<PagedResult<Self::Entity>>;

    async fn create(&self, draft: &Self::Draft) -> DomainResult<Self::Entity>;

    /// Batch insert. With a session every row shares its transaction and
    /// the first failure aborts the batch; without one, rows are inserted
    /// independently and the returned entities reflect only the successes.
    async fn create_many(
        &self,
        drafts: &[Self::Draft],
        session: Option<&mut AtomicSession>,
    ) -> DomainResult<Vec<Self::Entity>>;

    /// Partial update; `None` when no row matched the patch's key.
    async fn patch(&self, patch: &Self::Patch) -> DomainResult<Option<Self::Entity>>;

    /// Hard delete; returns the affected row count.
    async fn delete_single(&self, key: &ScopedId) -> DomainResult<u64>;

    /// Batch hard delete with the same session semantics as `create_many`.
    async fn delete_many(
        &self,
        keys: &[ScopedId],
        session: Option<&mut AtomicSession>,
    ) -> DomainResult<u64>;
}

/// Tenant persistence port.
#[async_trait]
pub trait TenantRepository:
    CrudRepository<
    Entity = Tenant,
    Draft = NewTenant,
    Patch = TenantPatch,
    Detail = Tenant,
    Filter = TenantFilter,
    Sort = TenantSort,
>
{
    /// Looks up a tenant by its slug.
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Tenant>>;
}

/// User persistence port.
pub trait UserRepository:
    CrudRepository<
    Entity = User,
    Draft = NewUser,
    Patch = UserPatch,
    Detail = UserDetail,
    Filter = UserFilter,
    Sort = UserSort,
>
{
}

/// Read-only tenant lookups for collaborating services.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn tenant_exists(&self, id: EntityId) -> DomainResult<bool>;
}

/// Read-only user counts for collaborating services.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCensus: Send + Sync {
    async fn count_by_tenant(&self, tenant_id: EntityId) -> DomainResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_clamp_and_offset() {
        let params = PageParams::<TenantSort> {
            page_index: 0,
            page_size: 500,
            ..PageParams::default()
        }
        .clamped();
        assert_eq!(params.page_index, 1);
        assert_eq!(params.page_size, MAX_PAGE_SIZE);
        assert_eq!(params.offset(), 0);

        let params = PageParams::<TenantSort> {
            page_index: 3,
            page_size: 10,
            ..PageParams::default()
        };
        assert_eq!(params.offset(), 20);
        assert_eq!(params.limit(), 10);
    }
}
