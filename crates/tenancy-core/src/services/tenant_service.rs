//! Tenant management service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use tenancy_shared::types::ScopedId;

use crate::atomic::AtomicSessionFactory;
use crate::dto::{
    CreateTenantRequest, Created, DeleteTenantRequest, Deleted, EditTenantRequest, Edited,
    GetTenantByIdRequest, GetTenantBySlugRequest, GetTenantListRequest, OpOutcome, PagedList,
    TenantDetails, TenantListItem,
};
use crate::domain::{NewTenant, TenantPatch};
use crate::error::{DomainResult, ViolationCode};
use crate::repositories::{FindOptions, TenantFilter, TenantRepository, UserCensus};
use crate::services::management::ManagementService;

pub struct TenantService<R: TenantRepository> {
    repo: Arc<R>,
    sessions: Arc<AtomicSessionFactory>,
    user_census: Arc<dyn UserCensus>,
}

impl<R: TenantRepository> TenantService<R> {
    pub fn new(
        repo: Arc<R>,
        sessions: Arc<AtomicSessionFactory>,
        user_census: Arc<dyn UserCensus>,
    ) -> Self {
        Self { repo, sessions, user_census }
    }

    pub async fn create(&self, req: CreateTenantRequest) -> DomainResult<OpOutcome<Created>> {
        info!(slug = %req.slug, "Creating tenant");
        self.create_one(&req).await
    }

    pub async fn edit(&self, req: EditTenantRequest) -> DomainResult<OpOutcome<Edited>> {
        self.edit_one(&req).await
    }

    /// Checks if a tenant matching the criteria exists.
    pub async fn exists(&self, filter: TenantFilter) -> DomainResult<bool> {
        self.repo.exists(&filter).await
    }

    pub async fn get_by_id(
        &self,
        req: GetTenantByIdRequest,
    ) -> DomainResult<Option<TenantDetails>> {
        let found = self
            .get_one(ScopedId::global(req.id), FindOptions::default())
            .await?;
        Ok(found.map(TenantDetails::from))
    }

    /// Tenant resolution for incoming requests addressed by slug.
    pub async fn get_by_slug(
        &self,
        req: GetTenantBySlugRequest,
    ) -> DomainResult<Option<TenantDetails>> {
        Ok(self.repo.find_by_slug(&req.slug).await?.map(TenantDetails::from))
    }

    pub async fn get_list(
        &self,
        req: GetTenantListRequest,
    ) -> DomainResult<PagedList<TenantListItem>> {
        let page = self.list_page((&req).into()).await?;
        Ok(PagedList::new(
            page.items.into_iter().map(TenantListItem::from).collect(),
            Some(page.total),
        ))
    }

    pub async fn hard_delete_single(
        &self,
        req: DeleteTenantRequest,
    ) -> DomainResult<OpOutcome<Deleted>> {
        ManagementService::hard_delete_single(self, &req).await
    }

    pub async fn hard_delete_many(
        &self,
        req: DeleteTenantRequest,
    ) -> DomainResult<OpOutcome<Deleted>> {
        ManagementService::hard_delete_many(self, &req).await
    }
}

#[async_trait]
impl<R: TenantRepository> ManagementService for TenantService<R> {
    type Repo = R;
    type CreateRequest = CreateTenantRequest;
    type EditRequest = EditTenantRequest;
    type DeleteRequest = DeleteTenantRequest;

    fn repo(&self) -> &R {
        &self.repo
    }

    fn sessions(&self) -> &AtomicSessionFactory {
        &self.sessions
    }

    fn draft_from(&self, req: &CreateTenantRequest) -> NewTenant {
        NewTenant { name: req.name.clone(), slug: req.slug.clone() }
    }

    fn patch_from(&self, req: &EditTenantRequest) -> TenantPatch {
        TenantPatch { id: req.id, name: req.name.clone(), slug: req.slug.clone() }
    }

    fn delete_keys(&self, req: &DeleteTenantRequest) -> Vec<ScopedId> {
        req.ids.iter().copied().map(ScopedId::global).collect()
    }

    fn delete_is_atomic(&self, req: &DeleteTenantRequest) -> bool {
        req.is_atomic()
    }

    async fn check_create_violation(
        &self,
        req: &CreateTenantRequest,
    ) -> DomainResult<Option<ViolationCode>> {
        if self.repo.exists(&TenantFilter::by_slug(req.slug.clone())).await? {
            return Ok(Some(ViolationCode::TenantSlugAlreadyExists));
        }
        Ok(None)
    }

    /// A non-cascading delete must not orphan users.
    async fn check_delete_single_violation(
        &self,
        req: &DeleteTenantRequest,
    ) -> DomainResult<Option<ViolationCode>> {
        if req.is_cascading() {
            return Ok(None);
        }
        let Some(id) = req.ids.first() else {
            return Ok(None);
        };
        if self.user_census.count_by_tenant(*id).await? > 0 {
            return Ok(Some(ViolationCode::TenantIsAssociatedByUsers));
        }
        Ok(None)
    }
}
