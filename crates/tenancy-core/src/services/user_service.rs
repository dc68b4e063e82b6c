//! User management service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use tenancy_shared::types::{Outcome, ScopedId};

use crate::atomic::AtomicSessionFactory;
use crate::domain::{NewUser, Persisted, UserPatch};
use crate::dto::{
    CountUserRequest, CountUserResponse, CreateUserRequest, Created, DeleteUserRequest, Deleted,
    EditUserRequest, Edited, GetUserByIdRequest, GetUserListRequest, OpOutcome, PagedList,
    UserDetails, UserField, UserListItem,
};
use crate::error::{DomainResult, ViolationCode};
use crate::repositories::{FindOptions, TenantDirectory, UserFilter, UserRepository};
use crate::services::management::ManagementService;

pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
    sessions: Arc<AtomicSessionFactory>,
    tenant_directory: Arc<dyn TenantDirectory>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(
        repo: Arc<R>,
        sessions: Arc<AtomicSessionFactory>,
        tenant_directory: Arc<dyn TenantDirectory>,
    ) -> Self {
        Self { repo, sessions, tenant_directory }
    }

    /// Counts all users under a tenant.
    pub async fn count(&self, req: CountUserRequest) -> DomainResult<CountUserResponse> {
        let total = self.repo.count_all(&UserFilter::by_tenant(req.tenant_id)).await?;
        Ok(CountUserResponse { total })
    }

    pub async fn create(&self, req: CreateUserRequest) -> DomainResult<OpOutcome<Created>> {
        info!(tenant_id = %req.tenant_id, "Creating user");
        self.create_one(&req).await
    }

    /// Batch create inside one session; either every user persists or none
    /// does.
    pub async fn create_many(
        &self,
        reqs: Vec<CreateUserRequest>,
    ) -> DomainResult<OpOutcome<Vec<Created>>> {
        for req in &reqs {
            if let Some(code) = self.check_create_violation(req).await? {
                return Ok(Outcome::Rejected(code));
            }
        }
        let drafts: Vec<NewUser> = reqs.iter().map(|req| self.draft_from(req)).collect();
        let mut session = self.sessions.start_session().await?;
        let result = self.repo.create_many(&drafts, Some(&mut session)).await;
        let users = session.finish(result).await?;
        Ok(Outcome::Ok(
            users
                .into_iter()
                .map(|user| Created { id: user.id, created_at: user.created_at() })
                .collect(),
        ))
    }

    pub async fn edit(&self, req: EditUserRequest) -> DomainResult<OpOutcome<Edited>> {
        self.edit_one(&req).await
    }

    pub async fn get_by_id(&self, req: GetUserByIdRequest) -> DomainResult<Option<UserDetails>> {
        let (fields, opts) = Self::rebuild_get_params(req.fields);
        let found = self
            .get_one(ScopedId::scoped(req.id, req.tenant_id), opts)
            .await?;
        Ok(found.map(|detail| UserDetails::project(detail, &fields)))
    }

    pub async fn get_list(&self, req: GetUserListRequest) -> DomainResult<PagedList<UserListItem>> {
        let page = self.list_page((&req).into()).await?;
        Ok(PagedList::new(
            page.items
                .into_iter()
                .map(|user| UserListItem::project(user, &req.fields))
                .collect(),
            Some(page.total),
        ))
    }

    pub async fn hard_delete_single(
        &self,
        req: DeleteUserRequest,
    ) -> DomainResult<OpOutcome<Deleted>> {
        ManagementService::hard_delete_single(self, &req).await
    }

    pub async fn hard_delete_many(
        &self,
        req: DeleteUserRequest,
    ) -> DomainResult<OpOutcome<Deleted>> {
        ManagementService::hard_delete_many(self, &req).await
    }

    /// `tenantName` is not a user column: strip it from the projection and
    /// ask the repository to join the owning tenant's name instead.
    fn rebuild_get_params(fields: Vec<UserField>) -> (Vec<UserField>, FindOptions) {
        if fields.contains(&UserField::TenantName) {
            let fields: Vec<UserField> = fields
                .into_iter()
                .filter(|field| *field != UserField::TenantName)
                .collect();
            (fields, FindOptions { with_relations: true })
        } else {
            (fields, FindOptions::default())
        }
    }
}

#[async_trait]
impl<R: UserRepository> ManagementService for UserService<R> {
    type Repo = R;
    type CreateRequest = CreateUserRequest;
    type EditRequest = EditUserRequest;
    type DeleteRequest = DeleteUserRequest;

    fn repo(&self) -> &R {
        &self.repo
    }

    fn sessions(&self) -> &AtomicSessionFactory {
        &self.sessions
    }

    fn draft_from(&self, req: &CreateUserRequest) -> NewUser {
        NewUser { tenant_id: req.tenant_id, name: req.name.clone(), status: req.status }
    }

    fn patch_from(&self, req: &EditUserRequest) -> UserPatch {
        UserPatch {
            id: req.id,
            tenant_id: req.tenant_id,
            name: req.name.clone(),
            status: req.status,
        }
    }

    fn delete_keys(&self, req: &DeleteUserRequest) -> Vec<ScopedId> {
        req.ids
            .iter()
            .map(|id| ScopedId::scoped(*id, req.tenant_id))
            .collect()
    }

    fn delete_is_atomic(&self, req: &DeleteUserRequest) -> bool {
        req.is_atomic()
    }

    /// Every user must reference an existing tenant.
    async fn check_create_violation(
        &self,
        req: &CreateUserRequest,
    ) -> DomainResult<Option<ViolationCode>> {
        if !self.tenant_directory.tenant_exists(req.tenant_id).await? {
            return Ok(Some(ViolationCode::TenantNotExisting));
        }
        Ok(None)
    }
}
