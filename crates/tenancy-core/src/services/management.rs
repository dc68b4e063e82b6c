//! Generic CRUD orchestration
//!
//! Entity services implement the request-mapping hooks and override the
//! violation checks they care about; the default methods run the
//! check-then-act flow and package the result. A violation short-circuits
//! before any write reaches the store.

use async_trait::async_trait;
use tracing::{debug, warn};

use tenancy_shared::constants::MAX_BATCH_DELETE;
use tenancy_shared::types::{Outcome, ScopedId};
use tenancy_shared::utils::utc_now;

use crate::atomic::AtomicSessionFactory;
use crate::domain::Persisted;
use crate::dto::{Created, Deleted, Edited, OpOutcome};
use crate::error::{DomainResult, ViolationCode};
use crate::repositories::{CrudRepository, FindOptions, PageParams, PagedResult};

#[async_trait]
pub trait ManagementService: Send + Sync {
    type Repo: CrudRepository;
    type CreateRequest: Send + Sync;
    type EditRequest: Send + Sync;
    type DeleteRequest: Send + Sync;

    fn repo(&self) -> &Self::Repo;

    fn sessions(&self) -> &AtomicSessionFactory;

    /// Builds the insert shape from a create request.
    fn draft_from(&self, req: &Self::CreateRequest) -> <Self::Repo as CrudRepository>::Draft;

    /// Builds the partial-update shape from an edit request.
    fn patch_from(&self, req: &Self::EditRequest) -> <Self::Repo as CrudRepository>::Patch;

    /// Keys targeted by a delete request, in request order.
    fn delete_keys(&self, req: &Self::DeleteRequest) -> Vec<ScopedId>;

    fn delete_is_atomic(&self, req: &Self::DeleteRequest) -> bool;

    async fn check_create_violation(
        &self,
        _req: &Self::CreateRequest,
    ) -> DomainResult<Option<ViolationCode>> {
        Ok(None)
    }

    async fn check_edit_violation(
        &self,
        _req: &Self::EditRequest,
    ) -> DomainResult<Option<ViolationCode>> {
        Ok(None)
    }

    async fn check_delete_single_violation(
        &self,
        _req: &Self::DeleteRequest,
    ) -> DomainResult<Option<ViolationCode>> {
        Ok(None)
    }

    async fn check_delete_many_violation(
        &self,
        _req: &Self::DeleteRequest,
    ) -> DomainResult<Option<ViolationCode>> {
        Ok(None)
    }

    async fn create_one(&self, req: &Self::CreateRequest) -> DomainResult<OpOutcome<Created>> {
        if let Some(code) = self.check_create_violation(req).await? {
            warn!(code = %code, "Create rejected by violation check");
            return Ok(Outcome::Rejected(code));
        }
        let entity = self.repo().create(&self.draft_from(req)).await?;
        Ok(Outcome::Ok(Created {
            id: entity.key().id,
            created_at: entity.created_at(),
        }))
    }

    async fn edit_one(&self, req: &Self::EditRequest) -> DomainResult<OpOutcome<Edited>> {
        if let Some(code) = self.check_edit_violation(req).await? {
            warn!(code = %code, "Edit rejected by violation check");
            return Ok(Outcome::Rejected(code));
        }
        match self.repo().patch(&self.patch_from(req)).await? {
            Some(entity) => Ok(Outcome::Ok(Edited {
                updated_at: entity.updated_at().unwrap_or_else(utc_now),
            })),
            None => Ok(Outcome::NotFound),
        }
    }

    async fn hard_delete_single(
        &self,
        req: &Self::DeleteRequest,
    ) -> DomainResult<OpOutcome<Deleted>> {
        if let Some(code) = self.check_delete_single_violation(req).await? {
            warn!(code = %code, "Delete rejected by violation check");
            return Ok(Outcome::Rejected(code));
        }
        let keys = self.delete_keys(req);
        let Some(key) = keys.first() else {
            return Ok(Outcome::NotFound);
        };
        let affected = self.repo().delete_single(key).await?;
        if affected > 0 {
            Ok(Outcome::Ok(Deleted { deleted_at: utc_now(), affected }))
        } else {
            Ok(Outcome::NotFound)
        }
    }

    /// Atomic batches run inside one session and roll back as a unit;
    /// non-atomic batches delete each key independently and report the
    /// aggregate count of the keys that succeeded. Batches are bounded to
    /// [`MAX_BATCH_DELETE`] keys; extra keys are ignored.
    async fn hard_delete_many(
        &self,
        req: &Self::DeleteRequest,
    ) -> DomainResult<OpOutcome<Deleted>> {
        if let Some(code) = self.check_delete_many_violation(req).await? {
            warn!(code = %code, "Batch delete rejected by violation check");
            return Ok(Outcome::Rejected(code));
        }
        let mut keys = self.delete_keys(req);
        keys.truncate(MAX_BATCH_DELETE);
        let affected = if self.delete_is_atomic(req) {
            let mut session = self.sessions().start_session().await?;
            let result = self.repo().delete_many(&keys, Some(&mut session)).await;
            session.finish(result).await?
        } else {
            let mut total = 0u64;
            for key in &keys {
                match self.repo().delete_single(key).await {
                    Ok(count) => total += count,
                    Err(err) => {
                        warn!(error = %err, "Batch delete item failed, continuing");
                    }
                }
            }
            total
        };
        if affected > 0 {
            Ok(Outcome::Ok(Deleted { deleted_at: utc_now(), affected }))
        } else {
            Ok(Outcome::NotFound)
        }
    }

    async fn get_one(
        &self,
        key: ScopedId,
        opts: FindOptions,
    ) -> DomainResult<Option<<Self::Repo as CrudRepository>::Detail>> {
        debug!(id = %key.id, "Point lookup");
        self.repo().find_by_id(&key, &opts).await
    }

    async fn list_page(
        &self,
        params: PageParams<<Self::Repo as CrudRepository>::Sort>,
    ) -> DomainResult<PagedResult<<Self::Repo as CrudRepository>::Entity>> {
        self.repo().page(&params.clamped()).await
    }
}
