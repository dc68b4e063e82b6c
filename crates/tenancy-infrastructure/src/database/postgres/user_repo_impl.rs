//! PostgreSQL user repository
//!
//! Every query is keyed by the `(id, tenant_id)` pair; a lookup scoped to
//! the wrong tenant matches nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info, warn};
use uuid::Uuid;

use tenancy_core::atomic::AtomicSession;
use tenancy_core::domain::{NewUser, User, UserDetail, UserPatch, UserStatus};
use tenancy_core::error::{DomainError, DomainResult};
use tenancy_core::repositories::{
    CrudRepository, FindOptions, PageParams, PagedResult, UserCensus, UserFilter, UserRepository,
    UserSort,
};
use tenancy_shared::types::{EntityId, ScopedId, new_id};
use tenancy_shared::utils::utc_now;

use crate::database::map_db_err;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn sort_column(sort: UserSort) -> &'static str {
        match sort {
            UserSort::Name => "name",
            UserSort::Status => "status",
            UserSort::CreatedAt => "created_at",
        }
    }

    async fn insert_one<'e, E>(&self, executor: E, draft: &NewUser) -> DomainResult<User>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (id, tenant_id, name, status, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, tenant_id, name, status, created_at, updated_at",
        )
        .bind(new_id())
        .bind(draft.tenant_id)
        .bind(&draft.name)
        .bind(draft.status.as_str())
        .bind(utc_now())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            error!("Database error creating user: {}", e);
            map_db_err(e)
        })?;
        row.try_into()
    }

    async fn delete_one<'e, E>(&self, executor: E, key: &ScopedId) -> DomainResult<u64>
    where
        E: sqlx::PgExecutor<'e>,
    {
        // A user key without a tenant scope can never match a row.
        let Some(tenant_id) = key.tenant_id else {
            return Ok(0);
        };
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND tenant_id = $2")
            .bind(key.id)
            .bind(tenant_id)
            .execute(executor)
            .await
            .map_err(|e| {
                error!("Database error deleting user: {}", e);
                map_db_err(e)
            })?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

// A status outside the known set means the schema and the code have
// drifted apart; surface it instead of coercing to a valid value.
fn parse_status(raw: &str) -> DomainResult<UserStatus> {
    UserStatus::from_str(raw)
        .ok_or_else(|| DomainError::InternalError(format!("unknown user status '{raw}'")))
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> DomainResult<Self> {
        Ok(User {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            status: parse_status(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserDetailRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    tenant_name: Option<String>,
}

impl TryFrom<UserDetailRow> for UserDetail {
    type Error = DomainError;

    fn try_from(row: UserDetailRow) -> DomainResult<Self> {
        Ok(UserDetail {
            user: User {
                id: row.id,
                tenant_id: row.tenant_id,
                name: row.name,
                status: parse_status(&row.status)?,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            tenant_name: row.tenant_name,
        })
    }
}

#[async_trait]
impl CrudRepository for PgUserRepository {
    type Entity = User;
    type Draft = NewUser;
    type Patch = UserPatch;
    type Detail = UserDetail;
    type Filter = UserFilter;
    type Sort = UserSort;

    async fn find_by_id(
        &self,
        key: &ScopedId,
        opts: &FindOptions,
    ) -> DomainResult<Option<UserDetail>> {
        let Some(tenant_id) = key.tenant_id else {
            return Ok(None);
        };
        let sql = if opts.with_relations {
            "SELECT u.id, u.tenant_id, u.name, u.status, u.created_at, u.updated_at, \
                    t.name AS tenant_name \
             FROM users u \
             LEFT JOIN tenants t ON t.id = u.tenant_id \
             WHERE u.id = $1 AND u.tenant_id = $2"
        } else {
            "SELECT u.id, u.tenant_id, u.name, u.status, u.created_at, u.updated_at, \
                    NULL::varchar AS tenant_name \
             FROM users u \
             WHERE u.id = $1 AND u.tenant_id = $2"
        };
        let row: Option<UserDetailRow> = sqlx::query_as(sql)
            .bind(key.id)
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding user by id: {}", e);
                map_db_err(e)
            })?;
        row.map(TryInto::try_into).transpose()
    }

    async fn exists(&self, filter: &UserFilter) -> DomainResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS( \
               SELECT 1 FROM users WHERE ($1::uuid IS NULL OR tenant_id = $1))",
        )
        .bind(filter.tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error checking user existence: {}", e);
            map_db_err(e)
        })
    }

    async fn count_all(&self, filter: &UserFilter) -> DomainResult<u64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::uuid IS NULL OR tenant_id = $1)",
        )
        .bind(filter.tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error counting users: {}", e);
            map_db_err(e)
        })?;
        Ok(total as u64)
    }

    async fn page(&self, params: &PageParams<UserSort>) -> DomainResult<PagedResult<User>> {
        // Sort column comes from a fixed enum, never from raw input.
        let sql = format!(
            "SELECT id, tenant_id, name, status, created_at, updated_at FROM users \
             WHERE ($1::uuid IS NULL OR tenant_id = $1) \
             ORDER BY {} {} LIMIT $2 OFFSET $3",
            Self::sort_column(params.sort_by),
            params.sort_type.as_sql(),
        );
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .bind(params.tenant_id)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error paging users: {}", e);
                map_db_err(e)
            })?;
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::uuid IS NULL OR tenant_id = $1)",
        )
        .bind(params.tenant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;
        let items = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<DomainResult<Vec<User>>>()?;
        Ok(PagedResult { items, total: total as u64 })
    }

    async fn create(&self, draft: &NewUser) -> DomainResult<User> {
        info!(tenant_id = %draft.tenant_id, "Inserting user");
        self.insert_one(&self.pool, draft).await
    }

    async fn create_many(
        &self,
        drafts: &[NewUser],
        session: Option<&mut AtomicSession>,
    ) -> DomainResult<Vec<User>> {
        let mut created = Vec::with_capacity(drafts.len());
        match session {
            Some(session) => {
                for draft in drafts {
                    created.push(self.insert_one(&mut *session.conn(), draft).await?);
                }
            }
            None => {
                for draft in drafts {
                    match self.insert_one(&self.pool, draft).await {
                        Ok(user) => created.push(user),
                        Err(err) => warn!(error = %err, "Skipping user in non-atomic batch"),
                    }
                }
            }
        }
        Ok(created)
    }

    async fn patch(&self, patch: &UserPatch) -> DomainResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "UPDATE users SET \
               name = COALESCE($3, name), \
               status = COALESCE($4, status), \
               updated_at = $5 \
             WHERE id = $1 AND tenant_id = $2 \
             RETURNING id, tenant_id, name, status, created_at, updated_at",
        )
        .bind(patch.id)
        .bind(patch.tenant_id)
        .bind(&patch.name)
        .bind(patch.status.map(|status| status.as_str()))
        .bind(utc_now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error patching user: {}", e);
            map_db_err(e)
        })?;
        row.map(TryInto::try_into).transpose()
    }

    async fn delete_single(&self, key: &ScopedId) -> DomainResult<u64> {
        self.delete_one(&self.pool, key).await
    }

    async fn delete_many(
        &self,
        keys: &[ScopedId],
        session: Option<&mut AtomicSession>,
    ) -> DomainResult<u64> {
        let mut total = 0;
        match session {
            Some(session) => {
                for key in keys {
                    total += self.delete_one(&mut *session.conn(), key).await?;
                }
            }
            None => {
                for key in keys {
                    match self.delete_one(&self.pool, key).await {
                        Ok(count) => total += count,
                        Err(err) => warn!(error = %err, "Skipping user in non-atomic batch"),
                    }
                }
            }
        }
        Ok(total)
    }
}

impl UserRepository for PgUserRepository {}

#[async_trait]
impl UserCensus for PgUserRepository {
    async fn count_by_tenant(&self, tenant_id: EntityId) -> DomainResult<u64> {
        self.count_all(&UserFilter::by_tenant(tenant_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_surfaces_as_an_internal_error() {
        let row = UserRow {
            id: new_id(),
            tenant_id: new_id(),
            name: "John Nemo".into(),
            status: "archived".into(),
            created_at: utc_now(),
            updated_at: None,
        };
        let err = User::try_from(row).expect_err("unknown status must not map");
        assert!(matches!(err, DomainError::InternalError(_)));
    }

    #[test]
    fn known_statuses_round_trip_through_the_row_mapping() {
        for status in [UserStatus::Active, UserStatus::Locked, UserStatus::Deleted] {
            let row = UserRow {
                id: new_id(),
                tenant_id: new_id(),
                name: "John Nemo".into(),
                status: status.as_str().into(),
                created_at: utc_now(),
                updated_at: None,
            };
            let user = User::try_from(row).expect("known status maps");
            assert_eq!(user.status, status);
        }
    }
}
