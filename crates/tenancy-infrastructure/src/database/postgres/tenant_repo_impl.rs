//! PostgreSQL tenant repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use tenancy_core::atomic::AtomicSession;
use tenancy_core::domain::{NewTenant, Tenant, TenantPatch};
use tenancy_core::error::DomainResult;
use tenancy_core::repositories::{
    CrudRepository, FindOptions, PageParams, PagedResult, TenantDirectory, TenantFilter,
    TenantRepository, TenantSort,
};
use tenancy_shared::types::{EntityId, ScopedId, new_id};
use tenancy_shared::utils::utc_now;

use crate::database::map_db_err;

const TENANT_COLUMNS: &str = "id, name, slug, created_at, updated_at";

pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn sort_column(sort: TenantSort) -> &'static str {
        match sort {
            TenantSort::Name => "name",
            TenantSort::Slug => "slug",
            TenantSort::CreatedAt => "created_at",
        }
    }

    async fn insert_one<'e, E>(&self, executor: E, draft: &NewTenant) -> DomainResult<Tenant>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let row: TenantRow = sqlx::query_as(
            "INSERT INTO tenants (id, name, slug, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, name, slug, created_at, updated_at",
        )
        .bind(new_id())
        .bind(&draft.name)
        .bind(&draft.slug)
        .bind(utc_now())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            error!("Database error creating tenant: {}", e);
            map_db_err(e)
        })?;
        Ok(row.into())
    }

    async fn delete_one<'e, E>(&self, executor: E, key: &ScopedId) -> DomainResult<u64>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(key.id)
            .execute(executor)
            .await
            .map_err(|e| {
                error!("Database error deleting tenant: {}", e);
                map_db_err(e)
            })?;
        Ok(result.rows_affected())
    }
}

#[derive(Debug, FromRow)]
struct TenantRow {
    id: Uuid,
    name: String,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Tenant {
            id: row.id,
            name: row.name,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CrudRepository for PgTenantRepository {
    type Entity = Tenant;
    type Draft = NewTenant;
    type Patch = TenantPatch;
    type Detail = Tenant;
    type Filter = TenantFilter;
    type Sort = TenantSort;

    async fn find_by_id(
        &self,
        key: &ScopedId,
        _opts: &FindOptions,
    ) -> DomainResult<Option<Tenant>> {
        let row: Option<TenantRow> = sqlx::query_as(
            "SELECT id, name, slug, created_at, updated_at FROM tenants WHERE id = $1",
        )
        .bind(key.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding tenant by id: {}", e);
            map_db_err(e)
        })?;
        Ok(row.map(Into::into))
    }

    async fn exists(&self, filter: &TenantFilter) -> DomainResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS( \
               SELECT 1 FROM tenants \
               WHERE ($1::uuid IS NULL OR id = $1) \
                 AND ($2::varchar IS NULL OR slug = $2))",
        )
        .bind(filter.id)
        .bind(&filter.slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error checking tenant existence: {}", e);
            map_db_err(e)
        })
    }

    async fn count_all(&self, filter: &TenantFilter) -> DomainResult<u64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tenants \
             WHERE ($1::uuid IS NULL OR id = $1) \
               AND ($2::varchar IS NULL OR slug = $2)",
        )
        .bind(filter.id)
        .bind(&filter.slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error counting tenants: {}", e);
            map_db_err(e)
        })?;
        Ok(total as u64)
    }

    async fn page(&self, params: &PageParams<TenantSort>) -> DomainResult<PagedResult<Tenant>> {
        // Sort column comes from a fixed enum, never from raw input.
        let sql = format!(
            "SELECT {} FROM tenants ORDER BY {} {} LIMIT $1 OFFSET $2",
            TENANT_COLUMNS,
            Self::sort_column(params.sort_by),
            params.sort_type.as_sql(),
        );
        let rows: Vec<TenantRow> = sqlx::query_as(&sql)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error paging tenants: {}", e);
                map_db_err(e)
            })?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenants")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(PagedResult {
            items: rows.into_iter().map(Into::into).collect(),
            total: total as u64,
        })
    }

    async fn create(&self, draft: &NewTenant) -> DomainResult<Tenant> {
        info!(slug = %draft.slug, "Inserting tenant");
        self.insert_one(&self.pool, draft).await
    }

    async fn create_many(
        &self,
        drafts: &[NewTenant],
        session: Option<&mut AtomicSession>,
    ) -> DomainResult<Vec<Tenant>> {
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
                        Ok(tenant) => created.push(tenant),
                        Err(err) => {
                            tracing::warn!(error = %err, "Skipping tenant in non-atomic batch")
                        }
                    }
                }
            }
        }
        Ok(created)
    }

    async fn patch(&self, patch: &TenantPatch) -> DomainResult<Option<Tenant>> {
        let row: Option<TenantRow> = sqlx::query_as(
            "UPDATE tenants SET \
               name = COALESCE($2, name), \
               slug = COALESCE($3, slug), \
               updated_at = $4 \
             WHERE id = $1 \
             RETURNING id, name, slug, created_at, updated_at",
        )
        .bind(patch.id)
        .bind(&patch.name)
        .bind(&patch.slug)
        .bind(utc_now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error patching tenant: {}", e);
            map_db_err(e)
        })?;
        Ok(row.map(Into::into))
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
                        Err(err) => {
                            tracing::warn!(error = %err, "Skipping tenant in non-atomic batch")
                        }
                    }
                }
            }
        }
        Ok(total)
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Tenant>> {
        let row: Option<TenantRow> = sqlx::query_as(
            "SELECT id, name, slug, created_at, updated_at FROM tenants WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding tenant by slug: {}", e);
            map_db_err(e)
        })?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl TenantDirectory for PgTenantRepository {
    async fn tenant_exists(&self, id: EntityId) -> DomainResult<bool> {
        self.exists(&TenantFilter::by_id(id)).await
    }
}
