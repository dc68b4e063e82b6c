//! Composition root
//!
//! Explicit constructor wiring: concrete repositories and the session
//! factory are built once at process start and handed to the services.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use tenancy_core::atomic::AtomicSessionFactory;
use tenancy_core::repositories::{TenantDirectory, UserCensus};
use tenancy_core::services::{TenantService, UserService};
use tenancy_core::{DomainError, DomainResult};
use tenancy_shared::config::AppConfig;

use crate::database::{create_pool, PgTenantRepository, PgUserRepository};

pub struct Backend {
    pub pool: PgPool,
    pub tenants: Arc<TenantService<PgTenantRepository>>,
    pub users: Arc<UserService<PgUserRepository>>,
}

impl Backend {
    pub async fn init(config: &AppConfig) -> DomainResult<Self> {
        let pool = create_pool(&config.database.url, config.database.max_connections)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        let sessions = Arc::new(AtomicSessionFactory::new(pool.clone()));

        let tenant_repo = Arc::new(PgTenantRepository::new(pool.clone()));
        let user_repo = Arc::new(PgUserRepository::new(pool.clone()));

        let user_census: Arc<dyn UserCensus> = user_repo.clone();
        let tenant_directory: Arc<dyn TenantDirectory> = tenant_repo.clone();

        let tenants = Arc::new(TenantService::new(
            tenant_repo,
            sessions.clone(),
            user_census,
        ));
        let users = Arc::new(UserService::new(user_repo, sessions, tenant_directory));

        info!(app = %config.app.name, "Backend wired");
        Ok(Self { pool, tenants, users })
    }

    pub async fn run_migrations(&self) -> DomainResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        info!("Migrations applied");
        Ok(())
    }
}
