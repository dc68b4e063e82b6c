//! Atomic session: one store transaction shared by several repository calls.
//!
//! A caller opens a session, threads it through the repository operations
//! that must commit or roll back together, and finalizes the unit with
//! [`AtomicSession::finish`]. Steps run strictly sequentially; a session
//! that is dropped without finishing never commits its writes.

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, error};

use crate::error::{DomainError, DomainResult};

pub struct AtomicSession {
    tx: Transaction<'static, Postgres>,
}

impl AtomicSession {
    /// Connection bound to this session's transaction. Repository methods
    /// accepting an optional session execute against this instead of the
    /// shared pool.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    /// Finalizes the unit of work: commits when the accumulated result is
    /// `Ok`, rolls back and propagates the failure otherwise.
    pub async fn finish<T>(self, result: DomainResult<T>) -> DomainResult<T> {
        match result {
            Ok(value) => {
                self.tx.commit().await.map_err(|e| {
                    error!("Failed to commit atomic session: {}", e);
                    DomainError::DatabaseError(e.to_string())
                })?;
                debug!("Atomic session committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rb) = self.tx.rollback().await {
                    error!("Failed to roll back atomic session: {}", rb);
                }
                debug!("Atomic session rolled back");
                Err(err)
            }
        }
    }
}

/// Opens transaction-backed sessions on the shared pool.
pub struct AtomicSessionFactory {
    pool: PgPool,
}

impl AtomicSessionFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn start_session(&self) -> DomainResult<AtomicSession> {
        let tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to open atomic session: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;
        Ok(AtomicSession { tx })
    }
}
