//! Domain errors and business-rule violation codes

use serde::Serialize;
use thiserror::Error;

/// Store-level and internal failures.
///
/// These propagate to the caller as `Err`; expected absence and
/// business-rule rejections never take this path.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Machine-readable reason attached to a business-rule rejection.
///
/// Detected by a violation hook before any write reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    TenantSlugAlreadyExists,
    TenantNotExisting,
    TenantIsAssociatedByUsers,
}

impl ViolationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationCode::TenantSlugAlreadyExists => "TENANT_SLUG_ALREADY_EXISTS",
            ViolationCode::TenantNotExisting => "TENANT_NOT_EXISTING",
            ViolationCode::TenantIsAssociatedByUsers => "TENANT_IS_ASSOCIATED_BY_USERS",
        }
    }
}

impl std::fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
