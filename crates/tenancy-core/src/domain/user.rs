//! User domain entity
//!
//! A user id is only unique within its owning tenant; the primary key is
//! the `(id, tenant_id)` pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tenancy_shared::types::{EntityId, ScopedId};

use super::Persisted;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Locked,
    Deleted,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Locked => "locked",
            UserStatus::Deleted => "deleted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(UserStatus::Active),
            "locked" => Some(UserStatus::Locked),
            "deleted" => Some(UserStatus::Deleted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub tenant_id: EntityId,
    pub name: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Persisted for User {
    fn key(&self) -> ScopedId {
        ScopedId::scoped(self.id, self.tenant_id)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// A user row together with fields pulled from related entities.
///
/// `tenant_name` is only populated when the lookup asked for the owning
/// tenant to be joined in.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetail {
    pub user: User,
    pub tenant_name: Option<String>,
}

/// Insert shape; id and `created_at` are assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub tenant_id: EntityId,
    pub name: String,
    pub status: UserStatus,
}

/// Partial update keyed by `(id, tenant_id)`; `None` fields are left
/// untouched.
#[derive(Debug, Clone)]
pub struct UserPatch {
    pub id: EntityId,
    pub tenant_id: EntityId,
    pub name: Option<String>,
    pub status: Option<UserStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        for status in [UserStatus::Active, UserStatus::Locked, UserStatus::Deleted] {
            assert_eq!(UserStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(UserStatus::from_str("archived"), None);
    }
}
