//! User requests and responses

use serde::{Deserialize, Serialize};
use tenancy_shared::constants::{DEFAULT_PAGE_INDEX, DEFAULT_PAGE_SIZE};
use tenancy_shared::types::{EntityId, SortType};
use validator::Validate;

use crate::domain::{User, UserDetail, UserStatus};
use crate::repositories::{PageParams, UserSort};

/// Projectable user fields. `TenantName` is derived from the owning
/// tenant, not a user column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserField {
    Id,
    Name,
    Status,
    TenantName,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    pub tenant_id: EntityId,
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    pub status: UserStatus,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditUserRequest {
    pub id: EntityId,
    pub tenant_id: EntityId,
    #[validate(length(min = 3, max = 100))]
    pub name: Option<String>,
    pub status: Option<UserStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountUserRequest {
    pub tenant_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountUserResponse {
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetUserByIdRequest {
    pub id: EntityId,
    pub tenant_id: EntityId,
    /// Empty means no projection: all own columns are returned.
    pub fields: Vec<UserField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetUserListRequest {
    pub tenant_id: EntityId,
    /// Empty means no projection: all own columns are returned per item.
    pub fields: Vec<UserField>,
    pub page_index: u32,
    pub page_size: u32,
    pub sort_by: UserSort,
    pub sort_type: SortType,
}

impl GetUserListRequest {
    pub fn first_page(tenant_id: EntityId) -> Self {
        Self {
            tenant_id,
            fields: Vec::new(),
            page_index: DEFAULT_PAGE_INDEX,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: UserSort::default(),
            sort_type: SortType::default(),
        }
    }
}

impl From<&GetUserListRequest> for PageParams<UserSort> {
    fn from(req: &GetUserListRequest) -> Self {
        PageParams {
            page_index: req.page_index,
            page_size: req.page_size,
            sort_by: req.sort_by,
            sort_type: req.sort_type,
            tenant_id: Some(req.tenant_id),
        }
        .clamped()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteUserRequest {
    pub ids: Vec<EntityId>,
    pub tenant_id: EntityId,
    /// All-or-nothing batch when `true`. Defaults to `true`.
    pub is_atomic: Option<bool>,
}

impl DeleteUserRequest {
    pub fn single(id: EntityId, tenant_id: EntityId) -> Self {
        Self { ids: vec![id], tenant_id, is_atomic: None }
    }

    pub fn is_atomic(&self) -> bool {
        self.is_atomic.unwrap_or(true)
    }
}

/// Point-lookup response; optional fields follow the requested projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDetails {
    pub id: EntityId,
    pub name: Option<String>,
    pub status: Option<UserStatus>,
    pub tenant_name: Option<String>,
}

impl UserDetails {
    /// Applies the requested projection; an empty field list keeps all own
    /// columns. `tenant_name` is only present when the lookup joined the
    /// owning tenant.
    pub fn project(detail: UserDetail, fields: &[UserField]) -> Self {
        let keep = |field: UserField| fields.is_empty() || fields.contains(&field);
        Self {
            id: detail.user.id,
            name: keep(UserField::Name).then_some(detail.user.name),
            status: keep(UserField::Status).then_some(detail.user.status),
            tenant_name: detail.tenant_name,
        }
    }
}

/// List item; optional fields follow the requested projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserListItem {
    pub id: EntityId,
    pub name: Option<String>,
    pub status: Option<UserStatus>,
}

impl UserListItem {
    /// Applies the requested projection; an empty field list keeps all own
    /// columns. List items never carry joined fields.
    pub fn project(user: User, fields: &[UserField]) -> Self {
        let keep = |field: UserField| fields.is_empty() || fields.contains(&field);
        Self {
            id: user.id,
            name: keep(UserField::Name).then_some(user.name),
            status: keep(UserField::Status).then_some(user.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tenancy_shared::types::new_id;

    fn detail(tenant_name: Option<&str>) -> UserDetail {
        UserDetail {
            user: User {
                id: new_id(),
                tenant_id: new_id(),
                name: "John Nemo".into(),
                status: UserStatus::Active,
                created_at: Utc::now(),
                updated_at: None,
            },
            tenant_name: tenant_name.map(String::from),
        }
    }

    #[test]
    fn empty_projection_keeps_own_columns() {
        let details = UserDetails::project(detail(None), &[]);
        assert_eq!(details.name.as_deref(), Some("John Nemo"));
        assert_eq!(details.status, Some(UserStatus::Active));
        assert_eq!(details.tenant_name, None);
    }

    #[test]
    fn list_projection_follows_requested_fields() {
        let user = detail(None).user;
        let full = UserListItem::project(user.clone(), &[]);
        assert_eq!(full.name.as_deref(), Some("John Nemo"));
        assert_eq!(full.status, Some(UserStatus::Active));

        let narrow = UserListItem::project(user, &[UserField::Id, UserField::Status]);
        assert_eq!(narrow.name, None);
        assert_eq!(narrow.status, Some(UserStatus::Active));
    }

    #[test]
    fn projection_drops_unrequested_fields() {
        let details = UserDetails::project(
            detail(Some("Acme")),
            &[UserField::Id, UserField::Name, UserField::TenantName],
        );
        assert!(details.name.is_some());
        assert_eq!(details.status, None);
        assert_eq!(details.tenant_name.as_deref(), Some("Acme"));
    }
}
