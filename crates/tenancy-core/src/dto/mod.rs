//! Request/response value types
//!
//! The core receives already-validated request values and returns typed
//! response values; expected absence and business-rule rejections are
//! encoded in the types, never raised.

mod tenant;
mod user;

pub use tenant::*;
pub use user::*;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tenancy_shared::types::{EntityId, Outcome};

use crate::error::ViolationCode;

/// Orchestrated mutation outcome specialized to business violation codes.
pub type OpOutcome<T> = Outcome<T, ViolationCode>;

/// Success payload of a create operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Created {
    pub id: EntityId,
    pub created_at: DateTime<Utc>,
}

/// Success payload of an edit operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edited {
    pub updated_at: DateTime<Utc>,
}

/// Success payload of a hard delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deleted {
    pub deleted_at: DateTime<Utc>,
    pub affected: u64,
}

/// Items plus total count; the total defaults to the item count when the
/// store did not supply one separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, total: Option<u64>) -> Self {
        let total = total.unwrap_or(items.len() as u64);
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self { items: Vec::new(), total: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paged_list_total_defaults_to_item_count() {
        let list = PagedList::new(vec![1, 2, 3], None);
        assert_eq!(list.total, 3);
        let list = PagedList::new(vec![1, 2, 3], Some(42));
        assert_eq!(list.total, 42);
    }
}
