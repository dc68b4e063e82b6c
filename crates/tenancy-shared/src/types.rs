//! Common types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type EntityId = Uuid;

pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// Primary-key value for an entity, optionally scoped by its owning tenant.
///
/// Tenant-level entities use a bare id; tenant-owned entities carry the
/// owning tenant's id as well, and every lookup or mutation keyed by a
/// scoped value must match both components. Built fresh per request and
/// never persisted as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopedId {
    pub id: EntityId,
    pub tenant_id: Option<EntityId>,
}

impl ScopedId {
    /// Key for a tenant-level entity.
    pub fn global(id: EntityId) -> Self {
        Self { id, tenant_id: None }
    }

    /// Key for a tenant-owned entity.
    pub fn scoped(id: EntityId, tenant_id: EntityId) -> Self {
        Self { id, tenant_id: Some(tenant_id) }
    }
}

/// Sort direction for paged queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    #[default]
    Asc,
    Desc,
}

impl SortType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortType::Asc => "ASC",
            SortType::Desc => "DESC",
        }
    }
}

/// Terminal outcome of an orchestrated operation.
///
/// `NotFound` covers key-based mutations that matched zero rows, which is
/// reported distinctly from a business-rule rejection. Store-level failures
/// are never encoded here; they travel as `Err` on the surrounding `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, V> {
    Ok(T),
    NotFound,
    Rejected(V),
}

impl<T, V> Outcome<T, V> {
    /// Mirrors the wire convention: `true` iff the data fields are usable.
    pub fn has_data(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<&V> {
        match self {
            Outcome::Rejected(code) => Some(code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_id_components() {
        let id = new_id();
        let tenant = new_id();
        assert_eq!(ScopedId::global(id).tenant_id, None);
        assert_eq!(ScopedId::scoped(id, tenant).tenant_id, Some(tenant));
    }

    #[test]
    fn outcome_flags() {
        let ok: Outcome<u32, &str> = Outcome::Ok(7);
        assert!(ok.has_data());
        assert_eq!(ok.ok(), Some(7));

        let rejected: Outcome<u32, &str> = Outcome::Rejected("NOPE");
        assert!(!rejected.has_data());
        assert_eq!(rejected.rejection(), Some(&"NOPE"));

        let missing: Outcome<u32, &str> = Outcome::NotFound;
        assert!(!missing.has_data());
        assert_eq!(missing.ok(), None);
    }
}
