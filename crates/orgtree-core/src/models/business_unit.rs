//! Business-unit domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A node in an organization's internal hierarchy, used to scope record
/// ownership and visibility.
///
/// Units form a tree per organization through `parent_id`: the chain of
/// parent pointers terminates at a unit with no parent, whose container is
/// the organization itself. Keeping the tree acyclic is the writer's
/// responsibility; readers assume it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessUnit {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Owning (parent) business unit, `None` for top-level units.
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new business unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBusinessUnit {
    pub organization_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub metadata: Option<serde_json::Value>,
}

/// Fields that can be updated on an existing business unit.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateBusinessUnit {
    pub name: Option<String>,
    /// `Some(Some(id))` = reparent, `Some(None)` = detach to top level,
    /// `None` = no change.
    pub parent_id: Option<Option<Uuid>>,
    pub metadata: Option<serde_json::Value>,
}

/// One node of an assembled business-unit hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessUnitTreeNode {
    pub id: Uuid,
    pub name: String,
    pub children: Vec<BusinessUnitTreeNode>,
}
