//! Organization domain model.
//!
//! Organizations are the top-level entity in the ownership hierarchy.
//! They contain business units and users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organization is the root container of an ownership hierarchy.
///
/// Every business unit belongs to exactly one organization, and every
/// user is associated with one or more organizations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    /// Human-readable name, unique across organizations.
    pub name: String,
    /// Disabled organizations are excluded from selection lists but keep
    /// their data.
    pub enabled: bool,
    /// Arbitrary key-value metadata.
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
    pub enabled: bool,
    pub metadata: Option<serde_json::Value>,
}

/// Fields that can be updated on an existing organization.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub enabled: Option<bool>,
    pub metadata: Option<serde_json::Value>,
}
