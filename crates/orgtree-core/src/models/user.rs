//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user of the system.
///
/// Organization memberships are carried inline; business-unit memberships
/// are resolved through [`crate::repository::UserRepository`] on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub enabled: bool,
    /// Organizations the user belongs to.
    pub organization_ids: Vec<Uuid>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub organization_ids: Vec<Uuid>,
    pub metadata: Option<serde_json::Value>,
}

/// Fields that can be updated on an existing user.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub enabled: Option<bool>,
    pub organization_ids: Option<Vec<Uuid>>,
    pub metadata: Option<serde_json::Value>,
}
