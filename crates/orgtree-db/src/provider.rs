//! Owner-tree snapshot construction from stored data.

use orgtree_acl::tree::{OwnerTree, OwnerTreeBuilder};
use orgtree_core::error::OrgtreeResult;
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, Deserialize)]
struct UnitRow {
    record_id: String,
    organization_id: String,
    parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MembershipRow {
    record_id: String,
    business_unit_ids: Vec<String>,
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::InvalidRecord(format!("invalid {what} UUID: {e}")))
}

/// Builds [`OwnerTree`] snapshots from the business-unit hierarchy and
/// user memberships currently in storage.
///
/// Each call to [`OwnerTreeProvider::snapshot`] reads fresh data and
/// returns a new immutable snapshot; there is no caching. Callers decide
/// how long a snapshot stays in use.
#[derive(Clone)]
pub struct OwnerTreeProvider<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> OwnerTreeProvider<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Loads every business unit and every user membership and builds
    /// an owner-tree snapshot.
    pub async fn snapshot(&self) -> OrgtreeResult<OwnerTree> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, organization_id, parent_id \
                 FROM business_unit",
            )
            .await
            .map_err(DbError::from)?;
        let unit_rows: Vec<UnitRow> = result.take(0).map_err(DbError::from)?;

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, business_unit_ids FROM user")
            .await
            .map_err(DbError::from)?;
        let membership_rows: Vec<MembershipRow> = result.take(0).map_err(DbError::from)?;

        debug!(
            units = unit_rows.len(),
            users = membership_rows.len(),
            "Building owner-tree snapshot"
        );

        let mut builder = OwnerTreeBuilder::new();

        for row in &unit_rows {
            let unit_id = parse_uuid(&row.record_id, "business unit")?;
            let organization_id = parse_uuid(&row.organization_id, "organization")?;
            let parent_id = row
                .parent_id
                .as_deref()
                .map(|p| parse_uuid(p, "parent"))
                .transpose()?;
            builder.add_business_unit(unit_id, organization_id, parent_id);
        }

        for row in &membership_rows {
            let user_id = parse_uuid(&row.record_id, "user")?;
            for unit in &row.business_unit_ids {
                builder.add_user_business_unit(user_id, parse_uuid(unit, "business unit")?);
            }
        }

        Ok(builder.build())
    }
}
