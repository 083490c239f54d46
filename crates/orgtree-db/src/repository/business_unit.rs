//! SurrealDB implementation of [`BusinessUnitRepository`].
//!
//! Hierarchy assembly for the `tree` operation happens in memory: the
//! organization's units are loaded in one query and linked up through
//! their parent pointers. Units whose parent is missing from the loaded
//! set are treated as roots.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use orgtree_core::error::OrgtreeResult;
use orgtree_core::models::business_unit::{
    BusinessUnit, BusinessUnitTreeNode, CreateBusinessUnit, UpdateBusinessUnit,
};
use orgtree_core::repository::{BusinessUnitRepository, PaginatedResult, Pagination};
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, Deserialize)]
struct BusinessUnitRow {
    organization_id: String,
    parent_id: Option<String>,
    name: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BusinessUnitRow {
    fn try_into_business_unit(self, id: Uuid) -> Result<BusinessUnit, DbError> {
        Ok(BusinessUnit {
            id,
            organization_id: parse_uuid(&self.organization_id, "organization")?,
            parent_id: self
                .parent_id
                .as_deref()
                .map(|p| parse_uuid(p, "parent"))
                .transpose()?,
            name: self.name,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, Deserialize)]
struct BusinessUnitRowWithId {
    record_id: String,
    organization_id: String,
    parent_id: Option<String>,
    name: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BusinessUnitRowWithId {
    fn try_into_business_unit(self) -> Result<BusinessUnit, DbError> {
        let id = parse_uuid(&self.record_id, "business unit")?;
        BusinessUnitRow {
            organization_id: self.organization_id,
            parent_id: self.parent_id,
            name: self.name,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .try_into_business_unit(id)
    }
}

/// Slim row for hierarchy assembly.
#[derive(Debug, Deserialize)]
struct UnitRefRow {
    record_id: String,
    parent_id: Option<String>,
    name: String,
}

/// Row struct for count queries.
#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::InvalidRecord(format!("invalid {what} UUID: {e}")))
}

/// SurrealDB implementation of the BusinessUnit repository.
#[derive(Clone)]
pub struct SurrealBusinessUnitRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBusinessUnitRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> BusinessUnitRepository for SurrealBusinessUnitRepository<C> {
    async fn create(&self, input: CreateBusinessUnit) -> OrgtreeResult<BusinessUnit> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::thing('business_unit', $id) SET \
                 organization_id = $organization_id, parent_id = $parent_id, \
                 name = $name, metadata = $metadata",
            )
            .bind(("id", id_str.clone()))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("parent_id", input.parent_id.map(|p| p.to_string())))
            .bind(("name", input.name))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<BusinessUnitRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "business_unit".into(),
            id: id_str,
        })?;

        Ok(row.try_into_business_unit(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> OrgtreeResult<BusinessUnit> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::thing('business_unit', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BusinessUnitRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "business_unit".into(),
            id: id_str,
        })?;

        Ok(row.try_into_business_unit(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateBusinessUnit) -> OrgtreeResult<BusinessUnit> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        match input.parent_id {
            Some(Some(_)) => sets.push("parent_id = $parent_id"),
            Some(None) => sets.push("parent_id = NONE"),
            None => {}
        }
        if input.metadata.is_some() {
            sets.push("metadata = $metadata");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::thing('business_unit', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(Some(parent_id)) = input.parent_id {
            builder = builder.bind(("parent_id", parent_id.to_string()));
        }
        if let Some(metadata) = input.metadata {
            builder = builder.bind(("metadata", metadata));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<BusinessUnitRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "business_unit".into(),
            id: id_str,
        })?;

        Ok(row.try_into_business_unit(id)?)
    }

    async fn delete(&self, id: Uuid) -> OrgtreeResult<()> {
        self.db
            .query("DELETE type::thing('business_unit', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_organization(
        &self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> OrgtreeResult<PaginatedResult<BusinessUnit>> {
        let org_str = organization_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM business_unit \
                 WHERE organization_id = $organization_id GROUP ALL",
            )
            .bind(("organization_id", org_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM business_unit \
                 WHERE organization_id = $organization_id \
                 ORDER BY name ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("organization_id", org_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BusinessUnitRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_business_unit())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn ids(&self, organization_id: Option<Uuid>) -> OrgtreeResult<Vec<Uuid>> {
        let mut result = match organization_id {
            Some(org) => self
                .db
                .query(
                    "SELECT VALUE meta::id(id) FROM business_unit \
                     WHERE organization_id = $organization_id",
                )
                .bind(("organization_id", org.to_string()))
                .await
                .map_err(DbError::from)?,
            None => self
                .db
                .query("SELECT VALUE meta::id(id) FROM business_unit")
                .await
                .map_err(DbError::from)?,
        };

        let ids: Vec<String> = result.take(0).map_err(DbError::from)?;
        Ok(ids
            .iter()
            .map(|s| parse_uuid(s, "business unit"))
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn tree(&self, organization_id: Option<Uuid>) -> OrgtreeResult<Vec<BusinessUnitTreeNode>> {
        let mut result = match organization_id {
            Some(org) => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, parent_id, name \
                     FROM business_unit \
                     WHERE organization_id = $organization_id \
                     ORDER BY name ASC",
                )
                .bind(("organization_id", org.to_string()))
                .await
                .map_err(DbError::from)?,
            None => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, parent_id, name \
                     FROM business_unit ORDER BY name ASC",
                )
                .await
                .map_err(DbError::from)?,
        };

        let rows: Vec<UnitRefRow> = result.take(0).map_err(DbError::from)?;

        let units = rows
            .into_iter()
            .map(|row| {
                let id = parse_uuid(&row.record_id, "business unit")?;
                let parent = row
                    .parent_id
                    .as_deref()
                    .map(|p| parse_uuid(p, "parent"))
                    .transpose()?;
                Ok((id, parent, row.name))
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(assemble_tree(units))
    }
}

/// Links `(id, parent, name)` tuples into a forest, preserving input
/// order among siblings.
fn assemble_tree(units: Vec<(Uuid, Option<Uuid>, String)>) -> Vec<BusinessUnitTreeNode> {
    let known: HashSet<Uuid> = units.iter().map(|(id, _, _)| *id).collect();

    let mut names: HashMap<Uuid, String> = HashMap::with_capacity(units.len());
    let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut roots: Vec<Uuid> = Vec::new();

    for (id, parent, name) in units {
        names.insert(id, name);
        match parent.filter(|p| known.contains(p)) {
            Some(parent) => children.entry(parent).or_default().push(id),
            None => roots.push(id),
        }
    }

    fn build(
        id: Uuid,
        names: &HashMap<Uuid, String>,
        children: &HashMap<Uuid, Vec<Uuid>>,
    ) -> BusinessUnitTreeNode {
        BusinessUnitTreeNode {
            id,
            name: names.get(&id).cloned().unwrap_or_default(),
            children: children
                .get(&id)
                .map(|kids| {
                    kids.iter()
                        .map(|&kid| build(kid, names, children))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    roots
        .into_iter()
        .map(|root| build(root, &names, &children))
        .collect()
}
