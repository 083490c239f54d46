//! SurrealDB implementation of [`OrganizationRepository`].

use chrono::{DateTime, Utc};
use orgtree_core::error::OrgtreeResult;
use orgtree_core::models::organization::{CreateOrganization, Organization, UpdateOrganization};
use orgtree_core::repository::{OrganizationRepository, PaginatedResult, Pagination};
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, Deserialize)]
struct OrganizationRow {
    name: String,
    enabled: bool,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrganizationRow {
    fn into_organization(self, id: Uuid) -> Organization {
        Organization {
            id,
            name: self.name,
            enabled: self.enabled,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, Deserialize)]
struct OrganizationRowWithId {
    record_id: String,
    name: String,
    enabled: bool,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrganizationRowWithId {
    fn try_into_organization(self) -> Result<Organization, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::InvalidRecord(format!("invalid UUID: {e}")))?;
        Ok(Organization {
            id,
            name: self.name,
            enabled: self.enabled,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Organization repository.
#[derive(Clone)]
pub struct SurrealOrganizationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrganizationRepository for SurrealOrganizationRepository<C> {
    async fn create(&self, input: CreateOrganization) -> OrgtreeResult<Organization> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::thing('organization', $id) SET \
                 name = $name, enabled = $enabled, metadata = $metadata",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("enabled", input.enabled))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row.into_organization(id))
    }

    async fn get_by_id(&self, id: Uuid) -> OrgtreeResult<Organization> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::thing('organization', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row.into_organization(id))
    }

    async fn get_by_name(&self, name: &str) -> OrgtreeResult<Organization> {
        let name_owned = name.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM organization WHERE name = $name",
            )
            .bind(("name", name_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: format!("name={name}"),
        })?;

        Ok(row.try_into_organization()?)
    }

    async fn first(&self) -> OrgtreeResult<Organization> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM organization \
                 ORDER BY created_at ASC LIMIT 1",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: "first".into(),
        })?;

        Ok(row.try_into_organization()?)
    }

    async fn update(&self, id: Uuid, input: UpdateOrganization) -> OrgtreeResult<Organization> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.enabled.is_some() {
            sets.push("enabled = $enabled");
        }
        if input.metadata.is_some() {
            sets.push("metadata = $metadata");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::thing('organization', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(enabled) = input.enabled {
            builder = builder.bind(("enabled", enabled));
        }
        if let Some(metadata) = input.metadata {
            builder = builder.bind(("metadata", metadata));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "organization".into(),
            id: id_str,
        })?;

        Ok(row.into_organization(id))
    }

    async fn delete(&self, id: Uuid) -> OrgtreeResult<()> {
        self.db
            .query("DELETE type::thing('organization', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> OrgtreeResult<PaginatedResult<Organization>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM organization GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM organization \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_organization())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_enabled(&self) -> OrgtreeResult<Vec<Organization>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM organization WHERE enabled = true \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_organization())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn assign_organization(&self, table: &str, organization_id: Uuid) -> OrgtreeResult<u64> {
        let table_owned = table.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::table($table) \
                 SET organization_id = $organization_id \
                 RETURN VALUE meta::id(id)",
            )
            .bind(("table", table_owned))
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let updated: Vec<String> = result.take(0).map_err(DbError::from)?;
        Ok(updated.len() as u64)
    }
}
