//! SurrealDB implementation of [`UserRepository`].
//!
//! Business-unit memberships are stored as a string-id array on the
//! user record; `business_units` resolves that array into full unit
//! rows in a second query.

use chrono::{DateTime, Utc};
use orgtree_core::error::OrgtreeResult;
use orgtree_core::models::business_unit::BusinessUnit;
use orgtree_core::models::user::{CreateUser, UpdateUser, User};
use orgtree_core::repository::{PaginatedResult, Pagination, UserRepository};
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, Deserialize)]
struct UserRow {
    username: String,
    email: String,
    enabled: bool,
    organization_ids: Vec<String>,
    business_unit_ids: Vec<String>,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_user(self, id: Uuid) -> Result<User, DbError> {
        Ok(User {
            id,
            username: self.username,
            email: self.email,
            enabled: self.enabled,
            organization_ids: parse_uuids(&self.organization_ids, "organization")?,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, Deserialize)]
struct UserRowWithId {
    record_id: String,
    username: String,
    email: String,
    enabled: bool,
    organization_ids: Vec<String>,
    business_unit_ids: Vec<String>,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = parse_uuid(&self.record_id, "user")?;
        UserRow {
            username: self.username,
            email: self.email,
            enabled: self.enabled,
            organization_ids: self.organization_ids,
            business_unit_ids: self.business_unit_ids,
            metadata: self.metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .try_into_user(id)
    }
}

/// Full business-unit row, as returned by the membership resolution
/// query.
#[derive(Debug, Deserialize)]
struct MemberUnitRow {
    record_id: String,
    organization_id: String,
    parent_id: Option<String>,
    name: String,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemberUnitRow {
    fn try_into_business_unit(self) -> Result<BusinessUnit, DbError> {
        Ok(BusinessUnit {
            id: parse_uuid(&self.record_id, "business unit")?,
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

/// Row struct for count queries.
#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::InvalidRecord(format!("invalid {what} UUID: {e}")))
}

fn parse_uuids(values: &[String], what: &str) -> Result<Vec<Uuid>, DbError> {
    values.iter().map(|s| parse_uuid(s, what)).collect()
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Fetches the raw membership id array for a user, failing with
    /// `NotFound` if the user does not exist.
    async fn membership_ids(&self, user_id: Uuid) -> Result<Vec<String>, DbError> {
        let id_str = user_id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::thing('user', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<UserRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.business_unit_ids)
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> OrgtreeResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));
        let organization_ids: Vec<String> = input
            .organization_ids
            .iter()
            .map(|o| o.to_string())
            .collect();

        let result = self
            .db
            .query(
                "CREATE type::thing('user', $id) SET \
                 username = $username, email = $email, enabled = true, \
                 organization_ids = $organization_ids, \
                 business_unit_ids = [], metadata = $metadata",
            )
            .bind(("id", id_str.clone()))
            .bind(("username", input.username))
            .bind(("email", input.email))
            .bind(("organization_ids", organization_ids))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.try_into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> OrgtreeResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::thing('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.try_into_user(id)?)
    }

    async fn get_by_username(&self, username: &str) -> OrgtreeResult<User> {
        let username_owned = username.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM user WHERE username = $username",
            )
            .bind(("username", username_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("username={username}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> OrgtreeResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.username.is_some() {
            sets.push("username = $username");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.enabled.is_some() {
            sets.push("enabled = $enabled");
        }
        if input.organization_ids.is_some() {
            sets.push("organization_ids = $organization_ids");
        }
        if input.metadata.is_some() {
            sets.push("metadata = $metadata");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::thing('user', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(username) = input.username {
            builder = builder.bind(("username", username));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(enabled) = input.enabled {
            builder = builder.bind(("enabled", enabled));
        }
        if let Some(organization_ids) = input.organization_ids {
            let ids: Vec<String> = organization_ids.iter().map(|o| o.to_string()).collect();
            builder = builder.bind(("organization_ids", ids));
        }
        if let Some(metadata) = input.metadata {
            builder = builder.bind(("metadata", metadata));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.try_into_user(id)?)
    }

    async fn delete(&self, id: Uuid) -> OrgtreeResult<()> {
        self.db
            .query("DELETE type::thing('user', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> OrgtreeResult<PaginatedResult<User>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM user GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM user \
                 ORDER BY username ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn business_units(&self, user_id: Uuid) -> OrgtreeResult<Vec<BusinessUnit>> {
        let unit_ids = self.membership_ids(user_id).await?;
        if unit_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM business_unit WHERE meta::id(id) IN $unit_ids \
                 ORDER BY name ASC",
            )
            .bind(("unit_ids", unit_ids))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberUnitRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_business_unit())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn add_to_business_unit(&self, user_id: Uuid, business_unit_id: Uuid) -> OrgtreeResult<()> {
        let id_str = user_id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::thing('user', $id) SET \
                 business_unit_ids = array::union(business_unit_ids, [$unit]), \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("unit", business_unit_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn remove_from_business_unit(
        &self,
        user_id: Uuid,
        business_unit_id: Uuid,
    ) -> OrgtreeResult<()> {
        let id_str = user_id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::thing('user', $id) SET \
                 business_unit_ids -= $unit, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("unit", business_unit_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }
}
