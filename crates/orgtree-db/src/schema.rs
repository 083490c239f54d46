//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. User memberships are stored as
//! string-id arrays on the user record.

use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, Deserialize)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD enabled ON TABLE organization TYPE bool DEFAULT true;
DEFINE FIELD metadata ON TABLE organization TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_organization_name ON TABLE organization \
    COLUMNS name UNIQUE;

-- =======================================================================
-- Business Units (organization scope, hierarchical)
-- =======================================================================
DEFINE TABLE business_unit SCHEMAFULL;
DEFINE FIELD organization_id ON TABLE business_unit TYPE string;
DEFINE FIELD parent_id ON TABLE business_unit TYPE option<string>;
DEFINE FIELD name ON TABLE business_unit TYPE string;
DEFINE FIELD metadata ON TABLE business_unit TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD created_at ON TABLE business_unit TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE business_unit TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_business_unit_org ON TABLE business_unit \
    COLUMNS organization_id;

-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD enabled ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD organization_ids ON TABLE user TYPE array DEFAULT [];
DEFINE FIELD organization_ids.* ON TABLE user TYPE string;
DEFINE FIELD business_unit_ids ON TABLE user TYPE array DEFAULT [];
DEFINE FIELD business_unit_ids.* ON TABLE user TYPE string;
DEFINE FIELD metadata ON TABLE user TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_username ON TABLE user COLUMNS username UNIQUE;
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query("CREATE _migration SET version = $version, name = $name")
                .bind(("version", migration.version))
                .bind(("name", migration.name))
                .await?
                .check()
                .map_err(|e| {
                    DbError::Migration(format!(
                        "Failed to record migration v{}: {}",
                        migration.version, e,
                    ))
                })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}
