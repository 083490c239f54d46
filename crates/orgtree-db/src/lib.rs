//! orgtree Database — SurrealDB connection management, schema, and
//! repository implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Repository implementations for the `orgtree-core` traits
//! - The [`OwnerTreeProvider`] building owner-tree snapshots from
//!   stored data

mod connection;
mod error;
mod provider;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use provider::OwnerTreeProvider;
pub use schema::run_migrations;
