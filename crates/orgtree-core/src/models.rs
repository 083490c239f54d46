//! Domain models for orgtree.
//!
//! These are the core types shared across all crates.

pub mod access_level;
pub mod business_unit;
pub mod organization;
pub mod user;
