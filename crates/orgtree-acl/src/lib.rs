//! orgtree ACL — owner-tree snapshots, record-ownership resolution, and
//! scoped business-unit visibility.
//!
//! Everything here is generic over the `orgtree-core` repository traits,
//! so this crate carries no database dependency.

pub mod resolver;
pub mod scope;
pub mod tree;

pub use resolver::OwnershipResolver;
pub use scope::UnitScopeProvider;
pub use tree::{OwnerTree, OwnerTreeBuilder};
