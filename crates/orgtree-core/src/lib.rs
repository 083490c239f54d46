//! orgtree Core — domain models, repository trait definitions, and the
//! shared error taxonomy for the organizational-hierarchy and
//! record-ownership system.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{OrgtreeError, OrgtreeResult};
