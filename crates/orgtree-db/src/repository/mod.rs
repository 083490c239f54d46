//! SurrealDB repository implementations.

mod business_unit;
mod organization;
mod user;

pub use business_unit::SurrealBusinessUnitRepository;
pub use organization::SurrealOrganizationRepository;
pub use user::SurrealUserRepository;
