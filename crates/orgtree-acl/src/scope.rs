//! Scoped business-unit visibility.
//!
//! Answers "which business units can this user see at this access level",
//! used by list filters and ownership selectors.

use orgtree_core::error::OrgtreeResult;
use orgtree_core::models::access_level::AccessLevel;
use orgtree_core::models::organization::Organization;
use orgtree_core::models::user::User;
use orgtree_core::repository::BusinessUnitRepository;
use uuid::Uuid;

use crate::tree::OwnerTree;

/// Resolves the set of business units visible to a user at a given
/// access level.
pub struct UnitScopeProvider<B: BusinessUnitRepository> {
    business_units: B,
}

impl<B: BusinessUnitRepository> UnitScopeProvider<B> {
    pub fn new(business_units: B) -> Self {
        Self { business_units }
    }

    /// Business units visible to `current_user` within `organization`.
    ///
    /// `System` sees every unit, `Global` every unit of the organization,
    /// `Local`/`Deep` the owner-tree scope at the matching depth, and
    /// `Basic`/`None` see nothing.
    pub async fn visible_business_unit_ids(
        &self,
        current_user: &User,
        organization: &Organization,
        access_level: AccessLevel,
        tree: &OwnerTree,
    ) -> OrgtreeResult<Vec<Uuid>> {
        match access_level {
            AccessLevel::System => self.business_units.ids(None).await,
            AccessLevel::Global => self.business_units.ids(Some(organization.id)).await,
            AccessLevel::Local => Ok(tree
                .user_business_unit_ids(current_user.id, organization.id)
                .iter()
                .copied()
                .collect()),
            AccessLevel::Deep => Ok(tree
                .user_subordinate_business_unit_ids(current_user.id, organization.id)
                .iter()
                .copied()
                .collect()),
            AccessLevel::Basic | AccessLevel::None => Ok(Vec::new()),
        }
    }
}
