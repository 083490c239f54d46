//! Record-ownership access resolution.

use std::collections::HashSet;

use orgtree_core::error::OrgtreeResult;
use orgtree_core::models::access_level::AccessLevel;
use orgtree_core::models::organization::Organization;
use orgtree_core::models::user::User;
use orgtree_core::repository::UserRepository;
use uuid::Uuid;

use crate::tree::OwnerTree;

/// Decides whether a user may be assigned as the owner of a record.
///
/// Generic over the user repository so the decision logic has no
/// dependency on the database crate. Stateless apart from the repository
/// handle; safe for unlimited concurrent use.
pub struct OwnershipResolver<U: UserRepository> {
    users: U,
}

impl<U: UserRepository> OwnershipResolver<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }

    /// Checks whether `current_user` is permitted to set `candidate` as
    /// the owner of a record within `organization`, at the given access
    /// level.
    ///
    /// The dispatch is exhaustive over [`AccessLevel`]:
    /// - `System` always allows.
    /// - `Basic` allows only self-assignment.
    /// - `Global` allows any member of the organization.
    /// - `Local`/`Deep` allow candidates sharing at least one business
    ///   unit with the current user's scope in the owner tree, at direct
    ///   or subordinate depth respectively.
    /// - `None` denies.
    ///
    /// The candidate's business units are loaded through the user
    /// repository only when a `Local`/`Deep` scope set is non-empty; an
    /// empty scope denies without touching the store. A `NotFound` from
    /// the repository propagates unchanged.
    pub async fn can_assign_owner(
        &self,
        current_user: &User,
        candidate: &User,
        access_level: AccessLevel,
        tree: &OwnerTree,
        organization: &Organization,
    ) -> OrgtreeResult<bool> {
        match access_level {
            AccessLevel::System => Ok(true),
            AccessLevel::Basic => Ok(candidate.id == current_user.id),
            AccessLevel::Global => Ok(candidate.organization_ids.contains(&organization.id)),
            AccessLevel::Local => {
                let scope = tree.user_business_unit_ids(current_user.id, organization.id);
                self.candidate_in_scope(candidate.id, scope, organization.id)
                    .await
            }
            AccessLevel::Deep => {
                let scope =
                    tree.user_subordinate_business_unit_ids(current_user.id, organization.id);
                self.candidate_in_scope(candidate.id, scope, organization.id)
                    .await
            }
            AccessLevel::None => Ok(false),
        }
    }

    /// True iff the candidate belongs to at least one business unit that
    /// is both inside `scope` and part of the given organization.
    ///
    /// An empty scope short-circuits to `false` before the candidate's
    /// units are loaded. The short-circuit is part of the contract: a
    /// tree granting no scope must never trigger a candidate lookup.
    async fn candidate_in_scope(
        &self,
        candidate_id: Uuid,
        scope: &HashSet<Uuid>,
        organization_id: Uuid,
    ) -> OrgtreeResult<bool> {
        if scope.is_empty() {
            return Ok(false);
        }
        let units = self.users.business_units(candidate_id).await?;
        Ok(units
            .iter()
            .any(|bu| bu.organization_id == organization_id && scope.contains(&bu.id)))
    }
}
