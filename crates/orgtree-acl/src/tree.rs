//! Immutable owner-tree snapshots.
//!
//! An [`OwnerTree`] is a precomputed, read-only index mapping each
//! `(user, organization)` pair to the business units the user can act
//! within, at two depths: the units the user belongs to directly (local
//! scope) and those units plus everything reachable downward through the
//! hierarchy (subordinate scope).
//!
//! Snapshots are built by an external provider whenever the underlying
//! data changes and passed into resolution calls by reference. The
//! snapshot itself holds no interior mutability, so it can be shared
//! across threads freely.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::LazyLock;

use uuid::Uuid;

static EMPTY: LazyLock<HashSet<Uuid>> = LazyLock::new(HashSet::new);

/// Read-only index of user visibility over business units.
#[derive(Debug, Clone, Default)]
pub struct OwnerTree {
    /// (user, organization) -> directly-owned business units.
    local: HashMap<(Uuid, Uuid), HashSet<Uuid>>,
    /// (user, organization) -> directly-owned units plus all descendants.
    subordinate: HashMap<(Uuid, Uuid), HashSet<Uuid>>,
}

impl OwnerTree {
    /// Business units the user belongs to directly within the
    /// organization. Empty set if the pair is unknown, never `None`.
    pub fn user_business_unit_ids(&self, user_id: Uuid, organization_id: Uuid) -> &HashSet<Uuid> {
        self.local.get(&(user_id, organization_id)).unwrap_or(&EMPTY)
    }

    /// Business units visible to the user including everything reachable
    /// downward from their direct units in the organization's hierarchy.
    pub fn user_subordinate_business_unit_ids(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> &HashSet<Uuid> {
        self.subordinate
            .get(&(user_id, organization_id))
            .unwrap_or(&EMPTY)
    }
}

/// Builder for [`OwnerTree`] snapshots.
///
/// Feed in every business unit (with its organization and parent) and
/// every user membership, then call [`OwnerTreeBuilder::build`]. The
/// subordinate closure is computed once at build time by walking the
/// child links downward from each user's direct units.
#[derive(Debug, Default)]
pub struct OwnerTreeBuilder {
    /// business unit -> organization.
    unit_organizations: HashMap<Uuid, Uuid>,
    /// parent business unit -> children.
    children: HashMap<Uuid, Vec<Uuid>>,
    /// (user, organization) -> direct memberships.
    memberships: HashMap<(Uuid, Uuid), HashSet<Uuid>>,
}

impl OwnerTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a business unit and its position in the hierarchy.
    pub fn add_business_unit(
        &mut self,
        business_unit_id: Uuid,
        organization_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> &mut Self {
        self.unit_organizations
            .insert(business_unit_id, organization_id);
        if let Some(parent) = parent_id {
            self.children.entry(parent).or_default().push(business_unit_id);
        }
        self
    }

    /// Registers a user's direct membership in a business unit. The unit
    /// must have been registered via [`OwnerTreeBuilder::add_business_unit`];
    /// memberships in unknown units are ignored.
    pub fn add_user_business_unit(&mut self, user_id: Uuid, business_unit_id: Uuid) -> &mut Self {
        if let Some(&organization_id) = self.unit_organizations.get(&business_unit_id) {
            self.memberships
                .entry((user_id, organization_id))
                .or_default()
                .insert(business_unit_id);
        }
        self
    }

    pub fn build(self) -> OwnerTree {
        let mut subordinate = HashMap::with_capacity(self.memberships.len());
        for (&key, direct) in &self.memberships {
            subordinate.insert(key, self.descend(direct));
        }
        OwnerTree {
            local: self.memberships,
            subordinate,
        }
    }

    /// Breadth-first walk from the given units through child links.
    fn descend(&self, roots: &HashSet<Uuid>) -> HashSet<Uuid> {
        let mut seen: HashSet<Uuid> = roots.clone();
        let mut queue: VecDeque<Uuid> = roots.iter().copied().collect();
        while let Some(unit) = queue.pop_front() {
            if let Some(children) = self.children.get(&unit) {
                for &child in children {
                    if seen.insert(child) {
                        queue.push_back(child);
                    }
                }
            }
        }
        seen
    }
}
