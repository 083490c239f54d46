//! Tests for scoped business-unit visibility.

use chrono::Utc;
use orgtree_acl::scope::UnitScopeProvider;
use orgtree_acl::tree::OwnerTreeBuilder;
use orgtree_core::error::OrgtreeResult;
use orgtree_core::models::access_level::AccessLevel;
use orgtree_core::models::business_unit::{
    BusinessUnit, BusinessUnitTreeNode, CreateBusinessUnit, UpdateBusinessUnit,
};
use orgtree_core::models::organization::Organization;
use orgtree_core::models::user::User;
use orgtree_core::repository::{BusinessUnitRepository, PaginatedResult, Pagination};
use uuid::Uuid;

/// Fixed catalog of (unit, organization) pairs serving the `ids` query.
struct StubUnitRepo {
    units: Vec<(Uuid, Uuid)>,
}

impl BusinessUnitRepository for StubUnitRepo {
    async fn create(&self, _input: CreateBusinessUnit) -> OrgtreeResult<BusinessUnit> {
        unimplemented!("not used by the scope provider")
    }

    async fn get_by_id(&self, _id: Uuid) -> OrgtreeResult<BusinessUnit> {
        unimplemented!("not used by the scope provider")
    }

    async fn update(&self, _id: Uuid, _input: UpdateBusinessUnit) -> OrgtreeResult<BusinessUnit> {
        unimplemented!("not used by the scope provider")
    }

    async fn delete(&self, _id: Uuid) -> OrgtreeResult<()> {
        unimplemented!("not used by the scope provider")
    }

    async fn list_by_organization(
        &self,
        _organization_id: Uuid,
        _pagination: Pagination,
    ) -> OrgtreeResult<PaginatedResult<BusinessUnit>> {
        unimplemented!("not used by the scope provider")
    }

    async fn ids(&self, organization_id: Option<Uuid>) -> OrgtreeResult<Vec<Uuid>> {
        Ok(self
            .units
            .iter()
            .filter(|(_, org)| organization_id.is_none_or(|wanted| *org == wanted))
            .map(|(id, _)| *id)
            .collect())
    }

    async fn tree(
        &self,
        _organization_id: Option<Uuid>,
    ) -> OrgtreeResult<Vec<BusinessUnitTreeNode>> {
        unimplemented!("not used by the scope provider")
    }
}

fn user(id: Uuid, organization_ids: Vec<Uuid>) -> User {
    User {
        id,
        username: format!("user-{id}"),
        email: format!("{id}@example.com"),
        enabled: true,
        organization_ids,
        metadata: serde_json::Value::Object(Default::default()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn organization(id: Uuid) -> Organization {
    Organization {
        id,
        name: format!("org-{id}"),
        enabled: true,
        metadata: serde_json::Value::Object(Default::default()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn system_sees_all_units() {
    let org1 = organization(Uuid::new_v4());
    let org2 = organization(Uuid::new_v4());
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let provider = UnitScopeProvider::new(StubUnitRepo {
        units: vec![(a, org1.id), (b, org1.id), (c, org2.id)],
    });
    let current = user(Uuid::new_v4(), vec![org1.id]);
    let tree = OwnerTreeBuilder::new().build();

    let mut visible = provider
        .visible_business_unit_ids(&current, &org1, AccessLevel::System, &tree)
        .await
        .unwrap();
    visible.sort();
    let mut expected = vec![a, b, c];
    expected.sort();

    assert_eq!(visible, expected);
}

#[tokio::test]
async fn global_sees_organization_units_only() {
    let org1 = organization(Uuid::new_v4());
    let org2 = organization(Uuid::new_v4());
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let provider = UnitScopeProvider::new(StubUnitRepo {
        units: vec![(a, org1.id), (b, org1.id), (c, org2.id)],
    });
    let current = user(Uuid::new_v4(), vec![org1.id]);
    let tree = OwnerTreeBuilder::new().build();

    let mut visible = provider
        .visible_business_unit_ids(&current, &org1, AccessLevel::Global, &tree)
        .await
        .unwrap();
    visible.sort();
    let mut expected = vec![a, b];
    expected.sort();

    assert_eq!(visible, expected);
}

#[tokio::test]
async fn local_and_deep_come_from_the_tree() {
    let org = organization(Uuid::new_v4());
    let parent = Uuid::new_v4();
    let child = Uuid::new_v4();
    let current = user(Uuid::new_v4(), vec![org.id]);

    let mut builder = OwnerTreeBuilder::new();
    builder.add_business_unit(parent, org.id, None);
    builder.add_business_unit(child, org.id, Some(parent));
    builder.add_user_business_unit(current.id, parent);
    let tree = builder.build();

    let provider = UnitScopeProvider::new(StubUnitRepo { units: vec![] });

    let local = provider
        .visible_business_unit_ids(&current, &org, AccessLevel::Local, &tree)
        .await
        .unwrap();
    let mut deep = provider
        .visible_business_unit_ids(&current, &org, AccessLevel::Deep, &tree)
        .await
        .unwrap();
    deep.sort();
    let mut expected_deep = vec![parent, child];
    expected_deep.sort();

    assert_eq!(local, vec![parent]);
    assert_eq!(deep, expected_deep);
}

#[tokio::test]
async fn basic_and_none_see_nothing() {
    let org = organization(Uuid::new_v4());
    let provider = UnitScopeProvider::new(StubUnitRepo {
        units: vec![(Uuid::new_v4(), org.id)],
    });
    let current = user(Uuid::new_v4(), vec![org.id]);
    let tree = OwnerTreeBuilder::new().build();

    for level in [AccessLevel::Basic, AccessLevel::None] {
        let visible = provider
            .visible_business_unit_ids(&current, &org, level, &tree)
            .await
            .unwrap();
        assert!(visible.is_empty());
    }
}
