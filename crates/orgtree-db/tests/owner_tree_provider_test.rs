//! Integration tests for owner-tree snapshots built from stored data,
//! including end-to-end ownership resolution over the real repositories.

use orgtree_acl::resolver::OwnershipResolver;
use orgtree_core::models::access_level::AccessLevel;
use orgtree_core::models::business_unit::{BusinessUnit, CreateBusinessUnit};
use orgtree_core::models::organization::{CreateOrganization, Organization};
use orgtree_core::models::user::{CreateUser, User};
use orgtree_core::repository::{BusinessUnitRepository, OrganizationRepository, UserRepository};
use orgtree_db::OwnerTreeProvider;
use orgtree_db::repository::{
    SurrealBusinessUnitRepository, SurrealOrganizationRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

struct Fixture {
    users: SurrealUserRepository<surrealdb::engine::local::Db>,
    provider: OwnerTreeProvider<surrealdb::engine::local::Db>,
    org: Organization,
    /// HQ -> Sales hierarchy.
    hq: BusinessUnit,
    sales: BusinessUnit,
    /// Member of HQ.
    manager: User,
    /// Member of Sales.
    rep: User,
}

/// Spin up in-memory DB with one organization, a two-level hierarchy,
/// and two users at different depths.
async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    orgtree_db::run_migrations(&db).await.unwrap();

    let org = SurrealOrganizationRepository::new(db.clone())
        .create(CreateOrganization {
            name: "Test Org".into(),
            enabled: true,
            metadata: None,
        })
        .await
        .unwrap();

    let units = SurrealBusinessUnitRepository::new(db.clone());
    let hq = units
        .create(CreateBusinessUnit {
            organization_id: org.id,
            parent_id: None,
            name: "HQ".into(),
            metadata: None,
        })
        .await
        .unwrap();
    let sales = units
        .create(CreateBusinessUnit {
            organization_id: org.id,
            parent_id: Some(hq.id),
            name: "Sales".into(),
            metadata: None,
        })
        .await
        .unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let manager = users
        .create(CreateUser {
            username: "manager".into(),
            email: "manager@example.com".into(),
            organization_ids: vec![org.id],
            metadata: None,
        })
        .await
        .unwrap();
    let rep = users
        .create(CreateUser {
            username: "rep".into(),
            email: "rep@example.com".into(),
            organization_ids: vec![org.id],
            metadata: None,
        })
        .await
        .unwrap();

    users.add_to_business_unit(manager.id, hq.id).await.unwrap();
    users.add_to_business_unit(rep.id, sales.id).await.unwrap();

    Fixture {
        users,
        provider: OwnerTreeProvider::new(db),
        org,
        hq,
        sales,
        manager,
        rep,
    }
}

#[tokio::test]
async fn snapshot_reflects_memberships_and_hierarchy() {
    let fx = setup().await;
    let tree = fx.provider.snapshot().await.unwrap();

    let local = tree.user_business_unit_ids(fx.manager.id, fx.org.id);
    assert_eq!(local.len(), 1);
    assert!(local.contains(&fx.hq.id));

    let deep = tree.user_subordinate_business_unit_ids(fx.manager.id, fx.org.id);
    assert_eq!(deep.len(), 2);
    assert!(deep.contains(&fx.hq.id));
    assert!(deep.contains(&fx.sales.id));

    // The rep sits in a leaf unit, so both depths coincide.
    let rep_deep = tree.user_subordinate_business_unit_ids(fx.rep.id, fx.org.id);
    assert_eq!(rep_deep.len(), 1);
    assert!(rep_deep.contains(&fx.sales.id));
}

#[tokio::test]
async fn snapshot_is_detached_from_later_writes() {
    let fx = setup().await;
    let before = fx.provider.snapshot().await.unwrap();

    fx.users
        .remove_from_business_unit(fx.manager.id, fx.hq.id)
        .await
        .unwrap();

    // The earlier snapshot still carries the membership.
    assert!(
        before
            .user_business_unit_ids(fx.manager.id, fx.org.id)
            .contains(&fx.hq.id)
    );

    let after = fx.provider.snapshot().await.unwrap();
    assert!(
        after
            .user_business_unit_ids(fx.manager.id, fx.org.id)
            .is_empty()
    );
}

#[tokio::test]
async fn resolver_end_to_end_over_stored_data() {
    let fx = setup().await;
    let tree = fx.provider.snapshot().await.unwrap();
    let resolver = OwnershipResolver::new(fx.users.clone());

    // The manager's local scope is HQ only, so the rep (in Sales) is out
    // of reach at LOCAL but reachable at DEEP.
    let local = resolver
        .can_assign_owner(&fx.manager, &fx.rep, AccessLevel::Local, &tree, &fx.org)
        .await
        .unwrap();
    let deep = resolver
        .can_assign_owner(&fx.manager, &fx.rep, AccessLevel::Deep, &tree, &fx.org)
        .await
        .unwrap();

    assert!(!local);
    assert!(deep);

    // The rep has no downward reach over the manager.
    let upward = resolver
        .can_assign_owner(&fx.rep, &fx.manager, AccessLevel::Deep, &tree, &fx.org)
        .await
        .unwrap();
    assert!(!upward);

    let global = resolver
        .can_assign_owner(&fx.rep, &fx.manager, AccessLevel::Global, &tree, &fx.org)
        .await
        .unwrap();
    assert!(global);
}
