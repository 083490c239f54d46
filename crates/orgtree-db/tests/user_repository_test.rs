//! Integration tests for the User repository implementation using
//! in-memory SurrealDB.

use orgtree_core::error::OrgtreeError;
use orgtree_core::models::business_unit::CreateBusinessUnit;
use orgtree_core::models::organization::CreateOrganization;
use orgtree_core::models::user::{CreateUser, UpdateUser};
use orgtree_core::repository::{
    BusinessUnitRepository, OrganizationRepository, Pagination, UserRepository,
};
use orgtree_db::repository::{
    SurrealBusinessUnitRepository, SurrealOrganizationRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB, run migrations, create one organization.
async fn setup() -> (
    SurrealUserRepository<surrealdb::engine::local::Db>,
    SurrealBusinessUnitRepository<surrealdb::engine::local::Db>,
    Uuid,
) {
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

    (
        SurrealUserRepository::new(db.clone()),
        SurrealBusinessUnitRepository::new(db),
        org.id,
    )
}

fn create_user(name: &str, orgs: Vec<Uuid>) -> CreateUser {
    CreateUser {
        username: name.into(),
        email: format!("{name}@example.com"),
        organization_ids: orgs,
        metadata: None,
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let (users, _, org_id) = setup().await;

    let user = users.create(create_user("alice", vec![org_id])).await.unwrap();

    assert_eq!(user.username, "alice");
    assert!(user.enabled);
    assert_eq!(user.organization_ids, vec![org_id]);

    let fetched = users.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.email, "alice@example.com");
}

#[tokio::test]
async fn get_user_by_username() {
    let (users, _, org_id) = setup().await;

    let user = users.create(create_user("bob", vec![org_id])).await.unwrap();

    let fetched = users.get_by_username("bob").await.unwrap();
    assert_eq!(fetched.id, user.id);

    let err = users.get_by_username("nobody").await.unwrap_err();
    assert!(matches!(err, OrgtreeError::NotFound { .. }));
}

#[tokio::test]
async fn update_user() {
    let (users, _, org_id) = setup().await;

    let user = users.create(create_user("carol", vec![org_id])).await.unwrap();
    let other_org = Uuid::new_v4();

    let updated = users
        .update(
            user.id,
            UpdateUser {
                enabled: Some(false),
                organization_ids: Some(vec![org_id, other_org]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(!updated.enabled);
    assert_eq!(updated.organization_ids, vec![org_id, other_org]);
}

#[tokio::test]
async fn list_users_paginated() {
    let (users, _, org_id) = setup().await;

    for name in ["u1", "u2", "u3"] {
        users.create(create_user(name, vec![org_id])).await.unwrap();
    }

    let page = users
        .list(Pagination {
            offset: 0,
            limit: 2,
        })
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn business_unit_membership_roundtrip() {
    let (users, units, org_id) = setup().await;

    let user = users.create(create_user("dave", vec![org_id])).await.unwrap();
    let unit = units
        .create(CreateBusinessUnit {
            organization_id: org_id,
            parent_id: None,
            name: "Sales".into(),
            metadata: None,
        })
        .await
        .unwrap();

    assert!(users.business_units(user.id).await.unwrap().is_empty());

    users.add_to_business_unit(user.id, unit.id).await.unwrap();
    // Adding twice must not duplicate the membership.
    users.add_to_business_unit(user.id, unit.id).await.unwrap();

    let memberships = users.business_units(user.id).await.unwrap();
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].id, unit.id);
    assert_eq!(memberships[0].organization_id, org_id);

    users
        .remove_from_business_unit(user.id, unit.id)
        .await
        .unwrap();
    assert!(users.business_units(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn business_units_for_missing_user_is_not_found() {
    let (users, _, _) = setup().await;

    let err = users.business_units(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, OrgtreeError::NotFound { .. }));
}

#[tokio::test]
async fn delete_user() {
    let (users, _, org_id) = setup().await;

    let user = users.create(create_user("erin", vec![org_id])).await.unwrap();
    users.delete(user.id).await.unwrap();

    let err = users.get_by_id(user.id).await.unwrap_err();
    assert!(matches!(err, OrgtreeError::NotFound { .. }));
}
