//! Integration tests for organization membership, profiles and notifications.
//!
//! Requires `DATABASE_URL`; run with `cargo test -- --ignored`.

use sqlx::PgPool;
use uuid::Uuid;
use verde_core::roles::MemberRole;
use verde_core::status::NotificationKind;
use verde_db::models::notification::CreateNotification;
use assert_matches::assert_matches;
use verde_db::repositories::{
    MemberRepo, MembershipChange, NotificationRepo, OrganizationRepo, UserRepo,
};

async fn new_user(pool: &PgPool, email: &str) -> Uuid {
    let id = Uuid::new_v4();
    UserRepo::ensure_exists(pool, id, Some(email)).await.unwrap();
    id
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn creator_becomes_owner(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let org = OrganizationRepo::create_with_owner(&pool, "Builders", owner)
        .await
        .unwrap();

    let role = MemberRepo::role_for(&pool, org.organization_id, owner)
        .await
        .unwrap();
    assert_eq!(role.as_deref(), Some("owner"));

    let primary = MemberRepo::primary_membership(&pool, owner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(primary.organization_id, org.organization_id);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn members_can_be_added_promoted_and_removed(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let supplier = new_user(&pool, "supplier@example.com").await;
    let org = OrganizationRepo::create_with_owner(&pool, "Builders", owner)
        .await
        .unwrap();
    let org_id = org.organization_id;

    MemberRepo::add(&pool, org_id, supplier, MemberRole::Supplier)
        .await
        .unwrap();
    let dup = MemberRepo::add(&pool, org_id, supplier, MemberRole::Member)
        .await
        .unwrap_err();
    assert!(verde_db::is_unique_violation(&dup, "uq_organization_member"));

    let listed = MemberRepo::list_with_profiles(&pool, org_id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed
        .iter()
        .any(|m| m.email.as_deref() == Some("supplier@example.com")));

    let promoted = MemberRepo::update_role(&pool, org_id, supplier, MemberRole::Manager)
        .await
        .unwrap();
    let MembershipChange::Applied(promoted) = promoted else {
        panic!("expected the role change to apply, got {promoted:?}");
    };
    assert_eq!(promoted.role, "manager");

    assert_matches!(
        MemberRepo::remove(&pool, org_id, supplier).await.unwrap(),
        MembershipChange::Applied(())
    );
    assert_matches!(
        MemberRepo::remove(&pool, org_id, supplier).await.unwrap(),
        MembershipChange::NotMember
    );
    assert!(MemberRepo::role_for(&pool, org_id, supplier)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn an_organization_keeps_at_least_one_owner(pool: PgPool) {
    let owner = new_user(&pool, "owner@example.com").await;
    let second = new_user(&pool, "second@example.com").await;
    let org_id = OrganizationRepo::create_with_owner(&pool, "Builders", owner)
        .await
        .unwrap()
        .organization_id;

    assert_matches!(
        MemberRepo::update_role(&pool, org_id, owner, MemberRole::Manager)
            .await
            .unwrap(),
        MembershipChange::LastOwner
    );
    assert_matches!(
        MemberRepo::remove(&pool, org_id, owner).await.unwrap(),
        MembershipChange::LastOwner
    );

    MemberRepo::add(&pool, org_id, second, MemberRole::Owner)
        .await
        .unwrap();
    assert_matches!(
        MemberRepo::update_role(&pool, org_id, owner, MemberRole::Manager)
            .await
            .unwrap(),
        MembershipChange::Applied(_)
    );
    // `second` is now the only owner again.
    assert_matches!(
        MemberRepo::update_role(&pool, org_id, second, MemberRole::Member)
            .await
            .unwrap(),
        MembershipChange::LastOwner
    );
    assert_matches!(
        MemberRepo::update_role(&pool, org_id, Uuid::new_v4(), MemberRole::Member)
            .await
            .unwrap(),
        MembershipChange::NotMember
    );
    assert_eq!(
        MemberRepo::role_for(&pool, org_id, second).await.unwrap().as_deref(),
        Some("owner")
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn profile_fields_update(pool: PgPool) {
    let id = new_user(&pool, "pm@example.com").await;

    let named = UserRepo::update_full_name(&pool, id, Some("Pat Morgan"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(named.full_name.as_deref(), Some("Pat Morgan"));

    let with_avatar = UserRepo::set_avatar_path(&pool, id, Some("u/a.png"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(with_avatar.avatar_path.as_deref(), Some("u/a.png"));

    let cleared = UserRepo::set_avatar_path(&pool, id, None)
        .await
        .unwrap()
        .unwrap();
    assert!(cleared.avatar_path.is_none());
    assert_eq!(cleared.email.as_deref(), Some("pm@example.com"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn notifications_track_read_state(pool: PgPool) {
    let user = new_user(&pool, "pm@example.com").await;
    let other = new_user(&pool, "other@example.com").await;

    let mut ids = Vec::new();
    for title in ["Delivery late", "Target missed"] {
        let n = NotificationRepo::create(
            &pool,
            &CreateNotification {
                user_id: user,
                kind: NotificationKind::Warning,
                title: title.into(),
                message: "Check the dashboard".into(),
            },
        )
        .await
        .unwrap();
        ids.push(n.id);
    }
    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 2);

    assert!(!NotificationRepo::mark_read(&pool, ids[0], other).await.unwrap());
    assert!(NotificationRepo::mark_read(&pool, ids[0], user).await.unwrap());

    let unread = NotificationRepo::list_for_user(&pool, user, true, 50, 0)
        .await
        .unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].id, ids[1]);

    assert_eq!(NotificationRepo::mark_all_read(&pool, user).await.unwrap(), 1);
    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 0);
}
