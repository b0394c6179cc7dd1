//! Integration tests for the storage location tree.

use assert_matches::assert_matches;
use sqlx::PgPool;

use brigade_core::error::CoreError;
use brigade_core::types::DbId;
use brigade_db::models::storage_location::{CreateStorageLocation, UpdateStorageLocation};
use brigade_db::repositories::{MemberRepo, StorageLocationRepo};
use brigade_db::RepoError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn location(pool: &PgPool, name: &str, parent_id: Option<DbId>) -> DbId {
    StorageLocationRepo::create(
        pool,
        &CreateStorageLocation {
            name: name.to_string(),
            parent_id,
            member_id: None,
            is_member: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn update(name: &str, parent_id: Option<DbId>) -> UpdateStorageLocation {
    UpdateStorageLocation {
        name: name.to_string(),
        parent_id,
        member_id: None,
        is_member: None,
    }
}

// ---------------------------------------------------------------------------
// Member locations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn member_location_sets_the_flag(pool: PgPool) {
    let member = MemberRepo::create(&pool, "Alex Fischer").await.unwrap();

    let loc = StorageLocationRepo::create(
        &pool,
        &CreateStorageLocation {
            name: "Locker 12".to_string(),
            parent_id: None,
            member_id: Some(member.id),
            is_member: None,
        },
    )
    .await
    .unwrap();

    assert!(loc.is_member);
    assert_eq!(loc.member_id, Some(member.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn member_flag_must_agree_with_the_reference(pool: PgPool) {
    let member = MemberRepo::create(&pool, "Alex Fischer").await.unwrap();

    for (is_member, member_id) in [(Some(true), None), (Some(false), Some(member.id))] {
        let err = StorageLocationRepo::create(
            &pool,
            &CreateStorageLocation {
                name: "Locker".to_string(),
                parent_id: None,
                member_id,
                is_member,
            },
        )
        .await
        .unwrap_err();
        assert_matches!(err, RepoError::Core(CoreError::Validation(_)));
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn one_location_per_member(pool: PgPool) {
    let member = MemberRepo::create(&pool, "Alex Fischer").await.unwrap();

    let create = CreateStorageLocation {
        name: "Locker".to_string(),
        parent_id: None,
        member_id: Some(member.id),
        is_member: None,
    };
    StorageLocationRepo::create(&pool, &create).await.unwrap();

    // The unique constraint on member_id rejects a second member-location.
    let err = StorageLocationRepo::create(&pool, &create).await.unwrap_err();
    assert_matches!(err, RepoError::Sqlx(sqlx::Error::Database(_)));
}

// ---------------------------------------------------------------------------
// Paths and subtrees
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_path_walks_from_the_root(pool: PgPool) {
    let station = location(&pool, "Station", None).await;
    let garage = location(&pool, "Garage", Some(station)).await;
    let shelf = location(&pool, "Shelf 3", Some(garage)).await;

    assert_eq!(
        StorageLocationRepo::full_path(&pool, shelf).await.unwrap(),
        Some("Station / Garage / Shelf 3".to_string())
    );
    assert_eq!(
        StorageLocationRepo::full_path(&pool, station).await.unwrap(),
        Some("Station".to_string())
    );
    assert_eq!(
        StorageLocationRepo::full_path(&pool, 999_999).await.unwrap(),
        None
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn path_reflects_the_latest_tree_shape(pool: PgPool) {
    let a = location(&pool, "A", None).await;
    let b = location(&pool, "B", None).await;
    let child = location(&pool, "Child", Some(a)).await;

    StorageLocationRepo::update(&pool, child, &update("Child", Some(b)))
        .await
        .unwrap();

    assert_eq!(
        StorageLocationRepo::full_path(&pool, child).await.unwrap(),
        Some("B / Child".to_string())
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn descendants_lists_the_whole_subtree(pool: PgPool) {
    let station = location(&pool, "Station", None).await;
    let garage = location(&pool, "Garage", Some(station)).await;
    let shelf = location(&pool, "Shelf", Some(garage)).await;
    let yard = location(&pool, "Yard", Some(station)).await;
    let _elsewhere = location(&pool, "Elsewhere", None).await;

    let subtree = StorageLocationRepo::descendants(&pool, station)
        .await
        .unwrap()
        .unwrap();
    let mut ids: Vec<DbId> = subtree.iter().map(|l| l.id).collect();
    ids.sort();
    assert_eq!(ids, vec![garage, shelf, yard]);

    // A leaf has no descendants; an unknown id is None.
    assert!(StorageLocationRepo::descendants(&pool, shelf)
        .await
        .unwrap()
        .unwrap()
        .is_empty());
    assert!(StorageLocationRepo::descendants(&pool, 999_999)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Cycle rejection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reparenting_under_a_descendant_is_rejected(pool: PgPool) {
    let root = location(&pool, "Root", None).await;
    let mid = location(&pool, "Mid", Some(root)).await;
    let leaf = location(&pool, "Leaf", Some(mid)).await;

    // Depth 2: root under leaf.
    let err = StorageLocationRepo::update(&pool, root, &update("Root", Some(leaf)))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        RepoError::Core(CoreError::Validation(msg)) if msg.contains("cycle")
    );

    // Depth 1: root under mid.
    let err = StorageLocationRepo::update(&pool, root, &update("Root", Some(mid)))
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Validation(_)));

    // Depth 0: self-parenting.
    let err = StorageLocationRepo::update(&pool, root, &update("Root", Some(root)))
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Validation(_)));

    // The tree is unchanged.
    let root_row = StorageLocationRepo::find_by_id(&pool, root).await.unwrap().unwrap();
    assert_eq!(root_row.parent_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reparenting_to_a_sibling_subtree_is_allowed(pool: PgPool) {
    let root = location(&pool, "Root", None).await;
    let a = location(&pool, "A", Some(root)).await;
    let b = location(&pool, "B", Some(root)).await;

    let moved = StorageLocationRepo::update(&pool, a, &update("A", Some(b)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.parent_id, Some(b));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_parent_is_not_found(pool: PgPool) {
    let err = StorageLocationRepo::create(
        &pool,
        &CreateStorageLocation {
            name: "Orphan".to_string(),
            parent_id: Some(999_999),
            member_id: None,
            is_member: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(
        err,
        RepoError::Core(CoreError::NotFound {
            entity: "StorageLocation",
            ..
        })
    );
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_location_with_children_is_restricted(pool: PgPool) {
    let parent = location(&pool, "Parent", None).await;
    let child = location(&pool, "Child", Some(parent)).await;

    // The parent FK is RESTRICT.
    let err = StorageLocationRepo::delete(&pool, parent).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(_));

    assert!(StorageLocationRepo::delete(&pool, child).await.unwrap());
    assert!(StorageLocationRepo::delete(&pool, parent).await.unwrap());
    assert!(!StorageLocationRepo::delete(&pool, parent).await.unwrap());
}
