//! Integration tests for swap transitions against a real database:
//! - Item-plus-points completion moves points and marks both items swapped
//! - Failed preconditions leave every row untouched
//! - Concurrent completions of one swap produce exactly one success
//! - Rejection is receiver-only and terminal

use assert_matches::assert_matches;
use rewear_core::catalog::{
    ApprovalStatus, CategoryName, Condition, ItemStatus, ItemType, Size, SwapPreference,
    SwapStatus,
};
use rewear_core::swap::SwapError;
use rewear_core::types::{DbId, Points};
use rewear_db::models::item::{CreateItem, Item};
use rewear_db::models::swap::{CreateSwap, Swap};
use rewear_db::models::user::CreateUser;
use rewear_db::repositories::{ItemRepo, SwapRepo, SwapTransitionError, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, name: &str, points: Points) -> DbId {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: format!("{}@rewear.test", name.to_lowercase()),
            password_hash: "not-a-real-hash".to_string(),
            name: name.to_string(),
            location: None,
            avatar_seed: None,
        },
    )
    .await
    .unwrap();
    sqlx::query("UPDATE users SET points = $2 WHERE id = $1")
        .bind(user.id)
        .bind(points)
        .execute(pool)
        .await
        .unwrap();
    user.id
}

async fn category_id(pool: &PgPool, name: CategoryName) -> DbId {
    let row: (DbId,) = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
        .bind(name.as_str())
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

async fn approved_item(pool: &PgPool, uploader_id: DbId, title: &str) -> Item {
    let category_id = category_id(pool, CategoryName::Jacket).await;
    let item = ItemRepo::create(
        pool,
        &CreateItem {
            title: title.to_string(),
            description: format!("{title} in good shape"),
            category_id,
            item_type: ItemType::Unisex,
            size: Size::M,
            condition: Condition::Good,
            image_key: format!("uploads/{uploader_id}-{title}.jpeg"),
            points_required: 20,
            uploader_id,
            swap_preference: SwapPreference::Both,
        },
    )
    .await
    .unwrap();
    ItemRepo::set_approval_status(pool, item.id, ApprovalStatus::Approved)
        .await
        .unwrap()
        .unwrap()
}

async fn points_of(pool: &PgPool, user_id: DbId) -> Points {
    UserRepo::find_by_id(pool, user_id)
        .await
        .unwrap()
        .unwrap()
        .points
}

async fn item_status(pool: &PgPool, item_id: DbId) -> ItemStatus {
    ItemRepo::find_by_id(pool, item_id)
        .await
        .unwrap()
        .unwrap()
        .status
}

struct Fixture {
    requester: DbId,
    receiver: DbId,
    offered: DbId,
    requested: DbId,
    swap: Swap,
}

/// A offers item X plus 20 points for B's item Y.
async fn item_plus_points_swap(pool: &PgPool, requester_points: Points) -> Fixture {
    let requester = new_user(pool, "Alice", requester_points).await;
    let receiver = new_user(pool, "Bob", 50).await;
    let offered = approved_item(pool, requester, "denim-jacket").await.id;
    let requested = approved_item(pool, receiver, "wool-coat").await.id;
    let swap = SwapRepo::create(
        pool,
        &CreateSwap {
            requester_id: requester,
            receiver_id: receiver,
            requested_item_id: requested,
            offered_item_id: Some(offered),
            points_used: 20,
        },
    )
    .await
    .unwrap();
    Fixture {
        requester,
        receiver,
        offered,
        requested,
        swap,
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_complete_moves_points_and_items(pool: PgPool) {
    let f = item_plus_points_swap(&pool, 50).await;
    assert_eq!(f.swap.status, SwapStatus::Pending);

    let done = SwapRepo::complete(&pool, f.swap.id, f.receiver).await.unwrap();

    assert_eq!(done.swap.status, SwapStatus::Completed);
    assert_eq!(done.requester_points, 30);
    assert_eq!(done.receiver_points, 70);
    assert_eq!(done.requested_item.id, f.requested);
    assert_eq!(done.requested_item.status, ItemStatus::Swapped);
    assert_eq!(done.offered_item.as_ref().map(|i| i.id), Some(f.offered));

    assert_eq!(points_of(&pool, f.requester).await, 30);
    assert_eq!(points_of(&pool, f.receiver).await, 70);
    assert_eq!(item_status(&pool, f.requested).await, ItemStatus::Swapped);
    assert_eq!(item_status(&pool, f.offered).await, ItemStatus::Swapped);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_points_only_swap_leaves_requester_items_alone(pool: PgPool) {
    let requester = new_user(&pool, "Carol", 40).await;
    let receiver = new_user(&pool, "Dan", 0).await;
    let requested = approved_item(&pool, receiver, "cap").await.id;
    let spare = approved_item(&pool, requester, "skirt").await.id;
    let swap = SwapRepo::create(
        &pool,
        &CreateSwap {
            requester_id: requester,
            receiver_id: receiver,
            requested_item_id: requested,
            offered_item_id: None,
            points_used: 40,
        },
    )
    .await
    .unwrap();

    let done = SwapRepo::complete(&pool, swap.id, receiver).await.unwrap();
    assert!(done.offered_item.is_none());
    assert_eq!(done.requester_points, 0);
    assert_eq!(done.receiver_points, 40);
    assert_eq!(item_status(&pool, spare).await, ItemStatus::Available);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_insufficient_points_changes_nothing(pool: PgPool) {
    let f = item_plus_points_swap(&pool, 10).await;

    let err = SwapRepo::complete(&pool, f.swap.id, f.receiver)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        SwapTransitionError::Rejected(SwapError::InsufficientPoints {
            available: 10,
            required: 20
        })
    );

    let swap = SwapRepo::find_by_id(&pool, f.swap.id).await.unwrap().unwrap();
    assert_eq!(swap.status, SwapStatus::Pending);
    assert_eq!(points_of(&pool, f.requester).await, 10);
    assert_eq!(points_of(&pool, f.receiver).await, 50);
    assert_eq!(item_status(&pool, f.requested).await, ItemStatus::Available);
    assert_eq!(item_status(&pool, f.offered).await, ItemStatus::Available);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_receiver_can_complete(pool: PgPool) {
    let f = item_plus_points_swap(&pool, 50).await;

    let err = SwapRepo::complete(&pool, f.swap.id, f.requester)
        .await
        .unwrap_err();
    assert_matches!(err, SwapTransitionError::Rejected(SwapError::NotReceiver));
    assert_eq!(points_of(&pool, f.requester).await, 50);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_completed_swap_cannot_complete_again(pool: PgPool) {
    let f = item_plus_points_swap(&pool, 50).await;
    SwapRepo::complete(&pool, f.swap.id, f.receiver).await.unwrap();

    let err = SwapRepo::complete(&pool, f.swap.id, f.receiver)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        SwapTransitionError::Rejected(SwapError::NotPending {
            status: SwapStatus::Completed
        })
    );
    assert_eq!(points_of(&pool, f.requester).await, 30);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_swap_is_not_found(pool: PgPool) {
    let err = SwapRepo::complete(&pool, 999_999, 1).await.unwrap_err();
    assert_matches!(
        err,
        SwapTransitionError::Rejected(SwapError::NotFound { swap_id: 999_999 })
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_item_swapped_elsewhere_blocks_completion(pool: PgPool) {
    let f = item_plus_points_swap(&pool, 50).await;
    let rival = new_user(&pool, "Eve", 50).await;
    let competing = SwapRepo::create(
        &pool,
        &CreateSwap {
            requester_id: rival,
            receiver_id: f.receiver,
            requested_item_id: f.requested,
            offered_item_id: None,
            points_used: 5,
        },
    )
    .await
    .unwrap();
    SwapRepo::complete(&pool, competing.id, f.receiver)
        .await
        .unwrap();

    let err = SwapRepo::complete(&pool, f.swap.id, f.receiver)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        SwapTransitionError::Rejected(SwapError::RequestedItemUnavailable)
    );
    assert_eq!(points_of(&pool, f.requester).await, 50);
    assert_eq!(item_status(&pool, f.offered).await, ItemStatus::Available);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_completion_succeeds_once(pool: PgPool) {
    let f = item_plus_points_swap(&pool, 50).await;

    let (first, second) = tokio::join!(
        SwapRepo::complete(&pool, f.swap.id, f.receiver),
        SwapRepo::complete(&pool, f.swap.id, f.receiver),
    );

    let results = [first, second];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one completion must win");
    let loser = results.iter().find_map(|r| r.as_ref().err());
    assert_matches!(
        loser,
        Some(SwapTransitionError::Rejected(SwapError::NotPending { .. }))
    );

    assert_eq!(points_of(&pool, f.requester).await, 30);
    assert_eq!(points_of(&pool, f.receiver).await, 70);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_completions_conserve_total_points(pool: PgPool) {
    let f = item_plus_points_swap(&pool, 50).await;
    let third = new_user(&pool, "Frank", 15).await;
    let franks_item = approved_item(&pool, third, "shorts").await.id;
    let second = SwapRepo::create(
        &pool,
        &CreateSwap {
            requester_id: f.receiver,
            receiver_id: third,
            requested_item_id: franks_item,
            offered_item_id: None,
            points_used: 35,
        },
    )
    .await
    .unwrap();

    let total = |pool: PgPool| async move {
        let row: (i64,) = sqlx::query_as("SELECT COALESCE(SUM(points), 0) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        row.0
    };
    let before = total(pool.clone()).await;

    let (first_done, second_done) = futures::future::join(
        SwapRepo::complete(&pool, f.swap.id, f.receiver),
        SwapRepo::complete(&pool, second.id, third),
    )
    .await;
    let first_done = first_done.unwrap();
    let second_done = second_done.unwrap();
    assert_eq!(first_done.swap.status, SwapStatus::Completed);
    assert_eq!(second_done.swap.status, SwapStatus::Completed);

    assert_eq!(points_of(&pool, f.requester).await, 30);
    assert_eq!(points_of(&pool, f.receiver).await, 35);
    assert_eq!(points_of(&pool, third).await, 50);
    assert_eq!(total(pool.clone()).await, before);
}

// ---------------------------------------------------------------------------
// Rejection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_receiver_rejects_pending_swap(pool: PgPool) {
    let f = item_plus_points_swap(&pool, 50).await;

    let err = SwapRepo::reject(&pool, f.swap.id, f.requester)
        .await
        .unwrap_err();
    assert_matches!(err, SwapTransitionError::Rejected(SwapError::NotReceiver));

    let rejected = SwapRepo::reject(&pool, f.swap.id, f.receiver).await.unwrap();
    assert_eq!(rejected.status, SwapStatus::Rejected);

    let err = SwapRepo::complete(&pool, f.swap.id, f.receiver)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        SwapTransitionError::Rejected(SwapError::NotPending {
            status: SwapStatus::Rejected
        })
    );
    assert_eq!(item_status(&pool, f.requested).await, ItemStatus::Available);
}
