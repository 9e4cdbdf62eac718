//! Repository for the `swaps` table, including the atomic completion
//! transaction.

use rewear_core::catalog::{ApprovalStatus, ItemStatus, SwapStatus};
use rewear_core::pagination::PageRequest;
use rewear_core::swap::{check_rejection, plan_completion, SwapError, SwapSnapshot};
use rewear_core::types::{DbId, Points};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::item::Item;
use crate::models::swap::{CompletedSwap, CreateSwap, Swap, SwapParty};
use crate::repositories::item_repo::COLUMNS as ITEM_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, requester_id, receiver_id, requested_item_id, offered_item_id, \
                        points_used, status, created_at, updated_at";

/// Failure of a state transition on a swap.
#[derive(Debug, thiserror::Error)]
pub enum SwapTransitionError {
    /// A business precondition failed. Nothing was written.
    #[error(transparent)]
    Rejected(#[from] SwapError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Provides swap creation, listing, and state transitions.
pub struct SwapRepo;

impl SwapRepo {
    /// Insert a new swap in `pending` state.
    pub async fn create(pool: &PgPool, input: &CreateSwap) -> Result<Swap, sqlx::Error> {
        let query = format!(
            "INSERT INTO swaps
                (requester_id, receiver_id, requested_item_id, offered_item_id, points_used)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Swap>(&query)
            .bind(input.requester_id)
            .bind(input.receiver_id)
            .bind(input.requested_item_id)
            .bind(input.offered_item_id)
            .bind(input.points_used)
            .fetch_one(pool)
            .await
    }

    /// Find a swap by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Swap>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM swaps WHERE id = $1");
        sqlx::query_as::<_, Swap>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List swaps the user takes part in, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        party: SwapParty,
        status: Option<SwapStatus>,
        page: PageRequest,
    ) -> Result<Vec<Swap>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM swaps \
             WHERE {} AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4",
            party_clause(party)
        );
        sqlx::query_as::<_, Swap>(&query)
            .bind(user_id)
            .bind(status.map(SwapStatus::as_str))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count swaps matching the same filter as [`SwapRepo::list_for_user`].
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: DbId,
        party: SwapParty,
        status: Option<SwapStatus>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM swaps WHERE {} AND ($2::TEXT IS NULL OR status = $2)",
            party_clause(party)
        );
        let row: (i64,) = sqlx::query_as(&query)
            .bind(user_id)
            .bind(status.map(SwapStatus::as_str))
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Reject a pending swap on behalf of its receiver.
    pub async fn reject(
        pool: &PgPool,
        swap_id: DbId,
        actor_id: DbId,
    ) -> Result<Swap, SwapTransitionError> {
        let mut tx = pool.begin().await?;

        let swap = lock_swap(&mut tx, swap_id).await?;
        check_rejection(swap.receiver_id, swap.status, actor_id)?;

        let swap = transition_from_pending(&mut tx, swap_id, SwapStatus::Rejected).await?;

        tx.commit().await?;
        Ok(swap)
    }

    /// Complete a pending swap on behalf of its receiver.
    ///
    /// Runs in one transaction. The swap row is locked first, then the
    /// involved items, then both users, each group in id order. Every
    /// precondition is evaluated against the locked rows by
    /// [`plan_completion`]; any failure returns before a write is issued and
    /// the transaction rolls back on drop.
    ///
    /// On success the points move from requester to receiver, the swap
    /// becomes `completed`, and every involved item becomes `swapped`.
    pub async fn complete(
        pool: &PgPool,
        swap_id: DbId,
        actor_id: DbId,
    ) -> Result<CompletedSwap, SwapTransitionError> {
        let mut tx = pool.begin().await?;

        let swap = lock_swap(&mut tx, swap_id).await?;

        let mut item_ids = vec![swap.requested_item_id];
        item_ids.extend(swap.offered_item_id);
        let items = lock_items(&mut tx, &item_ids).await?;

        let balances = lock_balances(&mut tx, &[swap.requester_id, swap.receiver_id]).await?;

        let requested_item = items
            .iter()
            .find(|i| i.id == swap.requested_item_id)
            .ok_or(SwapError::RequestedItemUnavailable)?;
        let offered_item = match swap.offered_item_id {
            Some(id) => Some(
                items
                    .iter()
                    .find(|i| i.id == id)
                    .ok_or(SwapError::OfferedItemUnavailable)?,
            ),
            None => None,
        };

        let snapshot = SwapSnapshot {
            id: swap.id,
            requester_id: swap.requester_id,
            receiver_id: swap.receiver_id,
            status: swap.status,
            points_used: swap.points_used,
            requester_points: balance_of(&balances, swap.requester_id),
            requested_item: requested_item.snapshot(),
            offered_item: offered_item.map(Item::snapshot),
        };

        let plan = plan_completion(&snapshot, actor_id)?;

        if let Some(transfer) = plan.transfer {
            let debited = sqlx::query(
                "UPDATE users SET points = points - $2 WHERE id = $1 AND points >= $2",
            )
            .bind(transfer.from_user)
            .bind(transfer.amount)
            .execute(&mut *tx)
            .await?;
            if debited.rows_affected() != 1 {
                return Err(SwapError::InsufficientPoints {
                    available: snapshot.requester_points,
                    required: transfer.amount,
                }
                .into());
            }

            sqlx::query("UPDATE users SET points = points + $2 WHERE id = $1")
                .bind(transfer.to_user)
                .bind(transfer.amount)
                .execute(&mut *tx)
                .await?;
        }

        let swap = transition_from_pending(&mut tx, plan.swap_id, SwapStatus::Completed).await?;

        let query = format!(
            "UPDATE items SET status = $2 \
             WHERE id = ANY($1) AND status = $3 AND approval_status = $4 \
             RETURNING {ITEM_COLUMNS}"
        );
        let swapped = sqlx::query_as::<_, Item>(&query)
            .bind(&plan.items_to_mark_swapped)
            .bind(ItemStatus::Swapped.as_str())
            .bind(ItemStatus::Available.as_str())
            .bind(ApprovalStatus::Approved.as_str())
            .fetch_all(&mut *tx)
            .await?;
        if swapped.len() != plan.items_to_mark_swapped.len() {
            let requested_swapped = swapped.iter().any(|i| i.id == swap.requested_item_id);
            return Err(if requested_swapped {
                SwapError::OfferedItemUnavailable
            } else {
                SwapError::RequestedItemUnavailable
            }
            .into());
        }

        let balances = read_balances(&mut tx, &[swap.requester_id, swap.receiver_id]).await?;

        tx.commit().await?;

        tracing::info!(
            swap_id = swap.id,
            requester_id = swap.requester_id,
            receiver_id = swap.receiver_id,
            points = swap.points_used,
            "Swap completed",
        );

        let mut requested_item = None;
        let mut offered_item = None;
        for item in swapped {
            if item.id == swap.requested_item_id {
                requested_item = Some(item);
            } else {
                offered_item = Some(item);
            }
        }

        Ok(CompletedSwap {
            requested_item: requested_item.ok_or(SwapError::RequestedItemUnavailable)?,
            offered_item,
            requester_points: balance_of(&balances, swap.requester_id),
            receiver_points: balance_of(&balances, swap.receiver_id),
            swap,
        })
    }
}

fn party_clause(party: SwapParty) -> &'static str {
    match party {
        SwapParty::Requester => "requester_id = $1",
        SwapParty::Receiver => "receiver_id = $1",
        SwapParty::All => "(requester_id = $1 OR receiver_id = $1)",
    }
}

fn balance_of(balances: &[(DbId, Points)], user_id: DbId) -> Points {
    balances
        .iter()
        .find(|(id, _)| *id == user_id)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

async fn lock_swap(
    tx: &mut Transaction<'_, Postgres>,
    swap_id: DbId,
) -> Result<Swap, SwapTransitionError> {
    let query = format!("SELECT {COLUMNS} FROM swaps WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, Swap>(&query)
        .bind(swap_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(SwapTransitionError::Rejected(SwapError::NotFound { swap_id }))
}

async fn lock_items(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[DbId],
) -> Result<Vec<Item>, sqlx::Error> {
    let query = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ANY($1) ORDER BY id FOR UPDATE");
    sqlx::query_as::<_, Item>(&query)
        .bind(ids)
        .fetch_all(&mut **tx)
        .await
}

async fn lock_balances(
    tx: &mut Transaction<'_, Postgres>,
    user_ids: &[DbId],
) -> Result<Vec<(DbId, Points)>, sqlx::Error> {
    sqlx::query_as("SELECT id, points FROM users WHERE id = ANY($1) ORDER BY id FOR UPDATE")
        .bind(user_ids)
        .fetch_all(&mut **tx)
        .await
}

async fn read_balances(
    tx: &mut Transaction<'_, Postgres>,
    user_ids: &[DbId],
) -> Result<Vec<(DbId, Points)>, sqlx::Error> {
    sqlx::query_as("SELECT id, points FROM users WHERE id = ANY($1)")
        .bind(user_ids)
        .fetch_all(&mut **tx)
        .await
}

/// Move a locked swap out of `pending`. The status guard makes a lost race
/// surface as [`SwapError::NotPending`] instead of a double write.
async fn transition_from_pending(
    tx: &mut Transaction<'_, Postgres>,
    swap_id: DbId,
    next: SwapStatus,
) -> Result<Swap, SwapTransitionError> {
    let query = format!(
        "UPDATE swaps SET status = $2 WHERE id = $1 AND status = $3 RETURNING {COLUMNS}"
    );
    let updated = sqlx::query_as::<_, Swap>(&query)
        .bind(swap_id)
        .bind(next.as_str())
        .bind(SwapStatus::Pending.as_str())
        .fetch_optional(&mut **tx)
        .await?;

    match updated {
        Some(swap) => Ok(swap),
        None => {
            let current: Option<(String,)> =
                sqlx::query_as("SELECT status FROM swaps WHERE id = $1")
                    .bind(swap_id)
                    .fetch_optional(&mut **tx)
                    .await?;
            let status = current
                .and_then(|(s,)| SwapStatus::parse(&s).ok())
                .unwrap_or(SwapStatus::Completed);
            Err(SwapError::NotPending { status }.into())
        }
    }
}
