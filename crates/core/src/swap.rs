//! Swap proposal, rejection, and completion rules.
//!
//! The functions here decide; they never write. The persistence layer loads a
//! [`SwapSnapshot`] under row locks, asks [`plan_completion`] what to do, and
//! applies the returned [`CompletionPlan`] inside the same transaction. Keeping
//! the decision pure means every precondition can be exercised without a
//! database.

use crate::catalog::{is_listable, ApprovalStatus, ItemStatus, SwapStatus};
use crate::error::CoreError;
use crate::types::{DbId, Points};

/// Why a swap could not be completed or rejected.
///
/// Variants are ordered the way preconditions are checked; the first failing
/// check wins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    #[error("Swap not found")]
    NotFound { swap_id: DbId },

    #[error("Only the receiver can complete the swap")]
    NotReceiver,

    #[error("Swap is not in pending status")]
    NotPending { status: SwapStatus },

    #[error("Requested item is not available or approved")]
    RequestedItemUnavailable,

    #[error("Offered item is not available or approved")]
    OfferedItemUnavailable,

    #[error("Requester has insufficient points")]
    InsufficientPoints { available: Points, required: Points },
}

impl SwapError {
    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::NotReceiver => "NOT_SWAP_RECEIVER",
            Self::NotPending { .. } => "SWAP_NOT_PENDING",
            Self::RequestedItemUnavailable | Self::OfferedItemUnavailable => "ITEM_UNAVAILABLE",
            Self::InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
        }
    }
}

/// The fields of an item that swap rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSnapshot {
    pub id: DbId,
    pub uploader_id: DbId,
    pub status: ItemStatus,
    pub approval_status: ApprovalStatus,
}

impl ItemSnapshot {
    pub fn is_swappable(&self) -> bool {
        is_listable(self.status, self.approval_status)
    }
}

/// Everything completion needs to know, read under lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapSnapshot {
    pub id: DbId,
    pub requester_id: DbId,
    pub receiver_id: DbId,
    pub status: SwapStatus,
    pub points_used: Points,
    pub requester_points: Points,
    pub requested_item: ItemSnapshot,
    pub offered_item: Option<ItemSnapshot>,
}

/// A zero-sum movement of points between two users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsTransfer {
    pub from_user: DbId,
    pub to_user: DbId,
    pub amount: Points,
}

/// The writes a successful completion performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPlan {
    pub swap_id: DbId,
    /// `None` when the swap carries no points.
    pub transfer: Option<PointsTransfer>,
    /// Requested item first, then the offered item if any.
    pub items_to_mark_swapped: Vec<DbId>,
}

/// Decide whether `actor_id` may complete the swap described by `snapshot`.
///
/// Checks, in order: the actor is the receiver, the swap is pending, the
/// requested item is available and approved, the offered item (if any) is
/// available and approved, and the requester can cover `points_used`.
pub fn plan_completion(
    snapshot: &SwapSnapshot,
    actor_id: DbId,
) -> Result<CompletionPlan, SwapError> {
    ensure_receiver_transition(
        snapshot.receiver_id,
        snapshot.status,
        SwapStatus::Completed,
        actor_id,
    )?;

    if !snapshot.requested_item.is_swappable() {
        return Err(SwapError::RequestedItemUnavailable);
    }

    if let Some(offered) = &snapshot.offered_item {
        if !offered.is_swappable() {
            return Err(SwapError::OfferedItemUnavailable);
        }
    }

    let transfer = if snapshot.points_used > 0 {
        if snapshot.requester_points < snapshot.points_used {
            return Err(SwapError::InsufficientPoints {
                available: snapshot.requester_points,
                required: snapshot.points_used,
            });
        }
        Some(PointsTransfer {
            from_user: snapshot.requester_id,
            to_user: snapshot.receiver_id,
            amount: snapshot.points_used,
        })
    } else {
        None
    };

    let mut items_to_mark_swapped = vec![snapshot.requested_item.id];
    if let Some(offered) = &snapshot.offered_item {
        items_to_mark_swapped.push(offered.id);
    }

    Ok(CompletionPlan {
        swap_id: snapshot.id,
        transfer,
        items_to_mark_swapped,
    })
}

/// Decide whether `actor_id` may reject a swap.
///
/// Only the receiver may reject, and only while the swap is pending.
pub fn check_rejection(
    receiver_id: DbId,
    status: SwapStatus,
    actor_id: DbId,
) -> Result<(), SwapError> {
    ensure_receiver_transition(receiver_id, status, SwapStatus::Rejected, actor_id)
}

fn ensure_receiver_transition(
    receiver_id: DbId,
    status: SwapStatus,
    next: SwapStatus,
    actor_id: DbId,
) -> Result<(), SwapError> {
    if receiver_id != actor_id {
        return Err(SwapError::NotReceiver);
    }
    if !status.can_transition_to(next) {
        return Err(SwapError::NotPending { status });
    }
    Ok(())
}

/// Inputs for validating a new swap proposal.
#[derive(Debug, Clone)]
pub struct ProposalContext {
    pub requester_id: DbId,
    pub requester_points: Points,
    pub requested_item: ItemSnapshot,
    pub offered_item: Option<ItemSnapshot>,
    pub points_used: Points,
}

/// Validate a swap proposal before it is persisted as `pending`.
///
/// The balance check here is advisory; completion re-checks it under lock.
pub fn validate_proposal(ctx: &ProposalContext) -> Result<(), CoreError> {
    if ctx.points_used < 0 {
        return Err(CoreError::Validation(
            "pointsUsed cannot be negative".to_string(),
        ));
    }
    if ctx.offered_item.is_none() && ctx.points_used == 0 {
        return Err(CoreError::Validation(
            "A swap must offer an item, points, or both".to_string(),
        ));
    }
    if ctx.requested_item.uploader_id == ctx.requester_id {
        return Err(CoreError::Validation(
            "You cannot request your own item".to_string(),
        ));
    }
    if !ctx.requested_item.is_swappable() {
        return Err(CoreError::Conflict(
            SwapError::RequestedItemUnavailable.to_string(),
        ));
    }
    if let Some(offered) = &ctx.offered_item {
        if offered.uploader_id != ctx.requester_id {
            return Err(CoreError::Forbidden(
                "You can only offer your own items".to_string(),
            ));
        }
        if offered.id == ctx.requested_item.id {
            return Err(CoreError::Validation(
                "Offered and requested items must differ".to_string(),
            ));
        }
        if !offered.is_swappable() {
            return Err(CoreError::Conflict(
                SwapError::OfferedItemUnavailable.to_string(),
            ));
        }
    }
    if ctx.requester_points < ctx.points_used {
        return Err(CoreError::Conflict(
            SwapError::InsufficientPoints {
                available: ctx.requester_points,
                required: ctx.points_used,
            }
            .to_string(),
        ));
    }
    Ok(())
}
