//! Swap entity model and DTOs.

use rewear_core::catalog::SwapStatus;
use rewear_core::types::{DbId, Points, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::item::Item;

/// A row from the `swaps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Swap {
    pub id: DbId,
    pub requester_id: DbId,
    pub receiver_id: DbId,
    pub requested_item_id: DbId,
    pub offered_item_id: Option<DbId>,
    pub points_used: Points,
    #[sqlx(try_from = "String")]
    pub status: SwapStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new swap in `pending` state.
#[derive(Debug, Clone)]
pub struct CreateSwap {
    pub requester_id: DbId,
    pub receiver_id: DbId,
    pub requested_item_id: DbId,
    pub offered_item_id: Option<DbId>,
    pub points_used: Points,
}

/// Which side of a swap the caller is listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapParty {
    Requester,
    Receiver,
    #[default]
    All,
}

/// The state of every record a completion touched, read back inside the
/// completing transaction.
#[derive(Debug, Clone)]
pub struct CompletedSwap {
    pub swap: Swap,
    pub requested_item: Item,
    pub offered_item: Option<Item>,
    pub requester_points: Points,
    pub receiver_points: Points,
}
