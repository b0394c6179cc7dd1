//! Stock balance and movement-log models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use brigade_core::ledger::TransactionType;
use brigade_core::types::{DbId, Quantity, Timestamp};

/// A row from the `stock_balances` table: the current quantity of one
/// subject (item or variant) at one location. There is at most one row per
/// (subject, location) pair; rows are written only by the ledger repository.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StockBalance {
    pub id: DbId,
    pub subject_type: String,
    pub subject_id: DbId,
    pub location_id: DbId,
    pub quantity: Quantity,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the append-only `stock_transactions` log.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StockTransaction {
    pub id: DbId,
    pub transaction_type: String,
    pub subject_type: String,
    pub subject_id: DbId,
    pub source_id: Option<DbId>,
    pub target_id: Option<DbId>,
    pub quantity: Quantity,
    pub note: Option<String>,
    pub actor_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for applying a movement via `POST /stock/transactions`.
///
/// Exactly one of `item_id` / `variant_id` must be set; which of
/// `source_id` / `target_id` are required depends on `transaction_type`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStockTransaction {
    pub transaction_type: TransactionType,
    pub item_id: Option<DbId>,
    pub variant_id: Option<DbId>,
    pub source_id: Option<DbId>,
    pub target_id: Option<DbId>,
    pub quantity: Quantity,
    pub note: Option<String>,
}

/// Query parameters for listing the movement log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionListParams {
    pub item_id: Option<DbId>,
    pub variant_id: Option<DbId>,
    /// Matches transactions touching this location as source or target.
    pub location_id: Option<DbId>,
    pub transaction_type: Option<TransactionType>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One (location, quantity) pair for a subject, from `balances_for`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubjectBalance {
    pub location_id: DbId,
    pub location_name: String,
    pub quantity: Quantity,
}

/// One (subject, quantity) pair at a location, from `balances_at`. `name` is
/// the item name; for variant subjects it is the owning item's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LocationBalance {
    pub subject_type: String,
    pub subject_id: DbId,
    pub name: String,
    pub quantity: Quantity,
}

/// Total stock for a subject, as returned by the total/at endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct StockLevel {
    pub quantity: Quantity,
}
