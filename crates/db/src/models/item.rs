//! Item models and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use brigade_core::types::{DbId, Timestamp};

/// A row from the `items` table.
///
/// `is_variant_parent` is maintained by the variant repository: true while
/// the item has at least one variant. A variant parent carries no stock of
/// its own; the ledger refuses it as a direct subject.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    pub category_id: Option<DbId>,
    pub base_unit: String,
    pub attributes: Value,
    pub is_variant_parent: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub category_id: Option<DbId>,
    /// Unit label for quantities, e.g. "piece" or "pair". Defaults to "piece".
    pub base_unit: Option<String>,
    pub attributes: Option<Value>,
}

/// DTO for updating an item. Omitted fields are unchanged; the category
/// reference cannot be cleared through this DTO.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub category_id: Option<DbId>,
    pub base_unit: Option<String>,
    pub attributes: Option<Value>,
}
