//! Item variant models and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use brigade_core::types::{DbId, Timestamp};

/// A row from the `item_variants` table.
///
/// `variant_attributes` is the combination that distinguishes this variant
/// within its item, e.g. `{"size": "M"}`; the combination is unique per
/// item.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemVariant {
    pub id: DbId,
    pub item_id: DbId,
    pub variant_attributes: Value,
    pub sku: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a variant under an item (the item id comes from the
/// request path).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemVariant {
    pub variant_attributes: Value,
    pub sku: Option<String>,
}

/// DTO for updating a variant. Omitted fields are unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItemVariant {
    pub variant_attributes: Option<Value>,
    pub sku: Option<String>,
}
