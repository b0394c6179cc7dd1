//! Category models and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use brigade_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
///
/// `schema` maps attribute names to declared types; see
/// `brigade_core::schema` for the accepted type names and validation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub schema: Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub schema: Option<Value>,
}

/// DTO for updating a category. Omitted fields are unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub schema: Option<Value>,
}
