//! The item-or-variant subject of a balance or movement.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// The thing whose quantity is tracked: a plain item or one specific
/// variant of a variant-parent item, never both.
///
/// Request payloads carry `item_id` / `variant_id` as two optional fields;
/// [`Subject::from_ids`] is the single place that turns that pair into a
/// value, so the "exactly one" rule cannot be bypassed further in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Subject {
    Item(DbId),
    Variant(DbId),
}

impl Subject {
    /// Build a subject from the optional-id pair used in request DTOs.
    pub fn from_ids(item_id: Option<DbId>, variant_id: Option<DbId>) -> Result<Self, CoreError> {
        match (item_id, variant_id) {
            (Some(id), None) => Ok(Subject::Item(id)),
            (None, Some(id)) => Ok(Subject::Variant(id)),
            (Some(_), Some(_)) => Err(CoreError::Validation(
                "set either item_id or variant_id, not both".to_string(),
            )),
            (None, None) => Err(CoreError::Validation(
                "a subject is required: set item_id or variant_id".to_string(),
            )),
        }
    }

    /// Rebuild a subject from its persisted `(subject_type, subject_id)`
    /// column pair.
    pub fn from_row(subject_type: &str, subject_id: DbId) -> Result<Self, CoreError> {
        match subject_type {
            "item" => Ok(Subject::Item(subject_id)),
            "variant" => Ok(Subject::Variant(subject_id)),
            other => Err(CoreError::Internal(format!(
                "unknown subject_type in database: {other}"
            ))),
        }
    }

    /// The `subject_type` column value.
    pub fn type_str(&self) -> &'static str {
        match self {
            Subject::Item(_) => "item",
            Subject::Variant(_) => "variant",
        }
    }

    /// The referenced entity's id.
    pub fn id(&self) -> DbId {
        match self {
            Subject::Item(id) | Subject::Variant(id) => *id,
        }
    }

    /// Entity name used in not-found errors.
    pub fn entity_name(&self) -> &'static str {
        match self {
            Subject::Item(_) => "Item",
            Subject::Variant(_) => "ItemVariant",
        }
    }
}
