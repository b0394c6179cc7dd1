use crate::types::DbId;

/// Domain error taxonomy.
///
/// `Validation` and `InsufficientStock` mean the request itself must be
/// corrected by the caller; `NotFound` means a referenced record does not
/// exist. The two categories are kept distinct so the API layer can render
/// them differently.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A debit would take a balance below zero. Carries the balance that was
    /// actually available at the source so callers can show it.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
