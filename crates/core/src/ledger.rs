//! Movement transaction types and structural validation.
//!
//! Each transaction type is a fixed-arity operation over `{source, target}`:
//! a required endpoint is exactly the one the type debits or credits. The
//! checks here are pure and run before any balance row is touched; the
//! balance-level check (available >= requested) happens in the repository
//! under a row lock.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::subject::Subject;
use crate::types::{DbId, Quantity};

/// Movement transaction type.
///
/// | Type     | source | target | effect                          |
/// |----------|--------|--------|---------------------------------|
/// | Receipt  | -      | yes    | target += qty                   |
/// | Issue    | yes    | -      | source -= qty                   |
/// | Discard  | yes    | -      | source -= qty                   |
/// | Transfer | yes    | yes    | source -= qty; target += qty    |
/// | Loan     | yes    | yes    | source -= qty; target += qty    |
/// | Return   | yes    | yes    | source -= qty; target += qty    |
///
/// Loan and Return share Transfer's mechanics; the distinction is semantic
/// and lives in the log for the caller's benefit. Whether a loan's target
/// must be a member-owned location is calling-layer policy, not enforced
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Receipt,
    Issue,
    Transfer,
    Loan,
    Return,
    Discard,
}

impl TransactionType {
    pub const ALL: [TransactionType; 6] = [
        TransactionType::Receipt,
        TransactionType::Issue,
        TransactionType::Transfer,
        TransactionType::Loan,
        TransactionType::Return,
        TransactionType::Discard,
    ];

    /// Whether this type debits a source location (and therefore requires one).
    pub fn debits_source(self) -> bool {
        !matches!(self, TransactionType::Receipt)
    }

    /// Whether this type credits a target location (and therefore requires one).
    pub fn credits_target(self) -> bool {
        !matches!(self, TransactionType::Issue | TransactionType::Discard)
    }

    /// The `transaction_type` column value.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Receipt => "receipt",
            TransactionType::Issue => "issue",
            TransactionType::Transfer => "transfer",
            TransactionType::Loan => "loan",
            TransactionType::Return => "return",
            TransactionType::Discard => "discard",
        }
    }

    /// Parse the persisted column value back into the enum.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                CoreError::Internal(format!("unknown transaction_type in database: {s}"))
            })
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated movement request, ready for the ledger repository.
#[derive(Debug, Clone)]
pub struct TransactionRequest {
    pub transaction_type: TransactionType,
    pub subject: Subject,
    pub source_id: Option<DbId>,
    pub target_id: Option<DbId>,
    pub quantity: Quantity,
    pub note: Option<String>,
    pub actor_id: Option<DbId>,
}

impl TransactionRequest {
    /// Structural validation, in order: endpoint arity for the type, distinct
    /// endpoints, positive quantity. Subject exclusivity is already enforced
    /// by [`Subject`] construction.
    pub fn validate(&self) -> Result<(), CoreError> {
        let ty = self.transaction_type;

        if ty.debits_source() && self.source_id.is_none() {
            return Err(CoreError::Validation(format!(
                "{ty} requires a source location"
            )));
        }
        if !ty.debits_source() && self.source_id.is_some() {
            return Err(CoreError::Validation(format!(
                "{ty} does not take a source location"
            )));
        }
        if ty.credits_target() && self.target_id.is_none() {
            return Err(CoreError::Validation(format!(
                "{ty} requires a target location"
            )));
        }
        if !ty.credits_target() && self.target_id.is_some() {
            return Err(CoreError::Validation(format!(
                "{ty} does not take a target location"
            )));
        }

        if let (Some(source), Some(target)) = (self.source_id, self.target_id) {
            if source == target {
                return Err(CoreError::Validation(
                    "source and target locations must differ".to_string(),
                ));
            }
        }

        if self.quantity <= 0 {
            return Err(CoreError::Validation(
                "quantity must be a positive integer".to_string(),
            ));
        }

        Ok(())
    }
}
