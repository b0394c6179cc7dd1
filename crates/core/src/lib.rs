//! Domain logic for the Brigade inventory subsystem.
//!
//! Pure types and validation shared by the persistence and API layers:
//! the error taxonomy, the item-or-variant [`subject::Subject`] sum type,
//! the transaction-type arity table, and category attribute-schema
//! validation. No I/O happens here.

pub mod error;
pub mod ledger;
pub mod schema;
pub mod subject;
pub mod types;
