/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Stock quantities are 64-bit integers, non-negative on balances and
/// strictly positive on transactions.
pub type Quantity = i64;
