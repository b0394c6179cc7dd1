//! The ledger engine: the only code path that changes a stock balance.
//!
//! [`LedgerRepo::apply`] persists the movement record and the balance deltas
//! as one database transaction. Debits re-verify the available quantity
//! under a `FOR UPDATE` row lock, so two concurrent debits of the same
//! (subject, source) can never jointly overdraw; credits are a single
//! atomic upsert. Any failure rolls the whole unit back, including the log
//! row.

use sqlx::{PgPool, Postgres, Transaction};

use brigade_core::error::CoreError;
use brigade_core::ledger::TransactionRequest;
use brigade_core::subject::Subject;
use brigade_core::types::DbId;

use crate::error::{RepoError, RepoResult};
use crate::models::stock::{StockTransaction, TransactionListParams};

/// Column list for `stock_transactions` queries.
const COLUMNS: &str = "\
    id, transaction_type, subject_type, subject_id, source_id, target_id, \
    quantity, note, actor_id, created_at";

/// Default page size for log listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for log listing.
const MAX_LIMIT: i64 = 200;

/// Applies movement transactions and reads the append-only log.
pub struct LedgerRepo;

impl LedgerRepo {
    /// Validate and apply a movement. On success the committed log row is
    /// returned; on any error nothing is persisted.
    pub async fn apply(pool: &PgPool, request: &TransactionRequest) -> RepoResult<StockTransaction> {
        request.validate()?;

        let mut tx = pool.begin().await?;

        check_subject(&mut tx, request.subject).await?;
        for location_id in [request.source_id, request.target_id].into_iter().flatten() {
            check_location(&mut tx, location_id).await?;
        }

        let query = format!(
            "INSERT INTO stock_transactions \
                 (transaction_type, subject_type, subject_id, source_id, target_id, \
                  quantity, note, actor_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, StockTransaction>(&query)
            .bind(request.transaction_type.as_str())
            .bind(request.subject.type_str())
            .bind(request.subject.id())
            .bind(request.source_id)
            .bind(request.target_id)
            .bind(request.quantity)
            .bind(&request.note)
            .bind(request.actor_id)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(source_id) = request.source_id {
            debit(&mut tx, request.subject, source_id, request.quantity).await?;
        }
        if let Some(target_id) = request.target_id {
            credit(&mut tx, request.subject, target_id, request.quantity).await?;
        }

        tx.commit().await?;

        tracing::info!(
            transaction_id = record.id,
            transaction_type = %request.transaction_type,
            subject_type = request.subject.type_str(),
            subject_id = request.subject.id(),
            quantity = request.quantity,
            "Stock movement applied"
        );
        Ok(record)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StockTransaction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stock_transactions WHERE id = $1");
        sqlx::query_as::<_, StockTransaction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the movement log, newest first, with optional subject, location,
    /// and type filters.
    pub async fn list(
        pool: &PgPool,
        params: &TransactionListParams,
    ) -> RepoResult<Vec<StockTransaction>> {
        let subject = match (params.item_id, params.variant_id) {
            (None, None) => None,
            (item_id, variant_id) => Some(Subject::from_ids(item_id, variant_id)?),
        };
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let query = format!(
            "SELECT {COLUMNS} FROM stock_transactions \
             WHERE ($1::text IS NULL OR (subject_type = $1 AND subject_id = $2)) \
               AND ($3::bigint IS NULL OR source_id = $3 OR target_id = $3) \
               AND ($4::text IS NULL OR transaction_type = $4) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, StockTransaction>(&query)
            .bind(subject.map(|s| s.type_str()))
            .bind(subject.map(|s| s.id()).unwrap_or(0))
            .bind(params.location_id)
            .bind(params.transaction_type.map(|t| t.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }
}

/// Existence check for the subject. An item that is a variant parent carries
/// no stock of its own and is refused as a direct subject.
async fn check_subject(tx: &mut Transaction<'_, Postgres>, subject: Subject) -> RepoResult<()> {
    match subject {
        Subject::Item(id) => {
            let row: Option<(bool,)> =
                sqlx::query_as("SELECT is_variant_parent FROM items WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut **tx)
                    .await?;
            match row {
                None => Err(RepoError::Core(CoreError::NotFound { entity: "Item", id })),
                Some((true,)) => Err(RepoError::Core(CoreError::Validation(
                    "item is a variant parent; stock moves on its variants".to_string(),
                ))),
                Some((false,)) => Ok(()),
            }
        }
        Subject::Variant(id) => {
            let row: Option<(DbId,)> =
                sqlx::query_as("SELECT id FROM item_variants WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut **tx)
                    .await?;
            if row.is_none() {
                return Err(RepoError::Core(CoreError::NotFound {
                    entity: "ItemVariant",
                    id,
                }));
            }
            Ok(())
        }
    }
}

async fn check_location(tx: &mut Transaction<'_, Postgres>, id: DbId) -> RepoResult<()> {
    let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM storage_locations WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    if row.is_none() {
        return Err(RepoError::Core(CoreError::NotFound {
            entity: "StorageLocation",
            id,
        }));
    }
    Ok(())
}

/// Subtract `quantity` from the (subject, source) balance. The row is locked
/// before the availability check so the check and the write are one unit
/// from the perspective of concurrent debits. A missing row is an available
/// balance of zero.
async fn debit(
    tx: &mut Transaction<'_, Postgres>,
    subject: Subject,
    location_id: DbId,
    quantity: i64,
) -> RepoResult<()> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT quantity FROM stock_balances \
         WHERE subject_type = $1 AND subject_id = $2 AND location_id = $3 \
         FOR UPDATE",
    )
    .bind(subject.type_str())
    .bind(subject.id())
    .bind(location_id)
    .fetch_optional(&mut **tx)
    .await?;

    let available = row.map(|(quantity,)| quantity).unwrap_or(0);
    if available < quantity {
        return Err(RepoError::Core(CoreError::InsufficientStock {
            available,
            requested: quantity,
        }));
    }

    sqlx::query(
        "UPDATE stock_balances \
         SET quantity = quantity - $4, updated_at = NOW() \
         WHERE subject_type = $1 AND subject_id = $2 AND location_id = $3",
    )
    .bind(subject.type_str())
    .bind(subject.id())
    .bind(location_id)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Add `quantity` to the (subject, target) balance, creating the row at zero
/// if it does not exist yet. A single upsert, so no read-then-write window.
async fn credit(
    tx: &mut Transaction<'_, Postgres>,
    subject: Subject,
    location_id: DbId,
    quantity: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO stock_balances (subject_type, subject_id, location_id, quantity) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (subject_type, subject_id, location_id) \
         DO UPDATE SET quantity = stock_balances.quantity + EXCLUDED.quantity, \
                       updated_at = NOW()",
    )
    .bind(subject.type_str())
    .bind(subject.id())
    .bind(location_id)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
