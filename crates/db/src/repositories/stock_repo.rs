//! Read-side aggregation over stock balances.
//!
//! Every query here is computed fresh from the current `stock_balances`
//! rows; nothing is memoized, so reads always reflect the latest committed
//! ledger state.

use sqlx::PgPool;

use brigade_core::error::CoreError;
use brigade_core::subject::Subject;
use brigade_core::types::DbId;

use crate::error::{RepoError, RepoResult};
use crate::models::stock::{LocationBalance, SubjectBalance};

/// Aggregation queries over current balances.
pub struct StockRepo;

impl StockRepo {
    /// Total stock for a subject across all locations. For a variant-parent
    /// item this is the sum over all of its variants' balances; for a plain
    /// item (or a variant) it is the sum of the subject's own rows.
    pub async fn total_stock(pool: &PgPool, subject: Subject) -> RepoResult<i64> {
        match subject {
            Subject::Item(id) => Self::total_stock_item(pool, id).await,
            Subject::Variant(id) => Self::total_stock_variant(pool, id).await,
        }
    }

    pub async fn total_stock_item(pool: &PgPool, item_id: DbId) -> RepoResult<i64> {
        let row: Option<(bool,)> =
            sqlx::query_as("SELECT is_variant_parent FROM items WHERE id = $1")
                .bind(item_id)
                .fetch_optional(pool)
                .await?;
        let Some((is_variant_parent,)) = row else {
            return Err(RepoError::Core(CoreError::NotFound {
                entity: "Item",
                id: item_id,
            }));
        };

        let (total,): (i64,) = if is_variant_parent {
            sqlx::query_as(
                "SELECT COALESCE(SUM(sb.quantity), 0)::bigint \
                 FROM stock_balances sb \
                 JOIN item_variants v \
                   ON sb.subject_type = 'variant' AND sb.subject_id = v.id \
                 WHERE v.item_id = $1",
            )
            .bind(item_id)
            .fetch_one(pool)
            .await?
        } else {
            sqlx::query_as(
                "SELECT COALESCE(SUM(quantity), 0)::bigint FROM stock_balances \
                 WHERE subject_type = 'item' AND subject_id = $1",
            )
            .bind(item_id)
            .fetch_one(pool)
            .await?
        };
        Ok(total)
    }

    pub async fn total_stock_variant(pool: &PgPool, variant_id: DbId) -> RepoResult<i64> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM item_variants WHERE id = $1")
            .bind(variant_id)
            .fetch_optional(pool)
            .await?;
        if row.is_none() {
            return Err(RepoError::Core(CoreError::NotFound {
                entity: "ItemVariant",
                id: variant_id,
            }));
        }

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantity), 0)::bigint FROM stock_balances \
             WHERE subject_type = 'variant' AND subject_id = $1",
        )
        .bind(variant_id)
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// The quantity of a subject at one location; a missing balance row is
    /// zero, not an error. The location must exist.
    pub async fn stock_at(pool: &PgPool, subject: Subject, location_id: DbId) -> RepoResult<i64> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM storage_locations WHERE id = $1")
            .bind(location_id)
            .fetch_optional(pool)
            .await?;
        if row.is_none() {
            return Err(RepoError::Core(CoreError::NotFound {
                entity: "StorageLocation",
                id: location_id,
            }));
        }

        let (quantity,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantity), 0)::bigint FROM stock_balances \
             WHERE subject_type = $1 AND subject_id = $2 AND location_id = $3",
        )
        .bind(subject.type_str())
        .bind(subject.id())
        .bind(location_id)
        .fetch_one(pool)
        .await?;
        Ok(quantity)
    }

    /// All locations holding the subject, with their quantities, ordered by
    /// location name. Zero balances are omitted.
    pub async fn balances_for(
        pool: &PgPool,
        subject: Subject,
    ) -> Result<Vec<SubjectBalance>, sqlx::Error> {
        sqlx::query_as::<_, SubjectBalance>(
            "SELECT sb.location_id, l.name AS location_name, sb.quantity \
             FROM stock_balances sb \
             JOIN storage_locations l ON l.id = sb.location_id \
             WHERE sb.subject_type = $1 AND sb.subject_id = $2 AND sb.quantity > 0 \
             ORDER BY l.name",
        )
        .bind(subject.type_str())
        .bind(subject.id())
        .fetch_all(pool)
        .await
    }

    /// All subjects held at a location, with their quantities. Variant rows
    /// carry the owning item's name. Zero balances are omitted. The location
    /// must exist.
    pub async fn balances_at(pool: &PgPool, location_id: DbId) -> RepoResult<Vec<LocationBalance>> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM storage_locations WHERE id = $1")
            .bind(location_id)
            .fetch_optional(pool)
            .await?;
        if row.is_none() {
            return Err(RepoError::Core(CoreError::NotFound {
                entity: "StorageLocation",
                id: location_id,
            }));
        }

        let rows = sqlx::query_as::<_, LocationBalance>(
            "SELECT sb.subject_type, sb.subject_id, i.name, sb.quantity \
             FROM stock_balances sb \
             JOIN items i ON sb.subject_type = 'item' AND i.id = sb.subject_id \
             WHERE sb.location_id = $1 AND sb.quantity > 0 \
             UNION ALL \
             SELECT sb.subject_type, sb.subject_id, i.name, sb.quantity \
             FROM stock_balances sb \
             JOIN item_variants v ON sb.subject_type = 'variant' AND v.id = sb.subject_id \
             JOIN items i ON i.id = v.item_id \
             WHERE sb.location_id = $1 AND sb.quantity > 0 \
             ORDER BY name, subject_type, subject_id",
        )
        .bind(location_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
