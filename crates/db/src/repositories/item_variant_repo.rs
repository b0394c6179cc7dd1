//! Repository for the `item_variants` table.
//!
//! Owns the variant-parent flag on items: creating the first variant flips
//! `is_variant_parent` to true, deleting the last one flips it back, both in
//! the same transaction as the variant write. The owning item row is locked
//! first so concurrent variant writes against one item serialize.

use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};

use brigade_core::error::CoreError;
use brigade_core::types::DbId;

use crate::error::{RepoError, RepoResult};
use crate::models::item_variant::{CreateItemVariant, ItemVariant, UpdateItemVariant};

/// Column list for `item_variants` queries.
const COLUMNS: &str = "id, item_id, variant_attributes, sku, created_at, updated_at";

/// Provides CRUD operations for item variants.
pub struct ItemVariantRepo;

impl ItemVariantRepo {
    /// Create a variant under `item_id`, flipping the item to a variant
    /// parent if this is its first variant.
    pub async fn create(
        pool: &PgPool,
        item_id: DbId,
        input: &CreateItemVariant,
    ) -> RepoResult<ItemVariant> {
        let mut tx = pool.begin().await?;

        lock_item(&mut tx, item_id).await?;
        check_duplicate_attributes(&mut tx, item_id, None, &input.variant_attributes).await?;

        let query = format!(
            "INSERT INTO item_variants (item_id, variant_attributes, sku) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let variant = sqlx::query_as::<_, ItemVariant>(&query)
            .bind(item_id)
            .bind(&input.variant_attributes)
            .bind(&input.sku)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE items SET is_variant_parent = TRUE, updated_at = NOW() \
             WHERE id = $1 AND NOT is_variant_parent",
        )
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(variant)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ItemVariant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM item_variants WHERE id = $1");
        sqlx::query_as::<_, ItemVariant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_item(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Vec<ItemVariant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM item_variants WHERE item_id = $1 ORDER BY id");
        sqlx::query_as::<_, ItemVariant>(&query)
            .bind(item_id)
            .fetch_all(pool)
            .await
    }

    /// Update a variant's attributes and/or SKU. A changed attribute
    /// combination is re-checked for uniqueness within the item.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateItemVariant,
    ) -> RepoResult<Option<ItemVariant>> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM item_variants WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, ItemVariant>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(attributes) = &input.variant_attributes {
            if *attributes != current.variant_attributes {
                check_duplicate_attributes(&mut tx, current.item_id, Some(id), attributes).await?;
            }
        }

        let query = format!(
            "UPDATE item_variants \
             SET variant_attributes = COALESCE($2, variant_attributes), \
                 sku = COALESCE($3, sku), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let variant = sqlx::query_as::<_, ItemVariant>(&query)
            .bind(id)
            .bind(&input.variant_attributes)
            .bind(&input.sku)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(variant))
    }

    /// Delete a variant. Refused while it still has stock. When the last
    /// variant of an item goes away, the item stops being a variant parent.
    pub async fn delete(pool: &PgPool, id: DbId) -> RepoResult<bool> {
        let mut tx = pool.begin().await?;

        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT item_id FROM item_variants WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((item_id,)) = row else {
            return Ok(false);
        };
        lock_item(&mut tx, item_id).await?;

        let (on_hand,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantity), 0)::bigint FROM stock_balances \
             WHERE subject_type = 'variant' AND subject_id = $1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if on_hand > 0 {
            return Err(RepoError::Core(CoreError::Conflict(format!(
                "variant still has {on_hand} units in stock"
            ))));
        }

        sqlx::query("DELETE FROM stock_balances WHERE subject_type = 'variant' AND subject_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM item_variants WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let (siblings,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM item_variants WHERE item_id = $1")
                .bind(item_id)
                .fetch_one(&mut *tx)
                .await?;
        if siblings == 0 {
            sqlx::query(
                "UPDATE items SET is_variant_parent = FALSE, updated_at = NOW() WHERE id = $1",
            )
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}

/// Lock the owning item row, failing with NotFound if it does not exist.
async fn lock_item(tx: &mut Transaction<'_, Postgres>, item_id: DbId) -> RepoResult<()> {
    let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM items WHERE id = $1 FOR UPDATE")
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await?;
    if row.is_none() {
        return Err(RepoError::Core(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }));
    }
    Ok(())
}

/// Reject a (item, variant_attributes) combination that another variant of
/// the same item already uses. The unique index is the backstop; this check
/// exists to surface the failure as a validation error.
async fn check_duplicate_attributes(
    tx: &mut Transaction<'_, Postgres>,
    item_id: DbId,
    exclude_id: Option<DbId>,
    attributes: &Value,
) -> RepoResult<()> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS ( \
             SELECT 1 FROM item_variants \
             WHERE item_id = $1 AND variant_attributes = $2 AND ($3::bigint IS NULL OR id <> $3) \
         )",
    )
    .bind(item_id)
    .bind(attributes)
    .bind(exclude_id)
    .fetch_one(&mut **tx)
    .await?;
    if exists {
        return Err(RepoError::Core(CoreError::Validation(
            "a variant with this attribute combination already exists for the item".to_string(),
        )));
    }
    Ok(())
}
