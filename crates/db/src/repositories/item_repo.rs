//! Repository for the `items` table.
//!
//! Item attributes are validated against the category's attribute schema on
//! create and update. Deletion is refused while the item (or any of its
//! variants) still has stock on hand, since deleting would orphan the
//! balances' audit trail.

use sqlx::{PgPool, Postgres, Transaction};

use brigade_core::error::CoreError;
use brigade_core::schema::validate_attributes;
use brigade_core::types::DbId;

use crate::error::{RepoError, RepoResult};
use crate::models::item::{CreateItem, Item, UpdateItem};

/// Column list for `items` queries.
const COLUMNS: &str =
    "id, name, category_id, base_unit, attributes, is_variant_parent, created_at, updated_at";

/// Provides CRUD operations for catalog items.
pub struct ItemRepo;

impl ItemRepo {
    pub async fn create(pool: &PgPool, input: &CreateItem) -> RepoResult<Item> {
        if let Some(category_id) = input.category_id {
            let attributes = input
                .attributes
                .clone()
                .unwrap_or_else(|| serde_json::json!({}));
            check_attributes(pool, category_id, &attributes).await?;
        }

        let query = format!(
            "INSERT INTO items (name, category_id, base_unit, attributes) \
             VALUES ($1, $2, COALESCE($3, 'piece'), COALESCE($4, '{{}}'::jsonb)) \
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, Item>(&query)
            .bind(&input.name)
            .bind(input.category_id)
            .bind(&input.base_unit)
            .bind(&input.attributes)
            .fetch_one(pool)
            .await?;
        Ok(item)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items ORDER BY name");
        sqlx::query_as::<_, Item>(&query).fetch_all(pool).await
    }

    /// Update an item; omitted fields are unchanged. When the category or
    /// attributes change, the resulting pair is re-validated against the
    /// category schema. Returns `None` if the item is missing.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateItem,
    ) -> RepoResult<Option<Item>> {
        let Some(current) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let category_id = input.category_id.or(current.category_id);
        let attributes = input.attributes.clone().unwrap_or(current.attributes);
        if let Some(category_id) = category_id {
            check_attributes(pool, category_id, &attributes).await?;
        }

        let query = format!(
            "UPDATE items \
             SET name = COALESCE($2, name), \
                 category_id = COALESCE($3, category_id), \
                 base_unit = COALESCE($4, base_unit), \
                 attributes = $5, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.category_id)
            .bind(&input.base_unit)
            .bind(&attributes)
            .fetch_optional(pool)
            .await?;
        Ok(item)
    }

    /// Delete an item and (via cascade) its variants. Refused while the item
    /// or any of its variants has non-zero stock.
    pub async fn delete(pool: &PgPool, id: DbId) -> RepoResult<bool> {
        let mut tx = pool.begin().await?;

        let exists: Option<(bool,)> =
            sqlx::query_as("SELECT is_variant_parent FROM items WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Ok(false);
        }

        let on_hand = Self::aggregate_stock(&mut tx, id).await?;
        if on_hand > 0 {
            return Err(RepoError::Core(CoreError::Conflict(format!(
                "item still has {on_hand} units in stock"
            ))));
        }

        // Variant balances are all zero at this point; drop them so the FK
        // on stock_balances does not block the cascade.
        sqlx::query(
            "DELETE FROM stock_balances \
             WHERE (subject_type = 'item' AND subject_id = $1) \
                OR (subject_type = 'variant' AND subject_id IN \
                    (SELECT id FROM item_variants WHERE item_id = $1))",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Sum of the item's own balances plus all of its variants' balances.
    async fn aggregate_stock(
        tx: &mut Transaction<'_, Postgres>,
        item_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantity), 0)::bigint FROM stock_balances \
             WHERE (subject_type = 'item' AND subject_id = $1) \
                OR (subject_type = 'variant' AND subject_id IN \
                    (SELECT id FROM item_variants WHERE item_id = $1))",
        )
        .bind(item_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(total)
    }
}

/// Validate attributes against the category's schema, failing with NotFound
/// for a dangling category reference.
async fn check_attributes(
    pool: &PgPool,
    category_id: DbId,
    attributes: &serde_json::Value,
) -> RepoResult<()> {
    let schema: Option<(serde_json::Value,)> =
        sqlx::query_as("SELECT schema FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(pool)
            .await?;
    let Some((schema,)) = schema else {
        return Err(RepoError::Core(CoreError::NotFound {
            entity: "Category",
            id: category_id,
        }));
    };
    validate_attributes(&schema, attributes)?;
    Ok(())
}
