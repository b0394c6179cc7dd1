//! Repository for the `storage_locations` tree.
//!
//! Locations are stored flat with a parent reference; path and subtree
//! queries walk the tree fresh on every call. Reparenting runs its cycle
//! check inside the same transaction as the parent-pointer write, so two
//! concurrent reparentings cannot sneak a cycle past each other.

use sqlx::{PgPool, Postgres, Transaction};

use brigade_core::error::CoreError;
use brigade_core::types::DbId;

use crate::error::{RepoError, RepoResult};
use crate::models::storage_location::{
    CreateStorageLocation, StorageLocation, UpdateStorageLocation,
};

/// Column list for `storage_locations` queries.
const COLUMNS: &str = "id, name, parent_id, is_member, member_id, created_at, updated_at";

/// Separator used by [`StorageLocationRepo::full_path`].
const PATH_SEPARATOR: &str = " / ";

/// Provides CRUD and tree operations for storage locations.
pub struct StorageLocationRepo;

impl StorageLocationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateStorageLocation,
    ) -> RepoResult<StorageLocation> {
        check_member_flag(input.is_member, input.member_id)?;

        let mut tx = pool.begin().await?;
        if let Some(parent_id) = input.parent_id {
            require_location(&mut tx, parent_id).await?;
        }

        let query = format!(
            "INSERT INTO storage_locations (name, parent_id, is_member, member_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let location = sqlx::query_as::<_, StorageLocation>(&query)
            .bind(&input.name)
            .bind(input.parent_id)
            .bind(input.member_id.is_some())
            .bind(input.member_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(location)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StorageLocation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM storage_locations WHERE id = $1");
        sqlx::query_as::<_, StorageLocation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<StorageLocation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM storage_locations ORDER BY name");
        sqlx::query_as::<_, StorageLocation>(&query)
            .fetch_all(pool)
            .await
    }

    /// Full replace of a location, including reparenting. Before a new
    /// parent pointer is accepted, the chain from the proposed parent up to
    /// the root is walked under locks; encountering the location itself
    /// means the move would create a cycle.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStorageLocation,
    ) -> RepoResult<Option<StorageLocation>> {
        check_member_flag(input.is_member, input.member_id)?;

        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM storage_locations WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, StorageLocation>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if current.is_none() {
            return Ok(None);
        }

        if let Some(parent_id) = input.parent_id {
            require_location(&mut tx, parent_id).await?;
            check_cycle(&mut tx, id, parent_id).await?;
        }

        let query = format!(
            "UPDATE storage_locations \
             SET name = $2, parent_id = $3, is_member = $4, member_id = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let location = sqlx::query_as::<_, StorageLocation>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.parent_id)
            .bind(input.member_id.is_some())
            .bind(input.member_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(location))
    }

    /// Delete a location. The FK on children, balances, and log entries is
    /// RESTRICT, so a location in use fails with a constraint violation.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM storage_locations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ordered names from the root to this location, joined with `" / "`.
    /// Walks parent pointers fresh on every call; `None` if the location
    /// does not exist.
    pub async fn full_path(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        let names: Vec<(String,)> = sqlx::query_as(
            "WITH RECURSIVE chain AS ( \
                 SELECT id, name, parent_id, 0 AS depth \
                 FROM storage_locations WHERE id = $1 \
                 UNION ALL \
                 SELECT s.id, s.name, s.parent_id, c.depth + 1 \
                 FROM storage_locations s \
                 JOIN chain c ON s.id = c.parent_id \
             ) \
             SELECT name FROM chain ORDER BY depth DESC",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        if names.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            names
                .into_iter()
                .map(|(name,)| name)
                .collect::<Vec<_>>()
                .join(PATH_SEPARATOR),
        ))
    }

    /// All locations in the subtree below `id` (the location itself is not
    /// included). Computed fresh per call; `None` if the location does not
    /// exist.
    pub async fn descendants(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Vec<StorageLocation>>, sqlx::Error> {
        if Self::find_by_id(pool, id).await?.is_none() {
            return Ok(None);
        }

        let query = format!(
            "WITH RECURSIVE subtree AS ( \
                 SELECT {COLUMNS} FROM storage_locations WHERE parent_id = $1 \
                 UNION ALL \
                 SELECT s.id, s.name, s.parent_id, s.is_member, s.member_id, \
                        s.created_at, s.updated_at \
                 FROM storage_locations s \
                 JOIN subtree t ON s.parent_id = t.id \
             ) \
             SELECT * FROM subtree ORDER BY name"
        );
        let rows = sqlx::query_as::<_, StorageLocation>(&query)
            .bind(id)
            .fetch_all(pool)
            .await?;
        Ok(Some(rows))
    }
}

/// The `is_member` flag, when supplied, must agree with the member
/// reference.
fn check_member_flag(is_member: Option<bool>, member_id: Option<DbId>) -> Result<(), CoreError> {
    if let Some(flag) = is_member {
        if flag != member_id.is_some() {
            return Err(CoreError::Validation(
                "is_member flag disagrees with the member reference".to_string(),
            ));
        }
    }
    Ok(())
}

/// Existence check for a referenced location, inside the current
/// transaction.
async fn require_location(tx: &mut Transaction<'_, Postgres>, id: DbId) -> RepoResult<()> {
    let row: Option<(DbId,)> =
        sqlx::query_as("SELECT id FROM storage_locations WHERE id = $1")
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

/// Walk upward from `proposed_parent`; finding `id` on the way (or as the
/// proposed parent itself) means the new pointer would close a cycle. Each
/// step locks the visited row so a concurrent reparenting of an ancestor
/// serializes with this check.
async fn check_cycle(
    tx: &mut Transaction<'_, Postgres>,
    id: DbId,
    proposed_parent: DbId,
) -> RepoResult<()> {
    let mut cursor = Some(proposed_parent);
    while let Some(current) = cursor {
        if current == id {
            return Err(RepoError::Core(CoreError::Validation(
                "cycle: a location cannot be moved under its own subtree".to_string(),
            )));
        }
        let row: Option<(Option<DbId>,)> =
            sqlx::query_as("SELECT parent_id FROM storage_locations WHERE id = $1 FOR UPDATE")
                .bind(current)
                .fetch_optional(&mut **tx)
                .await?;
        cursor = row.and_then(|(parent_id,)| parent_id);
    }
    Ok(())
}
