//! Minimal repository for the `members` table.
//!
//! Full member management belongs to another subsystem; the inventory only
//! needs create and lookup so member-locations have a referent.

use sqlx::PgPool;

use brigade_core::types::DbId;

use crate::models::member::Member;

const COLUMNS: &str = "id, name, created_at";

pub struct MemberRepo;

impl MemberRepo {
    pub async fn create(pool: &PgPool, name: &str) -> Result<Member, sqlx::Error> {
        let query = format!("INSERT INTO members (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Member>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
