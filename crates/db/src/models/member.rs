//! Minimal member model.
//!
//! Member management lives in another subsystem; the inventory only needs a
//! referent for member-owned storage locations and transaction actors.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use brigade_core::types::{DbId, Timestamp};

/// A row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// DTO for creating a member.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMember {
    pub name: String,
}
