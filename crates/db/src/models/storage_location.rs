//! Storage location models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use brigade_core::types::{DbId, Timestamp};

/// A row from the `storage_locations` table.
///
/// Locations form a forest via `parent_id`. A member-location represents one
/// member's personal storage: `is_member` is true exactly when `member_id`
/// is set, and no two locations share a member.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StorageLocation {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub is_member: bool,
    pub member_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a storage location.
///
/// `is_member` may be omitted; when present it must agree with `member_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStorageLocation {
    pub name: String,
    pub parent_id: Option<DbId>,
    pub member_id: Option<DbId>,
    pub is_member: Option<bool>,
}

/// DTO for updating a storage location. This is a full replace so that a
/// location can be reparented to the root (`parent_id: null`).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStorageLocation {
    pub name: String,
    pub parent_id: Option<DbId>,
    pub member_id: Option<DbId>,
    pub is_member: Option<bool>,
}

/// A location with its children, for the tree view.
#[derive(Debug, Clone, Serialize)]
pub struct LocationTreeNode {
    #[serde(flatten)]
    pub location: StorageLocation,
    pub children: Vec<LocationTreeNode>,
}
