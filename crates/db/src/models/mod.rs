//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the write operations the entity supports

pub mod category;
pub mod item;
pub mod item_variant;
pub mod member;
pub mod stock;
pub mod storage_location;
