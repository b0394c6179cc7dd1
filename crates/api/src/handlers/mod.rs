//! Request handlers.
//!
//! Each submodule provides async handler functions for one entity area.
//! Handlers delegate to the corresponding repository in `brigade_db` and
//! map errors via [`crate::error::AppError`].

pub mod category;
pub mod item;
pub mod item_variant;
pub mod location;
pub mod stock;
