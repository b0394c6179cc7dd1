//! Route definitions.
//!
//! Each submodule builds the `Router` for one area; [`api_routes`] merges
//! them into the `/api/v1` tree.

pub mod catalog;
pub mod health;
pub mod locations;
pub mod stock;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /categories                      list, create
/// /categories/{id}                 get, update, delete
/// /items                           list, create
/// /items/{id}                      get, update, delete
/// /items/{id}/variants             list, create
/// /variants/{id}                   get, update, delete
/// /locations                       list, create
/// /locations/tree                  forest view
/// /locations/{id}                  get, update, delete
/// /locations/{id}/path             root-to-node path string
/// /locations/{id}/descendants      subtree listing
/// /locations/{id}/stock            balances at the location
/// /stock/transactions              apply movement, list log
/// /stock/transactions/{id}         log entry
/// /stock/total                     total stock for a subject
/// /stock/at/{location_id}          stock of a subject at a location
/// /stock/balances                  per-location balances for a subject
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .merge(locations::router())
        .merge(stock::router())
}
