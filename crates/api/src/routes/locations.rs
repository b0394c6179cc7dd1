//! Route definitions for the storage location tree.

use axum::routing::get;
use axum::Router;

use crate::handlers::{location, stock};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(location::list).post(location::create))
        .route("/locations/tree", get(location::tree))
        .route(
            "/locations/{id}",
            get(location::get_by_id)
                .put(location::update)
                .delete(location::delete),
        )
        .route("/locations/{id}/path", get(location::full_path))
        .route("/locations/{id}/descendants", get(location::descendants))
        .route("/locations/{id}/stock", get(stock::balances_at))
}
