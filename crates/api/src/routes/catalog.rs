//! Route definitions for the catalog: categories, items, and variants.

use axum::routing::get;
use axum::Router;

use crate::handlers::{category, item, item_variant};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(category::list).post(category::create))
        .route(
            "/categories/{id}",
            get(category::get_by_id)
                .put(category::update)
                .delete(category::delete),
        )
        .route("/items", get(item::list).post(item::create))
        .route(
            "/items/{id}",
            get(item::get_by_id).put(item::update).delete(item::delete),
        )
        .route(
            "/items/{id}/variants",
            get(item_variant::list_for_item).post(item_variant::create),
        )
        .route(
            "/variants/{id}",
            get(item_variant::get_by_id)
                .put(item_variant::update)
                .delete(item_variant::delete),
        )
}
