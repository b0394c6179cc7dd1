//! Route definitions for the stock ledger.

use axum::routing::get;
use axum::Router;

use crate::handlers::stock;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/stock/transactions",
            get(stock::list_transactions).post(stock::apply_transaction),
        )
        .route("/stock/transactions/{id}", get(stock::get_transaction))
        .route("/stock/total", get(stock::total_stock))
        .route("/stock/at/{location_id}", get(stock::stock_at))
        .route("/stock/balances", get(stock::balances_for))
}
