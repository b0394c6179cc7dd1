//! Handlers for the stock ledger: applying movements and reading balances.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use brigade_core::error::CoreError;
use brigade_core::ledger::TransactionRequest;
use brigade_core::subject::Subject;
use brigade_core::types::DbId;
use brigade_db::models::stock::{CreateStockTransaction, StockLevel, TransactionListParams};
use brigade_db::repositories::{LedgerRepo, StockRepo};

use crate::actor::Actor;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters selecting a subject: exactly one of the two ids.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectQuery {
    pub item_id: Option<DbId>,
    pub variant_id: Option<DbId>,
}

impl SubjectQuery {
    fn subject(&self) -> Result<Subject, CoreError> {
        Subject::from_ids(self.item_id, self.variant_id)
    }
}

/// POST /api/v1/stock/transactions
///
/// Apply a movement. The committed log row is returned; on any validation
/// or stock failure nothing is persisted.
pub async fn apply_transaction(
    State(state): State<AppState>,
    Actor(actor_id): Actor,
    Json(input): Json<CreateStockTransaction>,
) -> AppResult<impl IntoResponse> {
    let subject = Subject::from_ids(input.item_id, input.variant_id)?;
    let request = TransactionRequest {
        transaction_type: input.transaction_type,
        subject,
        source_id: input.source_id,
        target_id: input.target_id,
        quantity: input.quantity,
        note: input.note,
        actor_id,
    };

    let record = LedgerRepo::apply(&state.pool, &request).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/stock/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionListParams>,
) -> AppResult<impl IntoResponse> {
    let records = LedgerRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/stock/transactions/{id}
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = LedgerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "StockTransaction",
            id,
        }))?;
    Ok(Json(DataResponse { data: record }))
}

/// GET /api/v1/stock/total?item_id=|variant_id=
pub async fn total_stock(
    State(state): State<AppState>,
    Query(query): Query<SubjectQuery>,
) -> AppResult<impl IntoResponse> {
    let quantity = StockRepo::total_stock(&state.pool, query.subject()?).await?;
    Ok(Json(DataResponse {
        data: StockLevel { quantity },
    }))
}

/// GET /api/v1/stock/at/{location_id}?item_id=|variant_id=
pub async fn stock_at(
    State(state): State<AppState>,
    Path(location_id): Path<DbId>,
    Query(query): Query<SubjectQuery>,
) -> AppResult<impl IntoResponse> {
    let quantity = StockRepo::stock_at(&state.pool, query.subject()?, location_id).await?;
    Ok(Json(DataResponse {
        data: StockLevel { quantity },
    }))
}

/// GET /api/v1/stock/balances?item_id=|variant_id=
///
/// All locations holding the subject, nonzero balances only.
pub async fn balances_for(
    State(state): State<AppState>,
    Query(query): Query<SubjectQuery>,
) -> AppResult<impl IntoResponse> {
    let subject = query.subject()?;
    // Distinguish "unknown subject" from "no stock anywhere".
    StockRepo::total_stock(&state.pool, subject).await?;
    let balances = StockRepo::balances_for(&state.pool, subject).await?;
    Ok(Json(DataResponse { data: balances }))
}

/// GET /api/v1/locations/{id}/stock
///
/// All subjects held at the location, nonzero balances only.
pub async fn balances_at(
    State(state): State<AppState>,
    Path(location_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let balances = StockRepo::balances_at(&state.pool, location_id).await?;
    Ok(Json(DataResponse { data: balances }))
}
