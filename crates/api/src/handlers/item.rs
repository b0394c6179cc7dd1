//! Handlers for catalog items.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use brigade_core::error::CoreError;
use brigade_core::types::DbId;
use brigade_db::models::item::{CreateItem, UpdateItem};
use brigade_db::repositories::ItemRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/items
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = ItemRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/items
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateItem>,
) -> AppResult<impl IntoResponse> {
    let item = ItemRepo::create(&state.pool, &input).await?;
    tracing::info!(item_id = item.id, "Item created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// GET /api/v1/items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;
    Ok(Json(DataResponse { data: item }))
}

/// PUT /api/v1/items/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateItem>,
) -> AppResult<impl IntoResponse> {
    let item = ItemRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/items/{id}
///
/// Cascades to the item's variants; refused with 409 while the item or any
/// variant still has stock on hand.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = ItemRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Item", id }));
    }
    tracing::info!(item_id = id, "Item deleted");
    Ok(StatusCode::NO_CONTENT)
}
