//! Handlers for item variants.
//!
//! Variant creation and deletion maintain the owning item's
//! `is_variant_parent` flag; see `ItemVariantRepo`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use brigade_core::error::CoreError;
use brigade_core::types::DbId;
use brigade_db::models::item_variant::{CreateItemVariant, UpdateItemVariant};
use brigade_db::repositories::{ItemRepo, ItemVariantRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/items/{id}/variants
pub async fn list_for_item(
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if ItemRepo::find_by_id(&state.pool, item_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }));
    }
    let variants = ItemVariantRepo::list_for_item(&state.pool, item_id).await?;
    Ok(Json(DataResponse { data: variants }))
}

/// POST /api/v1/items/{id}/variants
pub async fn create(
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    Json(input): Json<CreateItemVariant>,
) -> AppResult<impl IntoResponse> {
    let variant = ItemVariantRepo::create(&state.pool, item_id, &input).await?;
    tracing::info!(variant_id = variant.id, item_id, "Item variant created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: variant })))
}

/// GET /api/v1/variants/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let variant = ItemVariantRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ItemVariant",
            id,
        }))?;
    Ok(Json(DataResponse { data: variant }))
}

/// PUT /api/v1/variants/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateItemVariant>,
) -> AppResult<impl IntoResponse> {
    let variant = ItemVariantRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ItemVariant",
            id,
        }))?;
    Ok(Json(DataResponse { data: variant }))
}

/// DELETE /api/v1/variants/{id}
///
/// Refused with 409 while the variant still has stock on hand.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = ItemVariantRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ItemVariant",
            id,
        }));
    }
    tracing::info!(variant_id = id, "Item variant deleted");
    Ok(StatusCode::NO_CONTENT)
}
