//! Handlers for the storage location tree.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use brigade_core::error::CoreError;
use brigade_core::types::DbId;
use brigade_db::models::storage_location::{
    CreateStorageLocation, LocationTreeNode, StorageLocation, UpdateStorageLocation,
};
use brigade_db::repositories::StorageLocationRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/locations
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let locations = StorageLocationRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: locations }))
}

/// GET /api/v1/locations/tree
///
/// The whole forest with children grouped under their parents.
pub async fn tree(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let locations = StorageLocationRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse {
        data: build_tree(locations),
    }))
}

/// POST /api/v1/locations
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateStorageLocation>,
) -> AppResult<impl IntoResponse> {
    let location = StorageLocationRepo::create(&state.pool, &input).await?;
    tracing::info!(location_id = location.id, "Storage location created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: location })))
}

/// GET /api/v1/locations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let location = StorageLocationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse { data: location }))
}

/// PUT /api/v1/locations/{id}
///
/// Full replace; reparenting into the location's own subtree fails with a
/// validation error.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStorageLocation>,
) -> AppResult<impl IntoResponse> {
    let location = StorageLocationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(not_found(id))?;
    tracing::info!(location_id = id, "Storage location updated");
    Ok(Json(DataResponse { data: location }))
}

/// DELETE /api/v1/locations/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = StorageLocationRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(not_found(id));
    }
    tracing::info!(location_id = id, "Storage location deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/locations/{id}/path
pub async fn full_path(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let path = StorageLocationRepo::full_path(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse { data: path }))
}

/// GET /api/v1/locations/{id}/descendants
pub async fn descendants(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let nodes = StorageLocationRepo::descendants(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse { data: nodes }))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "StorageLocation",
        id,
    })
}

/// Group a flat location list into a forest. Children keep the name order
/// of the flat listing.
fn build_tree(locations: Vec<StorageLocation>) -> Vec<LocationTreeNode> {
    let mut by_parent: HashMap<Option<DbId>, Vec<StorageLocation>> = HashMap::new();
    for location in locations {
        by_parent.entry(location.parent_id).or_default().push(location);
    }
    attach_children(None, &mut by_parent)
}

fn attach_children(
    parent: Option<DbId>,
    by_parent: &mut HashMap<Option<DbId>, Vec<StorageLocation>>,
) -> Vec<LocationTreeNode> {
    by_parent
        .remove(&parent)
        .unwrap_or_default()
        .into_iter()
        .map(|location| {
            let children = attach_children(Some(location.id), by_parent);
            LocationTreeNode { location, children }
        })
        .collect()
}
