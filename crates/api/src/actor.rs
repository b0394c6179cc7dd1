//! Actor identity extraction.
//!
//! Authentication happens upstream; the authenticated member id reaches
//! this service as an opaque `x-actor-id` header and is recorded on
//! movement transactions for the audit trail only. No permission decisions
//! are made here.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use brigade_core::types::DbId;

use crate::error::AppError;

/// Header carrying the authenticated member id, set by the upstream proxy.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Optional actor identity for audit fields.
#[derive(Debug, Clone, Copy)]
pub struct Actor(pub Option<DbId>);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACTOR_HEADER) else {
            return Ok(Actor(None));
        };
        let id = value
            .to_str()
            .ok()
            .and_then(|s| s.parse::<DbId>().ok())
            .ok_or_else(|| {
                AppError::BadRequest(format!("{ACTOR_HEADER} must be a numeric member id"))
            })?;
        Ok(Actor(Some(id)))
    }
}
