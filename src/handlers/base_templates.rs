use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::AppState;
use crate::models::response::ListResponse;

use super::error::ApiResult;
use super::identity::Identity;

pub async fn list_base_templates(
    State(state): State<AppState>,
    _identity: Identity,
) -> impl IntoResponse {
    Json(ListResponse::new(state.service.base_templates()))
}

pub async fn get_base_template(
    State(state): State<AppState>,
    _identity: Identity,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let base = state.service.base_template(&name)?;
    Ok(Json(base))
}

/// Creates a personal copy of the base. Exposed on GET for client compatibility.
pub async fn fork_base_template(
    State(state): State<AppState>,
    identity: Identity,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let template = state.service.fork_base(&name, &identity.user_id)?;
    Ok(Json(template))
}
