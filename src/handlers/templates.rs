use axum::{
    Json,
    extract::{FromRequestParts, Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
};

use crate::AppState;
use crate::models::response::ListResponse;
use crate::models::template::{ListTemplatesParams, UpdateTemplateRequest};

use super::error::{ApiError, ApiResult};
use super::identity::Identity;

/// Numeric template id from the `{id}` path segment.
pub struct TemplateId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for TemplateId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::warn!("rejected template id: {e}");
                ApiError::InvalidPath(e.body_text())
            })?;
        Ok(TemplateId(id))
    }
}

pub async fn list_templates(
    State(state): State<AppState>,
    identity: Identity,
    Query(params): Query<ListTemplatesParams>,
) -> ApiResult<impl IntoResponse> {
    let dashboard_type = params.dashboard_type.as_deref().filter(|t| !t.is_empty());
    let outcome = state
        .service
        .list_for_user(&identity.user_id, dashboard_type)?;
    let status = outcome.status();
    Ok((status, Json(ListResponse::new(outcome.into_templates()))))
}

pub async fn get_template(
    State(state): State<AppState>,
    identity: Identity,
    TemplateId(id): TemplateId,
) -> ApiResult<impl IntoResponse> {
    let template = state.service.get_by_id(id, &identity.user_id)?;
    Ok(Json(template))
}

pub async fn update_template(
    State(state): State<AppState>,
    identity: Identity,
    TemplateId(id): TemplateId,
    body: Result<Json<UpdateTemplateRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body.map_err(|e| {
        tracing::warn!(template_id = id, "rejected template update body: {e}");
        ApiError::BadRequest(e.body_text())
    })?;
    let template = state
        .service
        .update_by_id(id, req.template_config, &identity.user_id)?;
    Ok(Json(template))
}

pub async fn delete_template(
    State(state): State<AppState>,
    identity: Identity,
    TemplateId(id): TemplateId,
) -> ApiResult<impl IntoResponse> {
    state.service.delete_by_id(id, &identity.user_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn copy_template(
    State(state): State<AppState>,
    identity: Identity,
    TemplateId(id): TemplateId,
) -> ApiResult<impl IntoResponse> {
    let template = state.service.copy_by_id(id, &identity.user_id)?;
    Ok(Json(template))
}

pub async fn set_default_template(
    State(state): State<AppState>,
    identity: Identity,
    TemplateId(id): TemplateId,
) -> ApiResult<impl IntoResponse> {
    let template = state.service.set_default_by_id(id, &identity.user_id)?;
    Ok(Json(template))
}

pub async fn reset_template(
    State(state): State<AppState>,
    identity: Identity,
    TemplateId(id): TemplateId,
) -> ApiResult<impl IntoResponse> {
    let template = state.service.reset_by_id(id, &identity.user_id)?;
    Ok(Json(template))
}
