use axum::{Json, extract::State, response::IntoResponse};

use crate::AppState;
use crate::models::response::DataResponse;

use super::identity::Identity;

/// Widget mappings keyed by `scope-module[-importName]`.
pub async fn get_widget_mapping(
    State(state): State<AppState>,
    _identity: Identity,
) -> impl IntoResponse {
    Json(DataResponse {
        data: state.service.widget_mappings(),
    })
}
