use axum::{
    Json,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::error::TemplateError;
use crate::models::response::ErrorResponse;

/// Handler error. Service failures, bad path parameters and unknown routes
/// render the JSON error envelope; an unparseable body or a bad identity
/// header renders plain text.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidPath(String),

    #[error("route not found")]
    RouteNotFound,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Template(err) => {
                let status = err.status();
                let body = ErrorResponse::single(status.as_u16(), err.public_message());
                (status, Json(body)).into_response()
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::InvalidPath(message) => envelope(StatusCode::BAD_REQUEST, message),
            ApiError::RouteNotFound => envelope(StatusCode::NOT_FOUND, self.to_string()),
        }
    }
}

fn envelope(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse::single(status.as_u16(), message))).into_response()
}

/// Fallback for requests that match no route.
pub async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    tracing::debug!(%method, %uri, "no route matched");
    ApiError::RouteNotFound
}
