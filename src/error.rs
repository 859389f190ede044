use axum::http::StatusCode;

/// Failure kinds surfaced by the template service.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("dashboard template with ID {id} not found")]
    NotFound { id: i64 },

    #[error("user {user_id} is not authorized to access dashboard template with ID {id}")]
    Forbidden { id: i64, user_id: String },

    #[error("base template {name} not found")]
    BaseTemplateNotFound { name: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type TemplateResult<T> = Result<T, TemplateError>;

impl TemplateError {
    pub fn status(&self) -> StatusCode {
        match self {
            TemplateError::NotFound { .. } | TemplateError::BaseTemplateNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            TemplateError::Forbidden { .. } => StatusCode::FORBIDDEN,
            TemplateError::BadRequest(_) => StatusCode::BAD_REQUEST,
            TemplateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            TemplateError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}
