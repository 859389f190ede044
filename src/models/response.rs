//! Response envelopes shared by the handlers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMeta {
    pub count: usize,
}

/// `{ "data": [...], "meta": { "count": n } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: ListMeta,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            data,
            meta: ListMeta { count },
        }
    }
}

/// `{ "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: u16,
    pub message: String,
}

/// `{ "errors": [ { "code": 404, "message": "..." } ] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorPayload>,
}

impl ErrorResponse {
    pub fn single(code: u16, message: impl Into<String>) -> Self {
        Self {
            errors: vec![ErrorPayload {
                code,
                message: message.into(),
            }],
        }
    }
}
