//! Caller identity from the `x-rh-identity` header.
//!
//! The upstream gateway authenticates the request and forwards the identity
//! document as base64-encoded JSON. Only `identity.user.user_id` is consumed.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::Engine;
use serde::Deserialize;

use super::error::ApiError;

pub const IDENTITY_HEADER: &str = "x-rh-identity";

const ENGINE: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

#[derive(Debug, Deserialize)]
pub struct XRhIdentity {
    pub identity: IdentityDocument,
}

#[derive(Debug, Deserialize)]
pub struct IdentityDocument {
    #[serde(default)]
    pub org_id: String,
    pub user: IdentityUser,
}

#[derive(Debug, Deserialize)]
pub struct IdentityUser {
    pub user_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("missing {IDENTITY_HEADER} header")]
    Missing,
    #[error("header is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("header is not a valid identity document: {0}")]
    Document(#[from] serde_json::Error),
    #[error("identity has no user id")]
    EmptyUserId,
}

impl XRhIdentity {
    pub fn decode(header: &str) -> Result<Self, IdentityError> {
        let raw = ENGINE.decode(header.trim())?;
        let decoded: XRhIdentity = serde_json::from_slice(&raw)?;
        if decoded.identity.user.user_id.trim().is_empty() {
            return Err(IdentityError::EmptyUserId);
        }
        Ok(decoded)
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

fn identity_from_parts(parts: &Parts) -> Result<Identity, IdentityError> {
    let header = parts
        .headers
        .get(IDENTITY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or(IdentityError::Missing)?;
    let decoded = XRhIdentity::decode(header)?;
    tracing::debug!(org_id = %decoded.identity.org_id, "decoded caller identity");
    Ok(Identity {
        user_id: decoded.identity.user.user_id,
    })
}

impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_parts(parts).map_err(|e| {
            tracing::warn!("failed to decode identity: {e}");
            ApiError::BadRequest("Invalid identity header".to_string())
        })
    }
}
