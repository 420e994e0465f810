//! Bearer token extraction

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::api::types::ApiError;

const MISSING_OR_MALFORMED: &str = "Authorization header missing or invalid format";

/// Extractor for `Authorization: Bearer <token>`
///
/// Only checks the header shape; what the token grants is up to the handler.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_bearer_token(&parts.headers).map(BearerToken)
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized(MISSING_OR_MALFORMED))?
        .to_str()
        .map_err(|_| ApiError::unauthorized(MISSING_OR_MALFORMED))?;

    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .ok_or_else(|| ApiError::unauthorized(MISSING_OR_MALFORMED))
}
