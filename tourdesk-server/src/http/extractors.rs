//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use super::error::ApiError;
use crate::models::ValidationError;

/// Natural-key query parameters, rejected as a validation error
pub struct KeyQuery<K>(pub K);

impl<K, S> FromRequestParts<S> for KeyQuery<K>
where
    K: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<K>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::Validation(ValidationError::InvalidQuery(e.body_text())))?;
        Ok(Self(params))
    }
}

/// Raw JSON request body, validated against a table later
pub struct JsonBody(pub JsonValue);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<JsonValue>::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(ValidationError::InvalidBody(e.body_text())))?;
        Ok(Self(body))
    }
}
