//! Custom Axum extractors that reject with [`AppError`], so malformed
//! requests get the same `{"erro": ...}` body as every other failure.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, Resource};

const BODY_REQUIRED: &str = "Dados JSON são obrigatórios";
const BODY_INVALID: &str = "Dados JSON inválidos";

/// A JSON object body.
///
/// A missing body, unparseable JSON, a non-object or an empty object are all
/// rejected as "body required"; an object whose fields have the wrong types
/// is rejected as "invalid". Content-Type is not checked.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::Validation(BODY_REQUIRED))?;

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|_| AppError::Validation(BODY_REQUIRED))?;
        match &value {
            Value::Object(fields) if !fields.is_empty() => {}
            _ => return Err(AppError::Validation(BODY_REQUIRED)),
        }

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|_| AppError::Validation(BODY_INVALID))
    }
}

/// An integer id taken from the path. Anything else is an unknown resource.
pub struct ResourceId(pub i64);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound(Resource::Endpoint))?;
        Ok(Self(id))
    }
}
