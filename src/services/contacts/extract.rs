//! Extractors that deserialize and validate request input.
//!
//! Deserialization failures (bad JSON, wrong types, unknown fields) surface
//! as validation errors, so every malformed input is a 400.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use contacts_core::{AppError, Validate, ValidationError};
use http::request::Parts;
use serde::de::DeserializeOwned;

/// JSON body deserialized as `T` and validated into `T::Output`.
pub struct ValidJson<T: Validate>(pub T::Output);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: Validate + DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationError::single("body", rejection.body_text()))?;
        Ok(Self(raw.validate()?))
    }
}

/// Query string deserialized as `T` and validated into `T::Output`.
pub struct ValidQuery<T: Validate>(pub T::Output);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: Validate + DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationError::single("query", rejection.body_text()))?;
        Ok(Self(raw.validate()?))
    }
}
