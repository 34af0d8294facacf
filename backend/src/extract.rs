//! Request extractors
//!
//! Validation happens at the boundary: a request body that fails to
//! deserialize or fails its `validator` rules is rejected with 422
//! before any handler logic runs.

use crate::error::ApiError;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body extractor that also runs `validator` rules
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ApiError::Validation(errors.to_string()))?;

        Ok(ValidatedJson(value))
    }
}
