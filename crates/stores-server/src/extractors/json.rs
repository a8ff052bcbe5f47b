//! JSON body extractor with field validation

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use stores_core::{ServiceError, Validate};

/// Deserializes `T` and runs its [`Validate`] impl
///
/// Handlers receive the checked domain input; field errors are rejected
/// with 422 before the handler runs.
pub struct ValidatedJson<T: Validate>(pub T::Output);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await?;
        let output = payload.validate().map_err(ServiceError::from)?;
        Ok(ValidatedJson(output))
    }
}
