//! JSON extractor with validation through the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor that runs [`Validate`] before the handler sees the body.
///
/// Malformed JSON rejects with [`AppError::JsonExtractorRejection`]; field
/// violations reject with [`AppError::ValidationError`]. Both render as 400.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::extractors::ValidatedJson;
///
/// async fn create(ValidatedJson(payload): ValidatedJson<CreateCategory>) -> String {
///     format!("Creating category: {:?}", payload.name)
/// }
///
/// let app = Router::new().route("/categories", post(create));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
