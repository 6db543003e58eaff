/// Request extractors with failures mapped into [`ApiError`]
///
/// Axum's own `Json` rejection renders as a framework plain-text response
/// (422); every error this API produces goes through the JSON error body
/// instead, so malformed request bodies are funneled through
/// [`ApiError::BadRequest`] here.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiError;

/// JSON body extractor and response wrapper
///
/// Extraction failures (missing content type, syntax errors, shape
/// mismatches) become a 400 with the rejection's message. As a response it
/// serializes exactly like `axum::Json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
