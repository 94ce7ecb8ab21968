//! JSON extractor that reports decoding failures as `AppError::InvalidPayload`

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

pub struct PayloadJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for PayloadJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(PayloadJson(value)),
            Err(rejection) => {
                let reason = describe_rejection(&rejection);
                tracing::debug!(status = %rejection.status(), reason = %reason, "Rejected request body");
                Err(AppError::InvalidPayload(reason))
            }
        }
    }
}

fn describe_rejection(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(err) => err.body_text(),
        JsonRejection::JsonSyntaxError(err) => err.body_text(),
        JsonRejection::MissingJsonContentType(_) => {
            "expected request with `Content-Type: application/json`".to_string()
        }
        JsonRejection::BytesRejection(err) => err.body_text(),
        other => other.body_text(),
    }
}
