use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::{StatusCode, header},
};
use serde::de::DeserializeOwned;

use crate::service;

/// Request body accepted as JSON or as an URL-encoded form. Every rejection
/// is reported through [`service::Error`] so clients always get `{ error }`.
pub struct ApiPayload<T>(pub T);

impl<S, T> FromRequest<S> for ApiPayload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = service::Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            Form::<T>::from_request(request, state)
                .await
                .map(|Form(value)| Self(value))
                .map_err(|rejection| reject(rejection.status(), rejection.body_text()))
        } else {
            Json::<T>::from_request(request, state)
                .await
                .map(|Json(value)| Self(value))
                .map_err(|rejection| reject(rejection.status(), rejection.body_text()))
        }
    }
}

fn reject(status: StatusCode, detail: String) -> service::Error {
    tracing::warn!(%status, "Rejected request body: {}", detail);
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        service::Error::PayloadTooLarge
    } else {
        service::Error::BadRequest(detail.into())
    }
}
