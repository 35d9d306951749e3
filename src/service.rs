#[cfg(feature = "client")]
#[allow(unused_imports)]
use serde::Deserialize;

#[cfg(feature = "server")]
#[allow(unused_imports)]
use serde::Serialize;

/// Shown whenever a provider failure carries no detail of its own.
pub const GENERIC_FAILURE: &str = "Failed to process request";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    BadRequest(Box<str>),
    #[error("Request body is too large")]
    PayloadTooLarge,
    #[error("Too many requests, please try again later.")]
    TooManyRequests,
    #[error("{}", .0.as_deref().unwrap_or(GENERIC_FAILURE))]
    Provider(Option<Box<str>>),
    #[error("The museum guide took too long to answer. Please try again.")]
    Timeout,
    #[error("Could not reach the museum guide. Please check your connection.")]
    ServiceUnavailable,
    #[error("Received an unexpected answer from the museum guide.")]
    InvalidResponse,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(any(feature = "server", feature = "client"))]
#[cfg_attr(feature = "server", derive(Serialize))]
#[cfg_attr(feature = "client", derive(Deserialize))]
struct HttpErrorBody {
    error: Box<str>,
}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Error::Provider(_) => StatusCode::BAD_GATEWAY,
            Error::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Error::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Error::InvalidResponse | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error: Box<str> = match self {
            Error::Internal(error) => {
                tracing::error!("Internal error: {:?}", error);
                GENERIC_FAILURE.into()
            }
            Error::InvalidResponse => GENERIC_FAILURE.into(),
            other => other.to_string().into(),
        };

        (status, axum::Json(HttpErrorBody { error })).into_response()
    }
}

#[cfg(feature = "client")]
impl Error {
    /// Rebuilds the server-side error from a non-success response.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<HttpErrorBody>(body)
            .ok()
            .map(|body| body.error)
            .filter(|message| !message.trim().is_empty());

        match status {
            413 => Error::PayloadTooLarge,
            429 => Error::TooManyRequests,
            400..=499 => Error::BadRequest(
                message.unwrap_or_else(|| format!("Request rejected with status {status}").into()),
            ),
            500 | 502 => Error::Provider(message),
            503 => Error::ServiceUnavailable,
            504 => Error::Timeout,
            _ => Error::InvalidResponse,
        }
    }

    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Error::Timeout
        } else if error.is_decode() {
            Error::InvalidResponse
        } else {
            tracing::error!("Transport error: {}", error);
            Error::ServiceUnavailable
        }
    }
}
