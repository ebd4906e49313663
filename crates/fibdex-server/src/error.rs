//! Client-visible errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fibdex_core::ValidationError;

/// The only failure a client ever observes is a rejected index.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
        }
    }
}
