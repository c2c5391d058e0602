use crate::recorder::RecordError;
use crate::storage::StoreError;
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn unavailable(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::unavailable(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Anything that stops the server from coming up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open page view store: {0}")]
    Store(#[from] StoreError),
    #[error("failed to build country lookup client: {0}")]
    Locator(#[from] RecordError),
}
