//! HTTP error handling and response types.
//!
//! Every failure is rendered as `{"error": "<message>"}`. Only client input
//! problems and unknown stations are described to the caller; everything
//! else is logged and reported as a generic internal error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::params::ParamError;
use crate::db::repository::RepositoryError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const STATION_NOT_FOUND_MESSAGE: &str = "Station not found";

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid query parameter
    BadRequest(String),
    /// Repository error; only `NotFound` is described to the client
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => {
                warn!(error = %msg, "Rejected request parameters");
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Repository(e) if e.is_not_found() => {
                warn!(error = %e, "Lookup failed");
                (StatusCode::NOT_FOUND, STATION_NOT_FOUND_MESSAGE.to_string())
            }
            AppError::Repository(e) => {
                error!(error = %e, "Repository failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(ApiError::new(message))).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<ParamError> for AppError {
    fn from(err: ParamError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
