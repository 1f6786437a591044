use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::utils::error::ConfigError;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid merge options")]
    InvalidOptions {
        #[from]
        source: ConfigError,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        let details = match &error {
            ValidationError::InvalidOptions { source } => format!("{error}: {source}"),
        };
        AppError::BadRequest(details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Bad Request".to_string(),
                Some(msg),
            ),
        };

        let mut error_response = ErrorResponse::new(error_message);
        if let Some(details) = details {
            error_response = error_response.with_details(details);
        }

        (status, Json(error_response)).into_response()
    }
}
