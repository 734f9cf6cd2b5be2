use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::constants::API_NAME;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidBody(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Store failures are logged here and never leaked to the client.
        let error_message = match self {
            AppError::Database(e) => {
                tracing::error!("{} Database error: {}", API_NAME, e);
                "Internal server error".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("{} Internal error: {:#}", API_NAME, e);
                "Internal server error".to_string()
            }
            AppError::InvalidBody(rejection) => {
                tracing::warn!("{} Invalid request body: {}", API_NAME, rejection.body_text());
                "Invalid JSON body".to_string()
            }
            AppError::Validation(msg) => {
                tracing::warn!("{} Validation error: {}", API_NAME, msg);
                msg
            }
            AppError::NotFound(msg) => {
                tracing::warn!("{} Not found: {}", API_NAME, msg);
                msg
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}
