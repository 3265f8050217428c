use crate::models::SelectionError;
use crate::services::{CatalogError, GenerationError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Generation rejected: {0}")]
    Generation(#[from] GenerationError),

    #[error("{0}")]
    Selection(#[from] SelectionError),

    #[error("No catalog loaded")]
    NoCatalog,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Catalog(CatalogError::Io(ref e)) => {
                tracing::error!("Catalog I/O error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read catalog".to_string())
            }
            AppError::Catalog(_) | AppError::Generation(_) | AppError::Selection(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NoCatalog => (StatusCode::CONFLICT, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
