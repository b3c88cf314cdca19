use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Path not allowed: {0}")]
    PathNotAllowed(String),

    #[error("{0}")]
    Validation(String),

    #[error("{collaborator} failed: {message}")]
    ExternalCollaborator {
        collaborator: &'static str,
        message: String,
    },

    #[error("Interaction log error: {0}")]
    Logging(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),
}

impl AppError {
    pub fn chat(err: impl std::fmt::Display) -> Self {
        AppError::ExternalCollaborator {
            collaborator: "chat completion",
            message: err.to_string(),
        }
    }

    pub fn redeploy(err: impl std::fmt::Display) -> Self {
        AppError::ExternalCollaborator {
            collaborator: "redeploy",
            message: err.to_string(),
        }
    }
}

#[derive(Serialize)]
struct JsonError {
    error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::FORBIDDEN,
            AppError::PathNotAllowed(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalCollaborator { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Logging(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Chat failures surface the collaborator's own error text.
        let error = match self {
            AppError::ExternalCollaborator { message, .. } => message.clone(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(JsonError { error })
    }
}
