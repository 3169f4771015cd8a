use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::{Value, json};

use crate::storage::StorageError;

pub const CONNECTION_ERROR: &str = "connection error";

/// Errors surfaced at the HTTP boundary.
///
/// Every variant renders as `{"message", "status", "details"}`.
#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "invalid credentials")]
    InvalidCredentials,

    #[display(fmt = "{}", _0)]
    Unauthorized(String),

    #[display(fmt = "you do not have permission to view reports")]
    PermissionDenied,

    #[display(fmt = "invalid or unrecognized token")]
    InvalidToken,

    #[display(fmt = "{}", _0)]
    BadRequest(String),

    #[display(fmt = "storage unavailable: {}", _0)]
    Storage(String),

    #[display(fmt = "{}", message)]
    Remote {
        message: String,
        status: u16,
        details: Value,
    },

    #[display(fmt = "{}", _0)]
    Internal(String),
}

impl AppError {
    pub fn remote(message: Option<String>, status: u16, details: Value) -> Self {
        AppError::Remote {
            message: message.unwrap_or_else(|| CONNECTION_ERROR.to_string()),
            status,
            details,
        }
    }

    fn details(&self) -> Value {
        match self {
            AppError::Remote { details, .. } => details.clone(),
            _ => json!([]),
        }
    }
}

impl std::error::Error for AppError {}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied => StatusCode::FORBIDDEN,
            AppError::InvalidToken | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Remote { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(json!({
            "message": self.to_string(),
            "status": status.as_u16(),
            "details": self.details(),
        }))
    }
}
