use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    InvalidPassword,
    WrongAnswer,
    UnsupportedMediaKind,
    Unauthenticated,
    Validation(String),
    AlreadyExists(String),
    /// Unexpected store or provider failure. The detail is logged, never returned.
    OperationFailed(String),
}

impl AppError {
    /// Message exposed to API clients.
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::InvalidPassword => "Invalid password".to_string(),
            AppError::WrongAnswer => "Wrong answer".to_string(),
            AppError::UnsupportedMediaKind => "Only movies are supported".to_string(),
            AppError::Unauthenticated => "Unauthenticated".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::AlreadyExists(msg) => msg.clone(),
            AppError::OperationFailed(_) => "Operation failed".to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidPassword => write!(f, "Invalid password"),
            AppError::WrongAnswer => write!(f, "Wrong recovery answer"),
            AppError::UnsupportedMediaKind => write!(f, "Unsupported media kind"),
            AppError::Unauthenticated => write!(f, "Unauthenticated"),
            AppError::Validation(msg) => write!(f, "Invalid request: {}", msg),
            AppError::AlreadyExists(msg) => write!(f, "Already exists: {}", msg),
            AppError::OperationFailed(msg) => write!(f, "Operation failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidPassword => StatusCode::FORBIDDEN,
            AppError::WrongAnswer => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaKind => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::OperationFailed(detail) = self {
            log::error!("❌ {}", detail);
        }
        HttpResponse::build(self.status_code()).json(MessageResponse::new(self.public_message()))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        if is_duplicate_key(&e) {
            return AppError::AlreadyExists("Record already exists".to_string());
        }
        AppError::OperationFailed(format!("Database error: {}", e))
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        AppError::OperationFailed(format!("Serialization error: {}", e))
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => false,
    }
}
