use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authorization header missing")]
    MissingAuthorization,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal server error during authentication")]
    AuthStorage,

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Password error: {0}")]
    Password(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingAuthorization => StatusCode::UNAUTHORIZED,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::AuthStorage => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::MissingAuthorization => HttpResponse::Unauthorized()
                .append_header(("WWW-Authenticate", r#"Basic realm="Census App""#))
                .json(json!({ "error": "Authorization header missing" })),
            AppError::InvalidCredentials => {
                HttpResponse::Unauthorized().json(json!({ "error": "Invalid credentials" }))
            }
            AppError::AuthStorage => HttpResponse::InternalServerError()
                .json(json!({ "error": "Internal server error during authentication" })),
            AppError::Validation(details) => HttpResponse::BadRequest()
                .json(json!({ "error": "Validation failed", "details": details })),
            AppError::Conflict(message) => {
                HttpResponse::Conflict().json(json!({ "error": message }))
            }
            AppError::NotFound(message) => {
                HttpResponse::NotFound().json(json!({ "error": message }))
            }
            AppError::Password(detail) => {
                log::error!("Password handling failed: {}", detail);
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Internal server error" }))
            }
            AppError::Database(e) => {
                log::error!("Database operation failed: {}", e);
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Database operation failed" }))
            }
        }
    }
}
