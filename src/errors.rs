use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::DbErr;
use validator::ValidationErrors;

/// Erreur unique renvoyée par les routes et les services
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid data provided: {0}")]
    InvalidPayload(String),

    #[error("Invalid data provided: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl std::fmt::Display) -> Self {
        Self::Internal(msg.to_string())
    }

    fn body(&self) -> serde_json::Value {
        match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => serde_json::json!({ "error": msg }),
            Self::InvalidPayload(msg) => serde_json::json!({
                "error": "Invalid data provided",
                "message": msg
            }),
            Self::Validation(errors) => serde_json::json!({
                "error": "Invalid data provided",
                "details": errors
            }),
            Self::Database(_) | Self::Internal(_) => serde_json::json!({
                "error": "Internal server error"
            }),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidPayload(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            // le détail reste dans les logs, jamais dans la réponse
            tracing::error!(error = %self, "request failed");
        }

        HttpResponse::build(self.status_code()).json(self.body())
    }
}
