use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

/// Application error taxonomy. Every fallible handler funnels into this
/// enum so the wire format and status mapping live in one place.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing input, including a duplicate registration email.
    #[error("{0}")]
    Validation(String),

    /// Credentials did not check out.
    #[error("invalid email or password")]
    Authentication,

    /// The caller is not the owner of the record they tried to mutate.
    #[error("you do not have permission to modify this record")]
    Authorization,

    /// Lookup by id or page index came up empty.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Reset token failed signature or expiry checks.
    #[error("that is an invalid or expired token")]
    Token,

    /// Anything the persistence layer refused to do.
    #[error("a database error occurred")]
    Database(#[from] DbErr),

    /// Failures outside the other categories (hashing, file storage).
    #[error("internal server error")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Token => StatusCode::BAD_REQUEST,
            AppError::Authentication => StatusCode::UNAUTHORIZED,
            AppError::Authorization => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Authentication => "AUTHENTICATION_ERROR",
            AppError::Authorization => "AUTHORIZATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Token => "TOKEN_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Full detail stays in the log; the client only sees the generic
        // message for server-side failures.
        match &self {
            AppError::Database(db_error) => error!("database error: {}", db_error),
            AppError::Internal(detail) => error!("internal error: {}", detail),
            _ => {}
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            success: false,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Map an insert/update failure onto the duplicate-email validation error
/// when the unique constraint on `guides.email` fired. The constraint is
/// the authority here; there is no racy pre-check query.
pub fn map_unique_email(err: DbErr) -> AppError {
    let message = err.to_string().to_lowercase();
    if message.contains("unique") || message.contains("constraint") {
        AppError::Validation("that email is taken, please choose a different one".to_string())
    } else {
        AppError::Database(err)
    }
}

/// Collapse `validator` output into a single user-visible message.
pub fn map_validation(errors: validator::ValidationErrors) -> AppError {
    AppError::Validation(errors.to_string().replace('\n', "; "))
}
