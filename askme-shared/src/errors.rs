use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::{ApiErrorResponse, FieldErrors};

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Account and session errors
/// - E2xxx: Profile and answer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,

    // Account (E1xxx)
    InvalidCredentials,
    SessionExpired,
    SessionInvalid,

    // Profile (E2xxx)
    ProfileNotFound,
    QuestionNotFound,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",

            // Account
            Self::InvalidCredentials => "E1001",
            Self::SessionExpired => "E1002",
            Self::SessionInvalid => "E1003",

            // Profile
            Self::ProfileNotFound => "E2001",
            Self::QuestionNotFound => "E2002",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound | Self::ProfileNotFound | Self::QuestionNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::InvalidCredentials | Self::SessionExpired
            | Self::SessionInvalid => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known { code: ErrorCode, message: String },

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation failed: {0}")]
    Validation(FieldErrors),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The error code the response will carry.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Known { code, .. } => *code,
            AppError::Database(diesel::result::Error::NotFound) => ErrorCode::NotFound,
            AppError::Database(_) => ErrorCode::InternalError,
            AppError::Validation(_) => ErrorCode::ValidationError,
        }
    }

    /// Field errors when this is a rejected form, `None` otherwise.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message } => {
                let status = code.status_code();
                if status.is_server_error() {
                    tracing::error!(code = code.code(), "{message}");
                }
                (status, ApiErrorResponse::new(code.code(), message))
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                match err {
                    diesel::result::Error::NotFound => (
                        StatusCode::NOT_FOUND,
                        ApiErrorResponse::new("E0003", "resource not found"),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new("E0001", "database error"),
                    ),
                }
            }
            AppError::Validation(errors) => {
                let code = ErrorCode::ValidationError;
                let details = serde_json::to_value(errors).unwrap_or(serde_json::Value::Null);
                (
                    code.status_code(),
                    ApiErrorResponse::new(code.code(), "form validation failed").with_details(details),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_render_as_unprocessable_with_field_details() {
        let mut errors = FieldErrors::new();
        errors.add("zip_code", "invalid_zip_format", "Zip code must be exactly 5 digits");
        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn invalid_credentials_is_unauthorized() {
        let err = AppError::new(ErrorCode::InvalidCredentials, "Invalid username or password");
        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        let err = AppError::from(diesel::result::Error::NotFound);
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_codes_keep_their_ranges() {
        assert_eq!(ErrorCode::ValidationError.code(), "E0002");
        assert_eq!(ErrorCode::InvalidCredentials.code(), "E1001");
        assert_eq!(ErrorCode::QuestionNotFound.code(), "E2002");
    }
}
