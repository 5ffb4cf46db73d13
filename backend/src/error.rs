//! Error handling for the BioGarden server
//!
//! Every failure reaches the client as `{ "error": { code, message, field } }`

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    // Domain conflicts
    #[error("User with email {0} already exists")]
    UserAlreadyExists(String),

    #[error("A cultivation of {crop} already exists in this project")]
    CultivationAlreadyExists { crop: String },

    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Validation failure on a single input field
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code, also used in responses
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            AppError::Validation { .. } | AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::UserAlreadyExists(_) => "USER_ALREADY_EXISTS",
            AppError::CultivationAlreadyExists { .. } => "CULTIVATION_ALREADY_EXISTS",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Internal(_) | AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                AppError::invalid(field, message)
            }
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) => match missing_field(&message) {
                Some(field) => {
                    let message = format!("{} is required", field);
                    AppError::Validation { field, message }
                }
                None => AppError::ValidationError(message),
            },
            _ => AppError::ValidationError(message),
        }
    }
}

/// Name of the absent field in a serde "missing field `x`" message
fn missing_field(message: &str) -> Option<String> {
    let rest = message.split("missing field `").nth(1)?;
    rest.split('`').next().map(str::to_string)
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new(code, "Invalid email or password"),
            ),
            AppError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, ErrorDetail::new(code, message.clone()))
            }
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail::new(code, "You do not have permission to perform this action"),
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    field: Some(field.clone()),
                    ..ErrorDetail::new(code, message.clone())
                },
            ),
            AppError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, ErrorDetail::new(code, msg.clone()))
            }
            AppError::UserAlreadyExists(_) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    field: Some("email".to_string()),
                    ..ErrorDetail::new(code, self.to_string())
                },
            ),
            AppError::CultivationAlreadyExists { .. } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    field: Some("cropId".to_string()),
                    ..ErrorDetail::new(code, self.to_string())
                },
            ),
            AppError::Conflict { resource, message } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    field: Some(resource.clone()),
                    ..ErrorDetail::new(code, message.clone())
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new(code, format!("{} not found", resource)),
            ),
            AppError::Configuration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(code, "The server is misconfigured"),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(code, "A database error occurred"),
            ),
            AppError::Internal(_) | AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(code, "An internal server error occurred"),
            ),
        };

        // Internal details stay in the log, never in the body
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::invalid("area", "Area must be positive"), StatusCode::BAD_REQUEST),
            (AppError::NotFound("Activity".to_string()), StatusCode::NOT_FOUND),
            (
                AppError::CultivationAlreadyExists {
                    crop: "Tomato".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (AppError::UserAlreadyExists("a@b.it".to_string()), StatusCode::CONFLICT),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::Internal("bad row".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_internal_detail_not_exposed() {
        let response = AppError::Internal("unknown activity type code 'pruning'".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "An internal server error occurred");
    }

    #[test]
    fn test_missing_field_name() {
        assert_eq!(
            missing_field(
                "Failed to deserialize the JSON body into the target type: missing field `actualQuantity` at line 1 column 48"
            ),
            Some("actualQuantity".to_string())
        );
        assert_eq!(missing_field("invalid type: string \"abc\", expected i32"), None);
    }

    #[test]
    fn test_conflicts_are_distinguishable() {
        let err = AppError::CultivationAlreadyExists {
            crop: "Tomato".to_string(),
        };
        assert!(matches!(err, AppError::CultivationAlreadyExists { .. }));
        assert_eq!(err.code(), "CULTIVATION_ALREADY_EXISTS");
        assert_eq!(
            err.to_string(),
            "A cultivation of Tomato already exists in this project"
        );
    }
}
