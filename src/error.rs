use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PortalError {
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("session expired or token invalid")]
    SessionExpired,

    #[error("student record not found")]
    StudentNotFound,

    #[error("access denied for this role")]
    Forbidden,

    #[error("password hashing error: {0}")]
    PasswordHash(String),

    #[error("Actor error: {0}")]
    ActorError(String),
}

impl IntoResponse for PortalError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            PortalError::InvalidCredentials => {
                let body = ApiErrorBody {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid email or password.".to_string(),
                };
                (StatusCode::UNAUTHORIZED, body)
            }
            PortalError::EmailTaken => {
                let body = ApiErrorBody {
                    code: "EMAIL_TAKEN".to_string(),
                    message: "An account with this email already exists.".to_string(),
                };
                (StatusCode::CONFLICT, body)
            }
            PortalError::SessionExpired => {
                let body = ApiErrorBody {
                    code: "SESSION_EXPIRED".to_string(),
                    message: "Session expired. Please login again.".to_string(),
                };
                (StatusCode::UNAUTHORIZED, body)
            }
            PortalError::StudentNotFound => {
                let body = ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: "Student record not found.".to_string(),
                };
                (StatusCode::NOT_FOUND, body)
            }
            PortalError::Forbidden => {
                let body = ApiErrorBody {
                    code: "FORBIDDEN".to_string(),
                    message: "You do not have access to this resource.".to_string(),
                };
                (StatusCode::FORBIDDEN, body)
            }
            PortalError::Json(_) => {
                let body = ApiErrorBody {
                    code: "BAD_REQUEST".to_string(),
                    message: "Malformed request payload.".to_string(),
                };
                (StatusCode::BAD_REQUEST, body)
            }
            PortalError::Database(_)
            | PortalError::Io(_)
            | PortalError::PasswordHash(_)
            | PortalError::ActorError(_) => {
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
