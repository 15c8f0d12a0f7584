use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Already checked in today")]
    DuplicateCheckIn,
    #[error("No check-in record found for today")]
    NoCheckInRecord,
    #[error("Already checked out today")]
    AlreadyCheckedOut,
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("User already exists with this email")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T, E = AttendanceError> = std::result::Result<T, E>;

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::DuplicateCheckIn
            | Self::NoCheckInRecord
            | Self::AlreadyCheckedOut
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::DataIntegrity(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            return HttpResponse::build(status).json(json!({
                "message": "Something went wrong, Contact with system admin"
            }));
        }

        HttpResponse::build(status).json(json!({ "message": self.to_string() }))
    }
}
