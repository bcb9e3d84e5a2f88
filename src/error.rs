use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use validator::ValidationErrors;

use crate::utils::validation::{field_messages, CODE_EMAIL, CODE_PHONE, CODE_REQUIRED};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Please provide a valid email address")]
    InvalidEmailFormat,

    #[error("Candidate with this email already exists.")]
    EmailAlreadyExists,

    #[error("Invalid candidate ID")]
    InvalidId,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Candidate not found")]
    NotFound,

    #[error("No file uploaded")]
    MissingFile,

    #[error("Only PDF files are allowed for CV uploads")]
    UnsupportedFileType,

    #[error("CV file exceeds the maximum size of {limit} bytes")]
    FileTooLarge { limit: usize },

    #[error("Only one CV file may be uploaded per request")]
    TooManyFiles,

    #[error("CV not found for this candidate")]
    CvNotFound,

    #[error("CV file not found on server")]
    FileNotFoundOnDisk,

    #[error("Failed to store CV file: {0}")]
    UploadFailed(#[source] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::InvalidEmailFormat
            | Error::InvalidId
            | Error::InvalidBody(_)
            | Error::MissingFile
            | Error::UnsupportedFileType
            | Error::FileTooLarge { .. }
            | Error::TooManyFiles
            | Error::Multipart(_) => StatusCode::BAD_REQUEST,
            Error::EmailAlreadyExists => StatusCode::CONFLICT,
            Error::NotFound | Error::CvNotFound | Error::FileNotFoundOnDisk => {
                StatusCode::NOT_FOUND
            }
            Error::Config(_) | Error::UploadFailed(_) | Error::Internal(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code sent as the `error` field.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(errors) => validation_code(errors),
            Error::InvalidEmailFormat => "INVALID_EMAIL_FORMAT",
            Error::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Error::InvalidId => "INVALID_ID",
            Error::InvalidBody(_) | Error::Multipart(_) => "INVALID_REQUEST_BODY",
            Error::NotFound => "CANDIDATE_NOT_FOUND",
            Error::MissingFile => "MISSING_FILE",
            Error::UnsupportedFileType => "UNSUPPORTED_FILE_TYPE",
            Error::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Error::TooManyFiles => "TOO_MANY_FILES",
            Error::CvNotFound => "CV_NOT_FOUND",
            Error::FileNotFoundOnDisk => "FILE_NOT_FOUND",
            Error::UploadFailed(_) => "UPLOAD_ERROR",
            Error::Config(_) | Error::Internal(_) | Error::Io(_) => "INTERNAL_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Error::Validation(errors) => match validation_code(errors) {
                "MISSING_REQUIRED_FIELDS" => {
                    "First name, last name, and email are required".to_string()
                }
                "INVALID_EMAIL_FORMAT" => Error::InvalidEmailFormat.to_string(),
                "INVALID_PHONE_FORMAT" => "Please provide a valid phone number".to_string(),
                _ => "Validation failed".to_string(),
            },
            Error::UploadFailed(_) => "Failed to upload CV".to_string(),
            Error::Config(_) | Error::Internal(_) | Error::Io(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Required fields win over shape errors, and email over phone.
fn validation_code(errors: &ValidationErrors) -> &'static str {
    let has = |code: &str| {
        errors
            .field_errors()
            .values()
            .any(|list| list.iter().any(|e| e.code == code))
    };
    if has(CODE_REQUIRED) {
        "MISSING_REQUIRED_FIELDS"
    } else if has(CODE_EMAIL) {
        "INVALID_EMAIL_FORMAT"
    } else if has(CODE_PHONE) {
        "INVALID_PHONE_FORMAT"
    } else {
        "VALIDATION_FAILED"
    }
}

/// Underlying text of a 5xx error, carried as a response extension so the
/// router can decide per deployment whether clients see it.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail {
    pub message: String,
    pub code: &'static str,
    pub detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let code = self.code();
        let message = self.client_message();

        let body = match &self {
            Error::Validation(errors) => json!({
                "message": message,
                "error": code,
                "details": field_messages(errors),
            }),
            _ => json!({ "message": message, "error": code }),
        };
        let mut response = (status, Json(body)).into_response();

        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
            response.extensions_mut().insert(InternalErrorDetail {
                message,
                code,
                detail: self.to_string(),
            });
        }
        response
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidBody(rejection.body_text())
    }
}
