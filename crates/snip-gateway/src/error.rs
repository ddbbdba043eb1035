use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use snip_analytics::AnalyticsError;
use snip_core::{ShortenerError, StorageError};
use snip_redirector::RedirectError;
use thiserror::Error;
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, AppError>;

/// Every way a request can fail, each bound to one status code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    DuplicateCode(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Expired(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::DuplicateCode(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Expired(_) => StatusCode::GONE,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::DuplicateCode(_) => "duplicate_code",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::Expired(_) => "expired",
            Self::Unavailable(_) => "storage_unavailable",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        if err.is_unavailable() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        match err {
            ShortenerError::DuplicateCode(code) => {
                Self::DuplicateCode(format!("short code already exists: {code}"))
            }
            ShortenerError::InvalidUrl(_)
            | ShortenerError::InvalidShortCode(_)
            | ShortenerError::InvalidExpiration(_) => Self::BadRequest(err.to_string()),
            ShortenerError::PasswordHash(_) => Self::Internal(err.to_string()),
            ShortenerError::Storage(err) => err.into(),
        }
    }
}

impl From<RedirectError> for AppError {
    fn from(err: RedirectError) -> Self {
        match err {
            RedirectError::NotFound(_) => Self::NotFound(err.to_string()),
            RedirectError::Expired(_) => Self::Expired(err.to_string()),
            RedirectError::Unauthorized(_) => Self::Unauthorized(err.to_string()),
            RedirectError::Storage(err) => err.into(),
        }
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::NotFound(_) => Self::NotFound(err.to_string()),
            AnalyticsError::Storage(err) => err.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(message) => error!(message = %message, "request failed"),
            Self::Unavailable(message) => warn!(message = %message, "storage unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
