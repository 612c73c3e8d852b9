//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion. Handlers never catch
//! locally; every failure funnels through `IntoResponse` below.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{ApplicationStatus, JobPostStatus, UserStatus};

/// A state machine refused a move between two states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Application(ApplicationStatus, ApplicationStatus),
    JobPost(JobPostStatus, JobPostStatus),
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::Application(from, to) => write!(f, "'{}' to '{}'", from, to),
            Transition::JobPost(from, to) => write!(f, "'{}' to '{}'", from, to),
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is {0}")]
    AccountInactive(UserStatus),

    #[error("Account is temporarily locked after too many failed sign-in attempts")]
    AccountLocked,

    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    // Workflow
    #[error("You have already applied for this job")]
    DuplicateApplication,

    #[error("Job post is already approved and published")]
    AlreadyApproved,

    #[error("Cannot move from {0}")]
    InvalidTransition(Transition),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Too many requests, please try again later")]
    RateLimited,

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Upstream service error")]
    Upstream { service: &'static str, body: String },

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHENTICATED",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::ExpiredToken => "EXPIRED_TOKEN",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::AccountInactive(_) => "ACCOUNT_INACTIVE",
            AppError::AccountLocked => "ACCOUNT_LOCKED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::DuplicateApplication => "DUPLICATE_APPLICATION",
            AppError::AlreadyApproved => "ALREADY_APPROVED",
            AppError::InvalidTransition(_) => "INVALID_TRANSITION",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::RateLimited => "RATE_LIMITED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Upstream { .. } => "UPSTREAM_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized
            | AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::AccountInactive(_) => StatusCode::FORBIDDEN,
            AppError::AccountLocked => StatusCode::LOCKED,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::InvalidTransition(_) => StatusCode::CONFLICT,
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::DuplicateApplication
            | AppError::AlreadyApproved => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Upstream { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Upstream { service, body } => {
                tracing::error!(service = %service, body = %body, "Upstream service failed");
                format!("The {} service failed", service)
            }
            _ => self.to_string(),
        }
    }

    /// Upstream failures carry the remote body so clients can surface it.
    fn details(&self) -> Option<String> {
        match self {
            AppError::Upstream { body, .. } => Some(body.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            code: self.code(),
            message: self.user_message(),
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            JwtErrorKind::ExpiredSignature => AppError::ExpiredToken,
            JwtErrorKind::InvalidToken
            | JwtErrorKind::InvalidSignature
            | JwtErrorKind::InvalidAlgorithm
            | JwtErrorKind::InvalidAlgorithmName
            | JwtErrorKind::ImmatureSignature
            | JwtErrorKind::MissingRequiredClaim(_)
            | JwtErrorKind::Base64(_)
            | JwtErrorKind::Json(_)
            | JwtErrorKind::Utf8(_) => AppError::InvalidToken,
            _ => AppError::Internal(format!("JWT error: {}", err)),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        AppError::NotFound(entity.into())
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
