//! Unified application error types.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. Errors that reach a client carry an
//! [`ErrorCode`], a stable identifier the frontend can switch on.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// The caller is not signed in or presented a bad credential.
    Unauthorized,
    /// The caller is signed in but lacks the required role.
    Forbidden,
    /// Input validation failed.
    Validation,
    /// A uniqueness constraint would be violated.
    Conflict,
    /// The request is well-formed but cannot be applied in the current state.
    BadRequest,
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A cache error occurred.
    Cache,
    /// An object storage error occurred.
    Storage,
    /// Outbound mail delivery failed.
    Mail,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// The service is temporarily unavailable.
    ServiceUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Cache => write!(f, "CACHE"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Mail => write!(f, "MAIL"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::ServiceUnavailable => write!(f, "SERVICE_UNAVAILABLE"),
        }
    }
}

/// Stable, client-facing error codes.
///
/// Each code pins an HTTP status, a wire identifier, and a default message.
/// The identifiers are part of the public API and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ── Sign-up ─────────────────────────────────────────────────
    /// The login id is already taken.
    DuplicateUserId,
    /// The nickname is already taken.
    DuplicateNickname,
    /// The email is already registered.
    DuplicateEmail,
    /// The email verification code did not match.
    FailAuthenticationEmail,
    /// The verification mail could not be sent.
    FailSendEmail,
    /// Password and confirmation differ, or the password is wrong.
    NotMatchPassword,
    /// Uploading a file to object storage failed.
    FailS3Upload,

    // ── Identity ────────────────────────────────────────────────
    /// The user does not exist or has withdrawn.
    NotFoundUser,
    /// The endpoint requires a signed-in caller.
    NotSignedIn,
    /// The caller's role does not allow the action.
    ForbiddenAccess,
    /// A token failed signature, structure, type, or expiry checks.
    InvalidToken,
    /// A refresh token has no matching session entry.
    SessionNotFound,

    // ── Content ─────────────────────────────────────────────────
    /// The post does not exist.
    NotExistPost,
    /// The comment does not exist.
    NotExistComment,
    /// The notification does not exist.
    NotExistNotification,
    /// The caller already likes the post.
    PostLikeFail,
    /// The caller does not like the post.
    PostDeleteLikeFail,

    // ── Push ────────────────────────────────────────────────────
    /// A push connection rejected a frame.
    PushSendFailure,
}

impl ErrorCode {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::DuplicateUserId | Self::DuplicateNickname | Self::DuplicateEmail => 409,
            Self::FailAuthenticationEmail
            | Self::FailSendEmail
            | Self::NotMatchPassword
            | Self::NotSignedIn
            | Self::InvalidToken
            | Self::SessionNotFound => 401,
            Self::FailS3Upload | Self::PushSendFailure => 500,
            Self::NotFoundUser
            | Self::NotExistPost
            | Self::NotExistComment
            | Self::NotExistNotification => 404,
            Self::ForbiddenAccess => 403,
            Self::PostLikeFail | Self::PostDeleteLikeFail => 400,
        }
    }

    /// Wire identifier sent in the `code` field of error payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateUserId => "SU001",
            Self::DuplicateNickname => "SU002",
            Self::DuplicateEmail => "SU003",
            Self::FailAuthenticationEmail => "SU005",
            Self::NotMatchPassword => "SU006",
            Self::FailS3Upload => "SU007",
            Self::FailSendEmail => "SU008",
            Self::NotFoundUser => "SU009",
            Self::NotSignedIn => "USER_NOT_SIGNED_IN",
            Self::ForbiddenAccess => "FORBIDDEN_ACCESS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::NotExistPost => "NOT_EXIST_POST",
            Self::NotExistComment => "NOT_EXIST_COMMENT",
            Self::NotExistNotification => "NOT_EXIST_NOTIFICATION",
            Self::PostLikeFail => "BOARD_LIKE_FAIL_EXCEPTION",
            Self::PostDeleteLikeFail => "BOARD_DELETE_LIKE_FAIL_EXCEPTION",
            Self::PushSendFailure => "PUSH_SEND_FAILURE",
        }
    }

    /// Default human-readable message.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::DuplicateUserId => "User id already exists",
            Self::DuplicateNickname => "Nickname already exists",
            Self::DuplicateEmail => "Email is already registered",
            Self::FailAuthenticationEmail => "Email verification failed",
            Self::FailSendEmail => "Failed to send email",
            Self::NotMatchPassword => "Password does not match",
            Self::FailS3Upload => "File upload failed",
            Self::NotFoundUser => "User does not exist",
            Self::NotSignedIn => "Sign-in required",
            Self::ForbiddenAccess => "Access denied",
            Self::InvalidToken => "Invalid token",
            Self::SessionNotFound => "Session not found",
            Self::NotExistPost => "Post does not exist",
            Self::NotExistComment => "Comment does not exist",
            Self::NotExistNotification => "Notification does not exist",
            Self::PostLikeFail => "Failed to add like",
            Self::PostDeleteLikeFail => "Failed to remove like",
            Self::PushSendFailure => "Failed to push event",
        }
    }

    /// The error kind this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateUserId | Self::DuplicateNickname | Self::DuplicateEmail => {
                ErrorKind::Conflict
            }
            Self::FailAuthenticationEmail
            | Self::NotMatchPassword
            | Self::NotSignedIn
            | Self::InvalidToken
            | Self::SessionNotFound => ErrorKind::Unauthorized,
            Self::FailSendEmail => ErrorKind::Mail,
            Self::FailS3Upload => ErrorKind::Storage,
            Self::NotFoundUser
            | Self::NotExistPost
            | Self::NotExistComment
            | Self::NotExistNotification => ErrorKind::NotFound,
            Self::ForbiddenAccess => ErrorKind::Forbidden,
            Self::PostLikeFail | Self::PostDeleteLikeFail => ErrorKind::BadRequest,
            Self::PushSendFailure => ErrorKind::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unified application error.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// Stable client-facing code, when the error is a known business failure.
    pub code: Option<ErrorCode>,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an error from a stable code using its default message.
    pub fn coded(code: ErrorCode) -> Self {
        Self {
            kind: code.kind(),
            code: Some(code),
            message: code.default_message().to_string(),
            source: None,
        }
    }

    /// Create an error from a stable code with a detail appended to the message.
    pub fn coded_with(code: ErrorCode, detail: impl fmt::Display) -> Self {
        Self {
            kind: code.kind(),
            code: Some(code),
            message: format!("{}: {detail}", code.default_message()),
            source: None,
        }
    }

    /// Attach an underlying cause.
    pub fn caused_by(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether this error carries the given code.
    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == Some(code)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            code: self.code,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::coded(code)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
