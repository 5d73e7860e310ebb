use crate::catalog::CatalogError;
use crate::database::DatabaseError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sqlx::Error as SqlxError;
use std::time::Duration;
use thiserror::Error;
use tracing::error;

/// Message returned for duplicate participants
pub const ALREADY_REGISTERED: &str = "Email or mobile already registered";

/// Unique indexes on `participants` that identify a person
pub const PARTICIPANT_IDENTITY_CONSTRAINTS: [&str; 3] = [
    "participants_email_key",
    "participants_mobile_key",
    "participants_email_mobile_key",
];

/// Application-level error types (startup and wiring)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised by the relational store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("timed out waiting for a database connection")]
    Timeout,

    #[error("unique constraint violated ({}): {message}", constraint.as_deref().unwrap_or("unknown"))]
    UniqueViolation {
        constraint: Option<String>,
        message: String,
    },

    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("query error: {0}")]
    Query(String),
}

impl StoreError {
    /// True when the violated index identifies a participant (email and/or mobile)
    pub fn is_duplicate_participant(&self) -> bool {
        match self {
            StoreError::UniqueViolation {
                constraint: Some(name),
                ..
            } => PARTICIPANT_IDENTITY_CONSTRAINTS.contains(&name.as_str()),
            _ => false,
        }
    }
}

impl From<SqlxError> for StoreError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::PoolTimedOut => StoreError::Timeout,
            SqlxError::Io(_) | SqlxError::Tls(_) | SqlxError::PoolClosed | SqlxError::WorkerCrashed => {
                StoreError::Connection(err.to_string())
            }
            SqlxError::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                match code.as_deref() {
                    // unique_violation
                    Some("23505") => StoreError::UniqueViolation {
                        constraint: db_err
                            .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
                            .and_then(|pg| pg.constraint())
                            .map(str::to_string),
                        message: db_err.message().to_string(),
                    },
                    // foreign_key_violation
                    Some("23503") => StoreError::ForeignKeyViolation(db_err.message().to_string()),
                    // connection_exception class
                    Some(c) if c.starts_with("08") => StoreError::Connection(db_err.message().to_string()),
                    // query_canceled (statement_timeout)
                    Some("57014") => StoreError::Timeout,
                    _ => StoreError::Query(db_err.message().to_string()),
                }
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Errors raised by blob storage
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("S3/object storage upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("object storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("blob write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid blob key: {0}")]
    InvalidKey(String),

    #[error("upload failed: {0}")]
    Upload(String),
}

/// Errors raised while sending confirmation emails
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("invalid address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("email transport failed: {0}")]
    Transport(String),
}

impl NotificationError {
    pub fn kind(&self) -> DependencyKind {
        DependencyKind::EmailDelivery
    }
}

/// Coarse, user-facing classification of a dependency failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Connectivity,
    DuplicateKey,
    MissingReference,
    Upload,
    Timeout,
    EmailDelivery,
    Unknown,
}

impl DependencyKind {
    /// Guidance shown to the participant
    pub fn detail(&self) -> &'static str {
        match self {
            DependencyKind::Connectivity => {
                "Could not reach the registration database. Please try again in a few minutes."
            }
            DependencyKind::DuplicateKey => {
                "A conflicting registration record already exists. Please contact the organizers."
            }
            DependencyKind::MissingReference => {
                "A referenced event or record is missing. Please refresh the page and try again."
            }
            DependencyKind::Upload => {
                "Payment screenshot upload failed. Please try again, ideally with a smaller image."
            }
            DependencyKind::Timeout => "The registration request timed out. Please try again.",
            DependencyKind::EmailDelivery => "The confirmation email could not be sent.",
            DependencyKind::Unknown => "An unexpected error occurred. Please try again later.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Connectivity => "connectivity",
            DependencyKind::DuplicateKey => "duplicate_key",
            DependencyKind::MissingReference => "missing_reference",
            DependencyKind::Upload => "upload",
            DependencyKind::Timeout => "timeout",
            DependencyKind::EmailDelivery => "email_delivery",
            DependencyKind::Unknown => "unknown",
        }
    }
}

/// Failure of a collaborator the registration depends on
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("database error: {0}")]
    Store(#[from] StoreError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("registration timed out after {0:?}")]
    Timeout(Duration),

    #[error("registration task failed: {0}")]
    Task(String),
}

impl DependencyError {
    /// Structural classification; never inspects message text
    pub fn kind(&self) -> DependencyKind {
        match self {
            DependencyError::Store(StoreError::Connection(_)) => DependencyKind::Connectivity,
            DependencyError::Store(StoreError::Timeout) => DependencyKind::Timeout,
            DependencyError::Store(StoreError::UniqueViolation { .. }) => DependencyKind::DuplicateKey,
            DependencyError::Store(StoreError::ForeignKeyViolation(_)) => DependencyKind::MissingReference,
            DependencyError::Store(StoreError::Query(_)) => DependencyKind::Unknown,
            DependencyError::Storage(_) => DependencyKind::Upload,
            DependencyError::Timeout(_) => DependencyKind::Timeout,
            DependencyError::Task(_) => DependencyKind::Unknown,
        }
    }
}

/// Outcome of a failed registration submission
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Malformed or rule-violating input; the client can fix and resubmit
    #[error("{0}")]
    Validation(String),

    /// Participant already exists
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Dependency(#[from] DependencyError),
}

pub type RegistrationResult<T> = Result<T, RegistrationError>;

impl RegistrationError {
    pub fn validation(message: impl Into<String>) -> Self {
        RegistrationError::Validation(message.into())
    }

    pub fn already_registered() -> Self {
        RegistrationError::Conflict(ALREADY_REGISTERED.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistrationError::Validation(_) => StatusCode::BAD_REQUEST,
            RegistrationError::Conflict(_) => StatusCode::CONFLICT,
            RegistrationError::Dependency(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for RegistrationError {
    fn from(err: StoreError) -> Self {
        // The insert-time unique index is the authoritative duplicate check
        if err.is_duplicate_participant() {
            RegistrationError::already_registered()
        } else {
            RegistrationError::Dependency(DependencyError::Store(err))
        }
    }
}

impl From<StorageError> for RegistrationError {
    fn from(err: StorageError) -> Self {
        RegistrationError::Dependency(DependencyError::Storage(err))
    }
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            RegistrationError::Validation(msg) | RegistrationError::Conflict(msg) => {
                json!({ "error": msg })
            }
            RegistrationError::Dependency(err) => {
                let kind = err.kind();
                error!(kind = kind.as_str(), "Registration failed: {}", err);
                json!({
                    "error": "Registration failed.",
                    "detail": kind.detail(),
                    "reason": err.to_string(),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique(constraint: &str) -> StoreError {
        StoreError::UniqueViolation {
            constraint: Some(constraint.to_string()),
            message: "duplicate key value violates unique constraint".to_string(),
        }
    }

    #[test]
    fn test_duplicate_participant_becomes_conflict() {
        let err: RegistrationError = unique("participants_email_key").into();
        assert!(matches!(err, RegistrationError::Conflict(ref m) if m == ALREADY_REGISTERED));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: RegistrationError = unique("participants_mobile_key").into();
        assert!(matches!(err, RegistrationError::Conflict(_)));
    }

    #[test]
    fn test_other_unique_violation_is_dependency() {
        let err: RegistrationError = unique("participants_unique_code_key").into();
        match err {
            RegistrationError::Dependency(dep) => assert_eq!(dep.kind(), DependencyKind::DuplicateKey),
            other => panic!("expected dependency error, got {:?}", other),
        }
    }

    #[test]
    fn test_dependency_classification() {
        let cases = [
            (DependencyError::Store(StoreError::Connection("refused".into())), DependencyKind::Connectivity),
            (DependencyError::Store(StoreError::Timeout), DependencyKind::Timeout),
            (DependencyError::Store(StoreError::ForeignKeyViolation("fk".into())), DependencyKind::MissingReference),
            (DependencyError::Storage(StorageError::Upload("boom".into())), DependencyKind::Upload),
            (DependencyError::Timeout(Duration::from_secs(1)), DependencyKind::Timeout),
            (DependencyError::Store(StoreError::Query("syntax".into())), DependencyKind::Unknown),
        ];

        for (err, expected) in cases {
            assert_eq!(err.kind(), expected, "{}", err);
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(RegistrationError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RegistrationError::Dependency(DependencyError::Task("panic".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_notification_error_kind() {
        let err = NotificationError::Transport("smtp down".into());
        assert_eq!(err.kind(), DependencyKind::EmailDelivery);
    }
}
