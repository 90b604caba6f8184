use std::fmt;

use thiserror::Error;

/// Why a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    Blank,
    TooLong { max: usize },
    TooShort { min: usize },
    WrongFormat,
    NotUnique,
    MismatchedConfirmation,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::Blank => write!(f, "can't be blank"),
            ValidationReason::TooLong { max } => {
                write!(f, "is too long (maximum is {max} characters)")
            }
            ValidationReason::TooShort { min } => {
                write!(f, "is too short (minimum is {min} characters)")
            }
            ValidationReason::WrongFormat => write!(f, "is invalid"),
            ValidationReason::NotUnique => write!(f, "has already been taken"),
            ValidationReason::MismatchedConfirmation => write!(f, "doesn't match confirmation"),
        }
    }
}

/// A single failed validation as a (field, reason) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl FieldError {
    pub fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// Error types for the domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    /// One or more field-level validation failures. Recovered locally by
    /// the caller; never a fatal fault.
    #[error("validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// An operation referenced an entity that does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// Error surfaced from the backing store, including rolled-back
    /// cascades.
    #[error("storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),

    /// Error from digest generation. Verifying a malformed digest is a
    /// failed verification, not an error.
    #[error("credential error: {0}")]
    Credential(String),
}

impl DomainError {
    /// Shorthand for a single-field validation failure.
    pub fn invalid(field: &'static str, reason: ValidationReason) -> Self {
        DomainError::Validation(vec![FieldError::new(field, reason)])
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<bcrypt::BcryptError> for DomainError {
    fn from(error: bcrypt::BcryptError) -> Self {
        DomainError::Credential(error.to_string())
    }
}

impl From<sea_orm::TransactionError<sea_orm::DbErr>> for DomainError {
    fn from(error: sea_orm::TransactionError<sea_orm::DbErr>) -> Self {
        match error {
            sea_orm::TransactionError::Connection(e) => DomainError::Storage(e),
            sea_orm::TransactionError::Transaction(e) => DomainError::Storage(e),
        }
    }
}

/// Type alias for Result with DomainError
pub type Result<T> = std::result::Result<T, DomainError>;
