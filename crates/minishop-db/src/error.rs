//! Error types for minishop-db.

use diesel::result::DatabaseErrorKind;
use miette::Diagnostic;
use thiserror::Error;

/// Database error type for minishop-db operations.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Database connection failed: {0}")]
    #[diagnostic(
        code(minishop_db::connection),
        help("Check if the database file exists and is accessible")
    )]
    ConnectionError(String),

    #[error("Database query failed: {0}")]
    #[diagnostic(code(minishop_db::query))]
    QueryError(String),

    #[error("Database migration failed: {0}")]
    #[diagnostic(
        code(minishop_db::migration),
        help("The database schema may be corrupted. Try removing the database file.")
    )]
    MigrationError(String),

    #[error("Record not found: {0}")]
    #[diagnostic(code(minishop_db::not_found))]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    #[diagnostic(
        code(minishop_db::constraint),
        help("The change conflicts with existing rows or references a missing one")
    )]
    ConstraintViolation(String),

    #[error("Invalid pagination: {0}")]
    #[diagnostic(
        code(minishop_db::pageable),
        help("Offset must be zero or positive and page size must be positive")
    )]
    InvalidPageable(String),

    #[error("Unknown {kind} value `{value}`")]
    #[diagnostic(
        code(minishop_db::unknown_variant),
        help("The row was written by an incompatible version or edited by hand")
    )]
    UnknownVariant { kind: &'static str, value: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(minishop_db::io), help("Check file permissions and disk space"))]
    IoError(#[from] std::io::Error),
}

impl From<diesel::result::Error> for DbError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => DbError::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation => {
                    DbError::ConstraintViolation(info.message().to_string())
                }
                _ => DbError::QueryError(info.message().to_string()),
            },
            other => DbError::QueryError(other.to_string()),
        }
    }
}

impl From<diesel::result::ConnectionError> for DbError {
    fn from(err: diesel::result::ConnectionError) -> Self {
        DbError::ConnectionError(err.to_string())
    }
}

/// Result type alias for minishop-db operations.
pub type Result<T> = std::result::Result<T, DbError>;
