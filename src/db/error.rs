//! Store error types.

use derive_more::{Display, Error};
use diesel::result::DatabaseErrorKind;
use tracing::instrument;

/// Category of a [`StoreError`].
///
/// Callers match on this to decide what to tell the player; the message
/// carries the detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StoreErrorKind {
    /// No record matched the request.
    #[display("not found")]
    NotFound,
    /// A record with the same identity is already registered.
    #[display("already exists")]
    AlreadyExists,
    /// The request named an unknown stat or carried an out-of-range value.
    #[display("invalid argument")]
    InvalidArgument,
    /// Not enough skill points to cover the request.
    #[display("insufficient resource")]
    InsufficientResource,
    /// The record changed between read and write.
    #[display("conflict")]
    Conflict,
    /// Connection, transaction, or filesystem failure.
    #[display("storage error")]
    Storage,
}

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error ({}): {} at {}:{}", kind, message, file, line)]
pub struct StoreError {
    /// Error category.
    pub kind: StoreErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for [`StoreErrorKind::NotFound`].
    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound, message)
    }

    /// Shorthand for [`StoreErrorKind::AlreadyExists`].
    #[track_caller]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::AlreadyExists, message)
    }

    /// Shorthand for [`StoreErrorKind::InvalidArgument`].
    #[track_caller]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::InvalidArgument, message)
    }

    /// Shorthand for [`StoreErrorKind::InsufficientResource`].
    #[track_caller]
    pub fn insufficient(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::InsufficientResource, message)
    }

    /// Shorthand for [`StoreErrorKind::Conflict`].
    #[track_caller]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Conflict, message)
    }

    /// Shorthand for [`StoreErrorKind::Storage`].
    #[track_caller]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Storage, message)
    }

    /// Returns the error category.
    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::Error as E;
        match err {
            E::NotFound => Self::not_found("Record not found"),
            E::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::already_exists(format!("Unique constraint violated: {}", info.message()))
            }
            E::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::not_found(format!("Referenced record missing: {}", info.message()))
            }
            other => Self::storage(format!("Diesel error: {}", other)),
        }
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::storage(format!("Connection error: {}", err))
    }
}

impl From<std::io::Error> for StoreError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("I/O error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        let err = StoreError::from(diesel::result::Error::NotFound);
        assert_eq!(err.kind(), StoreErrorKind::NotFound);
    }

    #[test]
    fn rollback_maps_to_storage() {
        let err = StoreError::from(diesel::result::Error::RollbackTransaction);
        assert_eq!(err.kind(), StoreErrorKind::Storage);
    }

    #[test]
    fn display_includes_kind_and_location() {
        let err = StoreError::insufficient("need 3, have 1");
        let text = err.to_string();
        assert!(text.contains("insufficient resource"));
        assert!(text.contains("need 3, have 1"));
        assert!(text.contains("error.rs"));
    }
}
