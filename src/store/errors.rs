//! # Store Errors

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Payload failed insert validation
    #[error("{0}")]
    Rejected(#[from] SchemaError),

    /// Foreign key points at a row that does not exist
    #[error("{table}.{column} references missing {target} row {id}")]
    ForeignKey {
        table: &'static str,
        column: &'static str,
        target: &'static str,
        id: i32,
    },

    /// `users.email` is unique
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// A user owns at most one profile
    #[error("User {0} already has a profile")]
    DuplicateProfile(i32),

    /// Study group already holds `max_members` members
    #[error("Study group {0} is full")]
    GroupFull(i32),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Rejected(e) => e.code().code(),
            StoreError::ForeignKey { .. } => "STUDYMATCH_FOREIGN_KEY",
            StoreError::DuplicateEmail(_) => "STUDYMATCH_DUPLICATE_EMAIL",
            StoreError::DuplicateProfile(_) => "STUDYMATCH_DUPLICATE_PROFILE",
            StoreError::GroupFull(_) => "STUDYMATCH_GROUP_FULL",
            StoreError::StorageError(_) => "STUDYMATCH_STORAGE_ERROR",
        }
    }

    /// Whether the caller's input caused the failure
    pub fn is_client_error(&self) -> bool {
        !matches!(self, StoreError::StorageError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_key_message() {
        let err = StoreError::ForeignKey {
            table: "profiles",
            column: "user_id",
            target: "users",
            id: 42,
        };
        assert_eq!(err.to_string(), "profiles.user_id references missing users row 42");
        assert_eq!(err.code(), "STUDYMATCH_FOREIGN_KEY");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_schema_error_propagation() {
        let err = StoreError::from(SchemaError::unknown_table("friends"));
        assert_eq!(err.code(), "STUDYMATCH_UNKNOWN_TABLE");
        assert!(!StoreError::StorageError("Lock poisoned".into()).is_client_error());
        assert_eq!(StoreError::GroupFull(3).code(), "STUDYMATCH_GROUP_FULL");
        assert!(StoreError::GroupFull(3).is_client_error());
    }
}
