//! Error types for board operations.

use thiserror::Error;

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Errors that can occur in board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Element not found on the board.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// An element with the same ID is already on the board.
    #[error("Duplicate element id: {0}")]
    DuplicateId(String),

    /// A property edit carried a value that cannot be applied.
    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue {
        /// Name of the edited field.
        field: &'static str,
        /// The raw value as typed.
        value: String,
    },

    /// The edited property does not exist on this element kind.
    #[error("Property {0} is not editable on this element")]
    NotEditable(&'static str),

    /// Snapshot serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key-value store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] crate::store::StoreError),
}
