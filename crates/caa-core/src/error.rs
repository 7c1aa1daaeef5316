//! Validation errors for caa-core.
//!
//! Every failure in the core crate is local and recoverable: the caller gets a
//! [`ValidationError`] back and the value being edited is left untouched.

use thiserror::Error;

/// Errors produced when an edit or an input value is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A row reference outside `1..=len`.
    #[error("row {row} is out of range (list has {len} row(s))")]
    RowOutOfRange { row: u32, len: usize },

    /// An entry position outside the referenced row.
    #[error("entry {position} is out of range for row {row} ({len} entr(ies))")]
    EntryOutOfRange { row: u32, position: usize, len: usize },

    /// A superset row already uses a different set count.
    #[error("set-count mismatch in row {row}: expected {expected}, got {actual}")]
    SetCountMismatch { row: u32, expected: u32, actual: u32 },

    /// A required field was empty or zero.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// A numeric field could not be parsed.
    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    /// A field held a value outside its allowed set.
    #[error("invalid value for {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

impl ValidationError {
    /// Machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::RowOutOfRange { .. } => "ROW_OUT_OF_RANGE",
            ValidationError::EntryOutOfRange { .. } => "ENTRY_OUT_OF_RANGE",
            ValidationError::SetCountMismatch { .. } => "SET_COUNT_MISMATCH",
            ValidationError::MissingField { .. } => "MISSING_FIELD",
            ValidationError::NotANumber { .. } => "NOT_A_NUMBER",
            ValidationError::InvalidValue { .. } => "INVALID_VALUE",
        }
    }
}
