//! Error types for todo operations.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers map "the todo does
//! not exist" to its own response. Validation errors carry the form field
//! they belong to so the caller can show the message next to that field.

use thiserror::Error;

use crate::types::TodoId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Input rejected before any state was touched.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// No todo with this id.
    #[error("todo {0} not found")]
    NotFound(TodoId),

    /// The largest id is already taken, so no new id can be assigned.
    #[error("no todo ids left")]
    IdsExhausted,
}
