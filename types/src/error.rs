//! Input validation errors raised before a request touches storage.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} exceeds {max} bytes")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} contains characters outside [a-z0-9-]")]
    InvalidCharacters { field: &'static str },
}
