use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password must be at least {min} characters long, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("password hashing failed: {0}")]
    HashingFailed(String),
}
