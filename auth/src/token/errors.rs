use thiserror::Error;

/// Error type for token operations.
///
/// Every verification failure is one of `Malformed`, `BadSignature`, or
/// `Expired`; there is no path on which a failed check yields a subject.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("no signing key is configured")]
    SigningKeyMissing,

    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token is expired")]
    Expired,

    #[error("failed to encode token: {0}")]
    EncodingFailed(String),
}
