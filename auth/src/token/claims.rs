use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an issued bearer token.
///
/// The subject is the principal identifier the token was issued to. Validity
/// is determined entirely by the signature and the `exp` claim; there is no
/// server-side session record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Build claims for a principal as of the given instant.
    ///
    /// # Arguments
    /// * `subject` - Principal identifier
    /// * `issued_at` - Issuance instant
    /// * `lifetime` - Offset from issuance to expiry
    pub fn new(subject: impl ToString, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            sub: subject.to_string(),
            exp: (issued_at + lifetime).timestamp(),
            iat: issued_at.timestamp(),
        }
    }

    /// Check if the claims are expired at the given timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
