use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Fixed token lifetime: thirty days from issuance.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Issues and verifies signed bearer tokens.
///
/// Uses HS256 (HMAC with SHA-256) with a single process-wide secret loaded
/// once at startup. Tokens are stateless: validity is determined by signature
/// and expiry alone, so a rotated key invalidates everything issued before it.
///
/// # Security Notes
/// - The secret should be at least 256 bits (32 bytes) for HS256
/// - Store secrets in environment variables or secure vaults, never in code
/// - The secret must never be logged
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenService {
    /// Create a token service from the signing secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    ///
    /// # Errors
    /// * `SigningKeyMissing` - The secret is empty. Callers must treat this
    ///   as a fatal configuration error at startup, not a per-request one.
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::SigningKeyMissing);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Issue a token for the given principal, valid for [`TOKEN_TTL_DAYS`].
    ///
    /// # Arguments
    /// * `principal_id` - Identifier placed in the `sub` claim
    ///
    /// # Returns
    /// Signed token string
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, principal_id: &str) -> Result<String, TokenError> {
        self.issue_at(principal_id, Utc::now())
    }

    /// Issue a token as of the given instant.
    ///
    /// Split out from [`TokenService::issue`] so callers that control the
    /// clock (tests) can produce tokens issued at arbitrary times.
    pub fn issue_at(
        &self,
        principal_id: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(principal_id, issued_at, Duration::days(TOKEN_TTL_DAYS));
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return the principal identifier it was issued to.
    ///
    /// The signature is checked before any claim is inspected; a token signed
    /// with a different key, or carrying any algorithm other than the
    /// configured one, never passes. Expiry is checked after the signature.
    ///
    /// # Arguments
    /// * `token` - Token string to verify
    ///
    /// # Returns
    /// The `sub` claim of the verified token
    ///
    /// # Errors
    /// * `Malformed` - Not a decodable token
    /// * `BadSignature` - Signature or algorithm mismatch
    /// * `Expired` - Past the `exp` claim
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let validation = Validation::new(self.algorithm);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                _ => TokenError::Malformed(e.to_string()),
            })?;

        Ok(token_data.claims.sub)
    }
}
