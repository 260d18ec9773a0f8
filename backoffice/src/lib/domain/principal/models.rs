use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::principal::errors::EmailError;
use crate::principal::errors::PrincipalIdError;
use crate::principal::errors::RoleError;
use crate::principal::errors::UsernameError;

/// Principal aggregate entity, the public projection.
///
/// Represents an authenticatable actor. This type never carries the
/// credential hash; the privileged projection is [`PrincipalWithCredential`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: PrincipalId,
    pub username: Username,
    pub email: EmailAddress,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principal {
    /// Refresh the modification timestamp.
    ///
    /// Called explicitly by the write path before a save; there is no
    /// implicit on-persist hook.
    pub fn touch_updated_at(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Privileged projection of a principal carrying the credential hash.
///
/// Only the login read path and store adapters handle this type; everything
/// downstream of authentication sees [`Principal`].
#[derive(Debug, Clone)]
pub struct PrincipalWithCredential {
    pub principal: Principal,
    pub credential_hash: CredentialHash,
}

/// A derived credential hash in PHC string format.
///
/// Does not implement `Serialize`, so it cannot reach a response body, and
/// redacts itself in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap an already-derived hash string.
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Get the hash as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

/// Principal unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    /// Generate a new random principal ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a principal ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, PrincipalIdError> {
        Uuid::parse_str(s)
            .map(PrincipalId)
            .map_err(|e| PrincipalIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Trimmed on construction, 3-32 characters, matched case-sensitively as
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters after trimming
    /// * `TooLong` - Username longer than 32 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = username.trim().to_string();
        let length = username.chars().count();

        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username))
        }
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Normalized to lowercase on construction. Must parse as an address and
/// carry a dotted domain (`local@domain.tld`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not a parseable address, or the domain has no
    ///   top-level part
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();

        let parsed = email_address::EmailAddress::from_str(&email)
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))?;

        if !parsed.domain().contains('.') {
            return Err(EmailError::InvalidFormat(format!(
                "domain '{}' is missing a top-level part",
                parsed.domain()
            )));
        }

        Ok(Self(email))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Principal role, the unit of authorization.
///
/// Matched case-sensitively against the canonical lowercase spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Canonical spelling of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command to register a new principal with validated fields.
#[derive(Debug)]
pub struct SignupCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
    pub role: Role,
}

/// Command to authenticate an existing principal.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

/// Fields handed to the store when creating a principal.
///
/// The store assigns the identifier and both timestamps.
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub username: Username,
    pub email: EmailAddress,
    pub role: Role,
    pub credential_hash: CredentialHash,
}

/// Command to update an existing principal with optional validated fields.
///
/// Only provided fields are written. An absent password means the stored
/// credential is left untouched and is never re-hashed. The role is not
/// updatable here; it is set at creation only.
#[derive(Debug)]
pub struct UpdatePrincipalCommand {
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
    pub password: Option<String>,
}

/// Outcome of a successful signup or login: the principal plus a fresh
/// bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub principal: Principal,
    pub token: String,
}
