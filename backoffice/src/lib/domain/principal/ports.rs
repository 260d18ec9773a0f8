use async_trait::async_trait;

use crate::domain::principal::models::AuthSession;
use crate::domain::principal::models::CredentialHash;
use crate::domain::principal::models::LoginCommand;
use crate::domain::principal::models::NewPrincipal;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::PrincipalWithCredential;
use crate::domain::principal::models::SignupCommand;
use crate::domain::principal::models::UpdatePrincipalCommand;
use crate::principal::errors::PrincipalError;
use crate::principal::models::EmailAddress;
use crate::principal::models::Username;

/// Port for credential and principal operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Register a new principal and issue a token for it.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, password,
    ///   and role
    ///
    /// # Returns
    /// The created principal and its bearer token
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - Uniqueness conflict
    /// * `Password` - Plaintext rejected or hashing failed
    /// * `StoreFailure` - Store operation failed
    async fn signup(&self, command: SignupCommand) -> Result<AuthSession, PrincipalError>;

    /// Verify credentials and issue a token.
    ///
    /// An unknown email and a wrong password are indistinguishable in the
    /// result.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No principal with this email, or password
    ///   mismatch
    /// * `StoreFailure` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, PrincipalError>;

    /// Resolve a bearer token to its principal.
    ///
    /// The token is verified (signature, then expiry) strictly before the
    /// store is consulted.
    ///
    /// # Errors
    /// * `Token` - Malformed, badly signed, or expired token
    /// * `NotFound` - Token subject no longer exists in the store
    /// * `StoreFailure` - Store operation failed
    async fn authenticate_token(&self, token: &str) -> Result<Principal, PrincipalError>;

    /// Retrieve a principal by identifier, credential excluded.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    /// * `StoreFailure` - Store operation failed
    async fn get_principal(&self, id: &PrincipalId) -> Result<Principal, PrincipalError>;

    /// Update an existing principal with optional fields.
    ///
    /// The credential is re-hashed only when a new password is supplied.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - New value collides
    /// * `Password` - Replacement plaintext rejected or hashing failed
    /// * `StoreFailure` - Store operation failed
    async fn update_principal(
        &self,
        id: &PrincipalId,
        command: UpdatePrincipalCommand,
    ) -> Result<Principal, PrincipalError>;

    /// Delete an existing principal.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    /// * `StoreFailure` - Store operation failed
    async fn delete_principal(&self, id: &PrincipalId) -> Result<(), PrincipalError>;
}

/// Persistence operations for the principal document collection.
///
/// The credential hash flows through exactly three operations: it enters via
/// `create` and `save`, and leaves only via `find_by_email_with_credential`.
/// Every other read returns the credential-free projection.
#[async_trait]
pub trait PrincipalStore: Send + Sync + 'static {
    /// Persist a new principal; the store assigns id and both timestamps.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - Duplicate key
    /// * `StoreFailure` - Store operation failed
    async fn create(&self, new: NewPrincipal) -> Result<Principal, PrincipalError>;

    /// Single existence probe covering both unique fields.
    ///
    /// # Returns
    /// Any principal matching the username or the email (None if neither)
    ///
    /// # Errors
    /// * `StoreFailure` - Store operation failed
    async fn find_by_username_or_email(
        &self,
        username: &Username,
        email: &EmailAddress,
    ) -> Result<Option<Principal>, PrincipalError>;

    /// The only credential-bearing read, used by the login path.
    ///
    /// # Errors
    /// * `StoreFailure` - Store operation failed
    async fn find_by_email_with_credential(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<PrincipalWithCredential>, PrincipalError>;

    /// Retrieve the public projection by identifier.
    ///
    /// # Errors
    /// * `StoreFailure` - Store operation failed
    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, PrincipalError>;

    /// Write back an existing principal.
    ///
    /// A `credential` of `None` leaves the stored hash untouched; the
    /// credential is replaced only when a freshly derived hash is supplied.
    ///
    /// # Errors
    /// * `NotFound` - No principal with this id
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - Duplicate key
    /// * `StoreFailure` - Store operation failed
    async fn save(
        &self,
        principal: Principal,
        credential: Option<CredentialHash>,
    ) -> Result<Principal, PrincipalError>;

    /// Remove a principal from the store.
    ///
    /// # Errors
    /// * `NotFound` - No principal with this id
    /// * `StoreFailure` - Store operation failed
    async fn delete(&self, id: &PrincipalId) -> Result<(), PrincipalError>;
}
