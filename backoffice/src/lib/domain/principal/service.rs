use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::principal::models::AuthSession;
use crate::domain::principal::models::CredentialHash;
use crate::domain::principal::models::LoginCommand;
use crate::domain::principal::models::NewPrincipal;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::SignupCommand;
use crate::domain::principal::models::UpdatePrincipalCommand;
use crate::principal::errors::PrincipalError;
use crate::principal::ports::CredentialServicePort;
use crate::principal::ports::PrincipalStore;

/// Domain service for credential issuance and verification.
///
/// Orchestrates the password hasher, the token service, and the principal
/// store. Concrete implementation of [`CredentialServicePort`] with
/// dependency injection.
pub struct CredentialService<PS>
where
    PS: PrincipalStore,
{
    store: Arc<PS>,
    token_service: Arc<auth::TokenService>,
    password_hasher: auth::PasswordHasher,
}

impl<PS> CredentialService<PS>
where
    PS: PrincipalStore,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Principal persistence implementation
    /// * `token_service` - Configured token issuer/verifier
    pub fn new(store: Arc<PS>, token_service: Arc<auth::TokenService>) -> Self {
        Self {
            store,
            token_service,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    fn issue_for(&self, principal: &Principal) -> Result<String, PrincipalError> {
        Ok(self.token_service.issue(&principal.id.to_string())?)
    }

    /// Derive a credential hash on the blocking executor.
    ///
    /// Argon2 work is CPU-bound for tens of milliseconds; it must not occupy
    /// an async request worker.
    async fn hash_blocking(&self, password: String) -> Result<CredentialHash, PrincipalError> {
        let hasher = self.password_hasher;

        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PrincipalError::Unknown(format!("hashing task failed: {}", e)))??;

        Ok(CredentialHash::new(hash))
    }

    /// Compare a plaintext against a stored hash on the blocking executor.
    async fn verify_blocking(
        &self,
        password: String,
        credential_hash: CredentialHash,
    ) -> Result<bool, PrincipalError> {
        let hasher = self.password_hasher;

        tokio::task::spawn_blocking(move || hasher.verify(&password, credential_hash.as_str()))
            .await
            .map_err(|e| PrincipalError::Unknown(format!("verification task failed: {}", e)))
    }
}

#[async_trait]
impl<PS> CredentialServicePort for CredentialService<PS>
where
    PS: PrincipalStore,
{
    async fn signup(&self, command: SignupCommand) -> Result<AuthSession, PrincipalError> {
        // Single probe covering both unique fields
        if let Some(existing) = self
            .store
            .find_by_username_or_email(&command.username, &command.email)
            .await?
        {
            return Err(if existing.username == command.username {
                PrincipalError::UsernameAlreadyExists(command.username.to_string())
            } else {
                PrincipalError::EmailAlreadyExists(command.email.to_string())
            });
        }

        let credential_hash = self.hash_blocking(command.password).await?;

        let principal = self
            .store
            .create(NewPrincipal {
                username: command.username,
                email: command.email,
                role: command.role,
                credential_hash,
            })
            .await?;

        let token = self.issue_for(&principal)?;

        Ok(AuthSession { principal, token })
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, PrincipalError> {
        // The one credential-bearing lookup
        let Some(record) = self
            .store
            .find_by_email_with_credential(&command.email)
            .await?
        else {
            return Err(PrincipalError::InvalidCredentials);
        };

        if !self
            .verify_blocking(command.password, record.credential_hash)
            .await?
        {
            return Err(PrincipalError::InvalidCredentials);
        }

        let token = self.issue_for(&record.principal)?;

        Ok(AuthSession {
            principal: record.principal,
            token,
        })
    }

    async fn authenticate_token(&self, token: &str) -> Result<Principal, PrincipalError> {
        // Signature and expiry first; no store call for an unverifiable token
        let subject = self.token_service.verify(token)?;

        let id = PrincipalId::from_string(&subject).map_err(|e| {
            PrincipalError::Token(auth::TokenError::Malformed(format!(
                "subject is not a principal id: {}",
                e
            )))
        })?;

        self.store
            .find_by_id(&id)
            .await?
            .ok_or(PrincipalError::NotFound(id.to_string()))
    }

    async fn get_principal(&self, id: &PrincipalId) -> Result<Principal, PrincipalError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(PrincipalError::NotFound(id.to_string()))
    }

    async fn update_principal(
        &self,
        id: &PrincipalId,
        command: UpdatePrincipalCommand,
    ) -> Result<Principal, PrincipalError> {
        let mut principal = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(PrincipalError::NotFound(id.to_string()))?;

        if let Some(new_username) = command.username {
            principal.username = new_username;
        }

        if let Some(new_email) = command.email {
            principal.email = new_email;
        }

        // Hash only when a new plaintext was supplied; None keeps the stored
        // credential untouched
        let credential = match command.password {
            Some(password) => Some(self.hash_blocking(password).await?),
            None => None,
        };

        principal.touch_updated_at();

        self.store.save(principal, credential).await
    }

    async fn delete_principal(&self, id: &PrincipalId) -> Result<(), PrincipalError> {
        self.store.delete(id).await
    }
}
