use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::principal::models::CredentialHash;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::NewPrincipal;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::PrincipalWithCredential;
use crate::domain::principal::models::Username;
use crate::principal::errors::PrincipalError;
use crate::principal::ports::PrincipalStore;

/// In-memory document store for principals.
///
/// Stands in for the external document store behind [`PrincipalStore`].
/// Uniqueness of username and email is enforced on create and save, and the
/// credential hash leaves only through the credentialed read.
pub struct MemoryPrincipalStore {
    documents: RwLock<HashMap<PrincipalId, PrincipalWithCredential>>,
}

impl MemoryPrincipalStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    fn duplicate_of(
        documents: &HashMap<PrincipalId, PrincipalWithCredential>,
        username: &Username,
        email: &EmailAddress,
        excluding: Option<&PrincipalId>,
    ) -> Option<PrincipalError> {
        for record in documents.values() {
            if Some(&record.principal.id) == excluding {
                continue;
            }
            if record.principal.username == *username {
                return Some(PrincipalError::UsernameAlreadyExists(username.to_string()));
            }
            if record.principal.email == *email {
                return Some(PrincipalError::EmailAlreadyExists(email.to_string()));
            }
        }
        None
    }

    fn lock_poisoned<E>(_: E) -> PrincipalError {
        PrincipalError::StoreFailure("store lock poisoned".to_string())
    }
}

impl Default for MemoryPrincipalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrincipalStore for MemoryPrincipalStore {
    async fn create(&self, new: NewPrincipal) -> Result<Principal, PrincipalError> {
        let mut documents = self.documents.write().map_err(Self::lock_poisoned)?;

        if let Some(conflict) = Self::duplicate_of(&documents, &new.username, &new.email, None) {
            return Err(conflict);
        }

        let now = Utc::now();
        let principal = Principal {
            id: PrincipalId::new(),
            username: new.username,
            email: new.email,
            role: new.role,
            created_at: now,
            updated_at: now,
        };

        documents.insert(
            principal.id,
            PrincipalWithCredential {
                principal: principal.clone(),
                credential_hash: new.credential_hash,
            },
        );

        Ok(principal)
    }

    async fn find_by_username_or_email(
        &self,
        username: &Username,
        email: &EmailAddress,
    ) -> Result<Option<Principal>, PrincipalError> {
        let documents = self.documents.read().map_err(Self::lock_poisoned)?;

        Ok(documents
            .values()
            .find(|record| {
                record.principal.username == *username || record.principal.email == *email
            })
            .map(|record| record.principal.clone()))
    }

    async fn find_by_email_with_credential(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<PrincipalWithCredential>, PrincipalError> {
        let documents = self.documents.read().map_err(Self::lock_poisoned)?;

        Ok(documents
            .values()
            .find(|record| record.principal.email == *email)
            .cloned())
    }

    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, PrincipalError> {
        let documents = self.documents.read().map_err(Self::lock_poisoned)?;

        Ok(documents.get(id).map(|record| record.principal.clone()))
    }

    async fn save(
        &self,
        principal: Principal,
        credential: Option<CredentialHash>,
    ) -> Result<Principal, PrincipalError> {
        let mut documents = self.documents.write().map_err(Self::lock_poisoned)?;

        if let Some(conflict) = Self::duplicate_of(
            &documents,
            &principal.username,
            &principal.email,
            Some(&principal.id),
        ) {
            return Err(conflict);
        }

        let Some(record) = documents.get_mut(&principal.id) else {
            return Err(PrincipalError::NotFound(principal.id.to_string()));
        };
        record.principal = principal.clone();
        if let Some(new_credential) = credential {
            record.credential_hash = new_credential;
        }

        Ok(principal)
    }

    async fn delete(&self, id: &PrincipalId) -> Result<(), PrincipalError> {
        let mut documents = self.documents.write().map_err(Self::lock_poisoned)?;

        documents
            .remove(id)
            .map(|_| ())
            .ok_or(PrincipalError::NotFound(id.to_string()))
    }
}
