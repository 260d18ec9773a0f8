use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenService;
use backoffice::domain::principal::models::CredentialHash;
use backoffice::domain::principal::models::EmailAddress;
use backoffice::domain::principal::models::NewPrincipal;
use backoffice::domain::principal::models::Principal;
use backoffice::domain::principal::models::Role;
use backoffice::domain::principal::models::Username;
use backoffice::domain::principal::ports::PrincipalStore;
use backoffice::domain::principal::service::CredentialService;
use backoffice::inbound::http::router::create_router;
use backoffice::outbound::stores::MemoryPrincipalStore;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server on a random port.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub store: Arc<MemoryPrincipalStore>,
    /// Shares the server's signing secret, so tests can mint tokens with
    /// controlled issuance times.
    pub token_service: TokenService,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(MemoryPrincipalStore::new());
        let token_service =
            Arc::new(TokenService::new(TEST_SECRET).expect("Failed to build token service"));
        let credential_service = Arc::new(CredentialService::new(
            Arc::clone(&store),
            Arc::clone(&token_service),
        ));

        let router = create_router(credential_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            store,
            token_service: TokenService::new(TEST_SECRET)
                .expect("Failed to build token service"),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Seed an admin principal directly through the store port, the way the
    /// first admin is provisioned out-of-band in production.
    pub async fn seed_admin(&self, username: &str, email: &str, password: &str) -> Principal {
        let hash = PasswordHasher::new()
            .hash(password)
            .expect("Failed to hash password");

        self.store
            .create(NewPrincipal {
                username: Username::new(username.to_string()).unwrap(),
                email: EmailAddress::new(email.to_string()).unwrap(),
                role: Role::Admin,
                credential_hash: CredentialHash::new(hash),
            })
            .await
            .expect("Failed to seed admin")
    }
}
