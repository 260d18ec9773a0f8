use std::sync::Arc;

use backoffice::config::Config;
use backoffice::domain::principal::service::CredentialService;
use backoffice::inbound::http::router::create_router;
use backoffice::outbound::stores::MemoryPrincipalStore;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backoffice=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "backoffice",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    // The signing key is a startup requirement; an empty or missing secret
    // never survives into request handling. The secret itself is not logged.
    let token_service = Arc::new(auth::TokenService::new(config.jwt.secret.as_bytes())?);

    tracing::info!(http_port = config.server.http_port, "Configuration loaded");

    let principal_store = Arc::new(MemoryPrincipalStore::new());
    let credential_service = Arc::new(CredentialService::new(principal_store, token_service));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(credential_service);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
