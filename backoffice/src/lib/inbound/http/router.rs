use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::delete_principal::delete_principal;
use super::handlers::get_principal::get_principal;
use super::handlers::login::login;
use super::handlers::signup::signup;
use super::handlers::update_principal::update_principal;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use crate::domain::principal::service::CredentialService;
use crate::outbound::stores::MemoryPrincipalStore;

#[derive(Clone)]
pub struct AppState {
    pub credential_service: Arc<CredentialService<MemoryPrincipalStore>>,
}

pub fn create_router(credential_service: Arc<CredentialService<MemoryPrincipalStore>>) -> Router {
    let state = AppState { credential_service };

    let public_routes = Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login));

    // Authentication wraps every protected route and runs before the role
    // check, so the role gate only ever sees resolved principals
    let protected_routes = Router::new()
        .route(
            "/api/principals/:principal_id",
            get(get_principal).patch(update_principal),
        )
        .route(
            "/api/principals/:principal_id",
            delete(delete_principal).route_layer(middleware::from_fn(require_admin)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
