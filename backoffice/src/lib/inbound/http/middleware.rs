use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::principal::authorize::authorize;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::Role;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::principal::errors::PrincipalError;
use crate::principal::ports::CredentialServicePort;

/// Extension type carrying the authenticated principal for downstream
/// handlers. Credential-free by construction.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

/// Authentication gate.
///
/// Extracts the bearer token, verifies it, resolves the principal (which must
/// still exist in the store), and attaches it to request extensions.
/// Verification happens strictly before the store lookup.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = match bearer_token(req.headers()) {
        Some(token) => token.to_string(),
        None => {
            return Err(
                ApiError::Unauthenticated("not authorized, no token".to_string()).into_response(),
            )
        }
    };

    let principal = match state.credential_service.authenticate_token(&token).await {
        Ok(principal) => principal,
        Err(err) => return Err(reject_authentication(err)),
    };

    req.extensions_mut().insert(CurrentPrincipal(principal));

    Ok(next.run(req).await)
}

/// Map an authentication failure onto a response.
///
/// Token failures and a vanished principal are 401; anything else (store
/// failures included) is 500. A failed check never lets the request through.
fn reject_authentication(err: PrincipalError) -> Response {
    match err {
        PrincipalError::Token(ref token_err) => {
            tracing::warn!(error = %token_err, "token verification failed");
            ApiError::Unauthenticated(format!("not authorized, {}", token_err)).into_response()
        }
        PrincipalError::NotFound(_) => {
            tracing::warn!("valid token for a nonexistent principal");
            ApiError::Unauthenticated("not authorized, principal not found".to_string())
                .into_response()
        }
        other => ApiError::Internal(other.to_string()).into_response(),
    }
}

/// Extract the bearer token from the Authorization header.
///
/// The scheme marker is the literal, case-sensitive `Bearer ` prefix with a
/// single space; any other shape counts as no token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Admin-only route gate. Runs after [`authenticate`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    authorize_roles(&[Role::Admin], req, next).await
}

/// Authorization gate over an allowed-role set.
///
/// Reads the principal attached by [`authenticate`] and evaluates role
/// membership only; it never resolves identity itself. A missing extension
/// means the route was wired without the authentication gate, which is
/// answered with a 500, never a pass-through.
pub async fn authorize_roles(
    allowed: &[Role],
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(CurrentPrincipal(principal)) = req.extensions().get::<CurrentPrincipal>() else {
        tracing::error!("role gate reached without an authenticated principal");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "internal server error" })),
        )
            .into_response());
    };

    if let Err(err) = authorize(principal, allowed) {
        tracing::warn!(role = %principal.role, "authorization rejected");
        return Err(ApiError::Forbidden(err.to_string()).into_response());
    }

    Ok(next.run(req).await)
}
