use std::str::FromStr;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::principal::authorize::authorize;
use crate::domain::principal::models::AuthSession;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::Role;
use crate::domain::principal::models::SignupCommand;
use crate::domain::principal::models::Username;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::router::AppState;
use crate::principal::errors::EmailError;
use crate::principal::errors::PrincipalError;
use crate::principal::errors::RoleError;
use crate::principal::errors::UsernameError;
use crate::principal::ports::CredentialServicePort;

pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SignupRequest>,
) -> Result<ApiSuccess<SignupResponseData>, ApiError> {
    let command = body.try_into_command()?;

    // Elevated roles are granted, never self-assigned: a signup asking for
    // admin must itself be authorized by an existing admin
    if command.role == Role::Admin {
        require_admin_caller(&state, &headers).await?;
    }

    state
        .credential_service
        .signup(command)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::CREATED, session.into()))
}

async fn require_admin_caller(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(token) = bearer_token(headers) else {
        return Err(ApiError::Forbidden(
            "the admin role can only be granted by an admin".to_string(),
        ));
    };

    let caller = state
        .credential_service
        .authenticate_token(token)
        .await
        .map_err(|err| match err {
            PrincipalError::Token(_) | PrincipalError::NotFound(_) => {
                ApiError::Unauthenticated("not authorized, token failed".to_string())
            }
            other => ApiError::from(other),
        })?;

    authorize(&caller, &[Role::Admin]).map_err(ApiError::from)?;

    Ok(())
}

/// HTTP request body for signup (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    username: String,
    email: String,
    password: String,
    role: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseSignupRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),
}

impl SignupRequest {
    fn try_into_command(self) -> Result<SignupCommand, ParseSignupRequestError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        let role = match self.role {
            Some(role) => Role::from_str(&role)?,
            None => Role::default(),
        };

        Ok(SignupCommand {
            username,
            email,
            password: self.password,
            role,
        })
    }
}

impl From<ParseSignupRequestError> for ApiError {
    fn from(err: ParseSignupRequestError) -> Self {
        ApiError::ValidationFailed(err.to_string())
    }
}

/// Response body for signup; never carries any credential-derived field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupResponseData {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

impl From<&AuthSession> for SignupResponseData {
    fn from(session: &AuthSession) -> Self {
        Self {
            id: session.principal.id.to_string(),
            username: session.principal.username.as_str().to_string(),
            email: session.principal.email.as_str().to_string(),
            role: session.principal.role,
            token: session.token.clone(),
        }
    }
}
