use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::principal::models::AuthSession;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::LoginCommand;
use crate::domain::principal::models::Role;
use crate::inbound::http::router::AppState;
use crate::principal::ports::CredentialServicePort;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A malformed email is reported exactly like any failed login, so the
    // response does not reveal which factor failed
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthenticated("Invalid email or password".to_string()))?;

    state
        .credential_service
        .login(LoginCommand {
            email,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

/// Response body for login; same shape as signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

impl From<&AuthSession> for LoginResponseData {
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
