use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::Role;
use crate::inbound::http::router::AppState;
use crate::principal::ports::CredentialServicePort;

pub async fn get_principal(
    State(state): State<AppState>,
    Path(principal_id): Path<String>,
) -> Result<ApiSuccess<PrincipalResponseData>, ApiError> {
    let principal_id = PrincipalId::from_string(&principal_id)
        .map_err(|e| ApiError::ValidationFailed(e.to_string()))?;

    state
        .credential_service
        .get_principal(&principal_id)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| ApiSuccess::new(StatusCode::OK, principal.into()))
}

/// Response body for principal reads; the credential never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrincipalResponseData {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Principal> for PrincipalResponseData {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id.to_string(),
            username: principal.username.as_str().to_string(),
            email: principal.email.as_str().to_string(),
            role: principal.role,
            created_at: principal.created_at,
            updated_at: principal.updated_at,
        }
    }
}
