use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::get_principal::PrincipalResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::Role;
use crate::domain::principal::models::UpdatePrincipalCommand;
use crate::domain::principal::models::Username;
use crate::inbound::http::middleware::CurrentPrincipal;
use crate::inbound::http::router::AppState;
use crate::principal::errors::PrincipalError;
use crate::principal::ports::CredentialServicePort;

pub async fn update_principal(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentPrincipal>,
    Path(principal_id): Path<String>,
    Json(body): Json<UpdatePrincipalRequest>,
) -> Result<ApiSuccess<PrincipalResponseData>, ApiError> {
    let principal_id = PrincipalId::from_string(&principal_id)
        .map_err(|e| ApiError::ValidationFailed(e.to_string()))?;

    // Writable by the principal itself or an admin
    if caller.0.id != principal_id && caller.0.role != Role::Admin {
        return Err(ApiError::Forbidden(
            "only the principal itself or an admin can update this record".to_string(),
        ));
    }

    let command = body.try_into_command()?;

    state
        .credential_service
        .update_principal(&principal_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| ApiSuccess::new(StatusCode::OK, principal.into()))
}

/// HTTP request body for updating a principal (raw JSON)
///
/// The role is deliberately absent: it is set at creation only.
#[derive(Debug, Deserialize)]
pub struct UpdatePrincipalRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdatePrincipalRequest {
    fn try_into_command(self) -> Result<UpdatePrincipalCommand, PrincipalError> {
        let username = self.username.map(Username::new).transpose()?;
        let email = self.email.map(EmailAddress::new).transpose()?;

        Ok(UpdatePrincipalCommand {
            username,
            email,
            password: self.password,
        })
    }
}
