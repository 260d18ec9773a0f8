use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use crate::domain::principal::models::PrincipalId;
use crate::inbound::http::router::AppState;
use crate::principal::ports::CredentialServicePort;

pub async fn delete_principal(
    State(state): State<AppState>,
    Path(principal_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let principal_id = PrincipalId::from_string(&principal_id)
        .map_err(|e| ApiError::ValidationFailed(e.to_string()))?;

    state
        .credential_service
        .delete_principal(&principal_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
