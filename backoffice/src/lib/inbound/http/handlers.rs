use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::principal::errors::PrincipalError;

pub mod delete_principal;
pub mod get_principal;
pub mod login;
pub mod signup;
pub mod update_principal;

/// Successful API response: a status code and a JSON body.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// API failure taxonomy. Every variant maps to exactly one status code and a
/// `{"message": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    ValidationFailed(String),
    Unauthenticated(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ValidationFailed(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(detail) => {
                // Detail stays in the server log; the caller gets a generic
                // message
                tracing::error!(error = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ApiErrorBody { message })).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
}

impl From<PrincipalError> for ApiError {
    fn from(err: PrincipalError) -> Self {
        match err {
            PrincipalError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PrincipalError::UsernameAlreadyExists(_) | PrincipalError::EmailAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            PrincipalError::InvalidCredentials => ApiError::Unauthenticated(err.to_string()),
            PrincipalError::Forbidden { .. } => ApiError::Forbidden(err.to_string()),
            PrincipalError::InvalidPrincipalId(_)
            | PrincipalError::InvalidUsername(_)
            | PrincipalError::InvalidEmail(_)
            | PrincipalError::InvalidRole(_)
            | PrincipalError::Password(auth::PasswordError::TooShort { .. }) => {
                ApiError::ValidationFailed(err.to_string())
            }
            PrincipalError::Token(
                auth::TokenError::Malformed(_)
                | auth::TokenError::BadSignature
                | auth::TokenError::Expired,
            ) => ApiError::Unauthenticated(err.to_string()),
            PrincipalError::Password(_)
            | PrincipalError::Token(_)
            | PrincipalError::StoreFailure(_)
            | PrincipalError::Unknown(_) => ApiError::Internal(err.to_string()),
        }
    }
}
