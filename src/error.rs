use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// AuthError
///
/// Failures of an explicit, user-triggered auth operation. These are surfaced
/// to the invoking UI; initialization failures never reach this type's callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("auth service unavailable: {0}")]
    NetworkFailure(String),
    #[error("registration rejected: {0}")]
    RegistrationRejected(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::NetworkFailure(_) => StatusCode::BAD_GATEWAY,
            AuthError::RegistrationRejected(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// GuardDenied
///
/// Why a guard refused a subtree. Carried inside `GuardState::Denied` and
/// turned into a redirect; never propagated as an `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum GuardDenied {
    #[error("login required")]
    Unauthenticated,
    #[error("insufficient role")]
    InsufficientRole,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("client storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("client storage json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("client storage unavailable")]
    Unavailable,
}
