use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::OnboardingError;
use crate::services::session::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error("invalid onboarding form: {0}")]
    Onboarding(#[from] OnboardingError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Invalid(e) => AppError::Onboarding(e),
            e @ SessionError::NotOnboarded => AppError::Conflict(e.to_string()),
            SessionError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Onboarding(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        };

        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
