use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{OnboardingForm, Profile};
use crate::services::session::SessionState;
use crate::state::AppState;

// GET /api/session
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionState> {
    Json(state.session.current())
}

// POST /api/onboarding
pub async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    Json(form): Json<OnboardingForm>,
) -> Result<Json<SessionState>, AppError> {
    Ok(Json(state.session.complete_onboarding(&form)?))
}

// GET /api/profile
pub async fn get_profile(State(state): State<Arc<AppState>>) -> Json<Profile> {
    Json(state.session.current().profile)
}

// PUT /api/profile
pub async fn save_profile(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<Profile>,
) -> Result<Json<SessionState>, AppError> {
    Ok(Json(state.session.save_profile(profile)?))
}

// PUT /api/profile/avatar
#[derive(Deserialize)]
pub struct AvatarRequest {
    pub avatar: Option<String>,
}

pub async fn update_avatar(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AvatarRequest>,
) -> Result<Json<SessionState>, AppError> {
    Ok(Json(state.session.update_avatar(req.avatar)?))
}

// POST /api/logout
pub async fn logout(State(state): State<Arc<AppState>>) -> Result<Json<SessionState>, AppError> {
    Ok(Json(state.session.logout()?))
}
