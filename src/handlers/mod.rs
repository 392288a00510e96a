pub mod health;
pub mod menu;
pub mod profile;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/session", get(profile::get_session))
        .route("/api/onboarding", post(profile::complete_onboarding))
        .route(
            "/api/profile",
            get(profile::get_profile).put(profile::save_profile),
        )
        .route("/api/profile/avatar", put(profile::update_avatar))
        .route("/api/logout", post(profile::logout))
        .route("/api/menu", get(menu::get_menu))
        .route("/api/menu/categories", get(menu::get_categories))
        .route(
            "/api/menu/categories/:category/toggle",
            post(menu::toggle_category),
        )
        .route("/api/menu/search", post(menu::search))
        .route("/api/menu/status", get(menu::get_status))
        .route("/api/menu/events", get(menu::events_stream))
        .route("/api/menu/dishes/:name/image", get(menu::dish_image))
        .with_state(state)
}
