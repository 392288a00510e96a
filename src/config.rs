use std::env;
use std::time::Duration;

pub const DEFAULT_MENU_URL: &str =
    "https://raw.githubusercontent.com/Meta-Mobile-Developer-PC/Working-With-Data-API/main/capstone.json";
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://github.com/Meta-Mobile-Developer-PC/Working-With-Data-API/blob/main/images/";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub menu_url: String,
    pub image_base_url: String,
    pub search_debounce: Duration,
    pub fetch_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "little_lemon.db".to_string()),
            menu_url: env::var("MENU_URL").unwrap_or_else(|_| DEFAULT_MENU_URL.to_string()),
            image_base_url: env::var("IMAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_BASE_URL.to_string()),
            search_debounce: Duration::from_millis(
                env::var("SEARCH_DEBOUNCE_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(500),
            ),
            fetch_timeout: env::var("MENU_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),
        }
    }
}
