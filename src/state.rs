use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::SharedConnection;
use crate::services::debounce::Debouncer;
use crate::services::images::ImageFetcher;
use crate::services::menu::MenuViewModel;
use crate::services::profile::ProfileStore;
use crate::services::session::SessionViewModel;

pub struct AppState {
    pub db: SharedConnection,
    pub config: AppConfig,
    pub menu: Arc<MenuViewModel>,
    pub session: SessionViewModel,
    pub search: Debouncer<String>,
    pub images: ImageFetcher,
}

impl AppState {
    /// Wires the view models to the shared connection. Must be called inside
    /// a tokio runtime because the search debouncer spawns a task.
    pub fn new(db: SharedConnection, config: AppConfig) -> Self {
        let menu = Arc::new(MenuViewModel::new());
        let session = SessionViewModel::load(ProfileStore::new(db.clone()));

        let search_target = Arc::clone(&menu);
        let search = Debouncer::spawn(config.search_debounce, move |text: String| {
            search_target.set_search(text);
        });

        let images = ImageFetcher::new(config.image_base_url.clone());

        Self {
            db,
            config,
            menu,
            session,
            search,
            images,
        }
    }
}
