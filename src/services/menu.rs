use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::Dish;
use crate::services::catalog::{self, CategorySelection};
use crate::services::sync::SyncStatus;

/// What observers of the menu see after each recomputation.
#[derive(Debug, Clone, Serialize)]
pub struct MenuSnapshot {
    pub revision: u64,
    pub categories: Vec<String>,
    pub selected: CategorySelection,
    pub search: String,
    pub visible: Vec<Dish>,
}

#[derive(Default)]
struct MenuState {
    dishes: Vec<Dish>,
    categories: Vec<String>,
    selected: CategorySelection,
    search: String,
    visible: Vec<Dish>,
    revision: u64,
    last_sync: Option<SyncStatus>,
}

impl MenuState {
    fn snapshot(&self) -> MenuSnapshot {
        MenuSnapshot {
            revision: self.revision,
            categories: self.categories.clone(),
            selected: self.selected.clone(),
            search: self.search.clone(),
            visible: self.visible.clone(),
        }
    }
}

/// Shared menu state: the authoritative dish list plus the user's category
/// selection and search text. Any change to the three inputs recomputes the
/// visible subset and publishes a new snapshot.
pub struct MenuViewModel {
    state: Mutex<MenuState>,
    events: broadcast::Sender<MenuSnapshot>,
}

impl Default for MenuViewModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuViewModel {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state: Mutex::new(MenuState::default()),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MenuState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn recompute(&self, state: &mut MenuState) -> MenuSnapshot {
        state.visible = catalog::filter_dishes(&state.dishes, &state.selected, &state.search);
        state.revision += 1;

        let snapshot = state.snapshot();
        tracing::debug!(
            revision = snapshot.revision,
            visible = snapshot.visible.len(),
            "menu recomputed"
        );
        // No subscribers is fine.
        let _ = self.events.send(snapshot.clone());
        snapshot
    }

    pub fn set_dishes(&self, dishes: Vec<Dish>) -> MenuSnapshot {
        let mut state = self.lock();
        state.categories = catalog::extract_categories(&dishes);
        state.dishes = dishes;
        self.recompute(&mut state)
    }

    pub fn toggle_category(&self, category: &str) -> MenuSnapshot {
        let mut state = self.lock();
        state.selected.toggle(category);
        self.recompute(&mut state)
    }

    pub fn set_search(&self, search: String) -> MenuSnapshot {
        let mut state = self.lock();
        state.search = search;
        self.recompute(&mut state)
    }

    pub fn snapshot(&self) -> MenuSnapshot {
        self.lock().snapshot()
    }

    pub fn dishes(&self) -> Vec<Dish> {
        self.lock().dishes.clone()
    }

    pub fn find_dish(&self, name: &str) -> Option<Dish> {
        self.lock().dishes.iter().find(|d| d.name == name).cloned()
    }

    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    pub fn record_sync(&self, status: SyncStatus) {
        self.lock().last_sync = Some(status);
    }

    pub fn sync_status(&self) -> Option<SyncStatus> {
        self.lock().last_sync.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MenuSnapshot> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish(name: &str, category: &str) -> Dish {
        Dish {
            name: name.to_string(),
            description: String::new(),
            price: 10.0,
            image: String::new(),
            category: category.to_string(),
        }
    }

    fn visible_names(snapshot: &MenuSnapshot) -> Vec<&str> {
        snapshot.visible.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_every_input_change_recomputes() {
        let menu = MenuViewModel::new();
        assert_eq!(menu.revision(), 0);

        let snap = menu.set_dishes(vec![
            dish("Pizza", "Mains"),
            dish("Salad", "Starters"),
            dish("Pasta", "Mains"),
        ]);
        assert_eq!(snap.revision, 1);
        assert_eq!(snap.categories, vec!["Mains", "Starters"]);
        assert_eq!(snap.visible.len(), 3);

        let snap = menu.toggle_category("Mains");
        assert_eq!(visible_names(&snap), vec!["Pizza", "Pasta"]);

        let snap = menu.set_search("Piz".to_string());
        assert_eq!(visible_names(&snap), vec!["Pizza"]);

        menu.toggle_category("Mains");
        let snap = menu.set_search("a".to_string());
        assert_eq!(visible_names(&snap), vec!["Salad", "Pasta"]);
        assert_eq!(snap.revision, 5);
    }

    #[test]
    fn test_replacing_dishes_keeps_filters() {
        let menu = MenuViewModel::new();
        menu.toggle_category("Desserts");
        menu.set_dishes(vec![dish("Pizza", "Mains")]);
        assert!(menu.snapshot().visible.is_empty());

        let snap = menu.set_dishes(vec![dish("Pizza", "Mains"), dish("Lemon Cake", "Desserts")]);
        assert_eq!(visible_names(&snap), vec!["Lemon Cake"]);
    }

    #[tokio::test]
    async fn test_subscribers_receive_snapshots() {
        let menu = MenuViewModel::new();
        let mut rx = menu.subscribe();

        menu.set_dishes(vec![dish("Pizza", "Mains")]);
        let snap = rx.recv().await.unwrap();
        assert_eq!(snap.revision, 1);
        assert_eq!(visible_names(&snap), vec!["Pizza"]);
    }

    #[test]
    fn test_find_dish() {
        let menu = MenuViewModel::new();
        menu.set_dishes(vec![dish("Pizza", "Mains")]);
        assert_eq!(menu.find_dish("Pizza").map(|d| d.category), Some("Mains".to_string()));
        assert!(menu.find_dish("pizza").is_none());
    }
}
