use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::db::{self, queries};
use crate::errors::AppError;
use crate::models::Dish;
use crate::services::catalog::CategorySelection;
use crate::services::menu::MenuSnapshot;
use crate::services::sync::{self, SyncStatus};
use crate::state::AppState;

#[derive(Serialize)]
pub struct DishView {
    name: String,
    description: String,
    price: f64,
    category: String,
    image_url: String,
}

impl DishView {
    fn new(dish: Dish, image_base_url: &str) -> Self {
        let image_url = dish.image_url(image_base_url);
        Self {
            name: dish.name,
            description: dish.description,
            price: dish.price,
            category: dish.category,
            image_url,
        }
    }
}

#[derive(Serialize)]
pub struct MenuResponse {
    revision: u64,
    categories: Vec<String>,
    selected: CategorySelection,
    search: String,
    dishes: Vec<DishView>,
}

impl MenuResponse {
    fn new(snapshot: MenuSnapshot, image_base_url: &str) -> Self {
        Self {
            revision: snapshot.revision,
            categories: snapshot.categories,
            selected: snapshot.selected,
            search: snapshot.search,
            dishes: snapshot
                .visible
                .into_iter()
                .map(|d| DishView::new(d, image_base_url))
                .collect(),
        }
    }
}

// GET /api/menu
pub async fn get_menu(State(state): State<Arc<AppState>>) -> Json<MenuResponse> {
    Json(MenuResponse::new(
        state.menu.snapshot(),
        &state.config.image_base_url,
    ))
}

// GET /api/menu/categories
#[derive(Serialize)]
pub struct CategoryView {
    name: String,
    selected: bool,
}

pub async fn get_categories(State(state): State<Arc<AppState>>) -> Json<Vec<CategoryView>> {
    let snapshot = state.menu.snapshot();
    let categories = snapshot
        .categories
        .into_iter()
        .map(|name| CategoryView {
            selected: snapshot.selected.contains(&name),
            name,
        })
        .collect();
    Json(categories)
}

// POST /api/menu/categories/:category/toggle
pub async fn toggle_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Json<MenuResponse> {
    let snapshot = state.menu.toggle_category(&category);
    Json(MenuResponse::new(snapshot, &state.config.image_base_url))
}

// POST /api/menu/search
#[derive(Deserialize)]
pub struct SearchRequest {
    pub text: String,
}

/// Queues the text behind the debouncer; the result shows up on the next
/// snapshot once typing pauses.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.search.push(req.text);
    (StatusCode::ACCEPTED, Json(serde_json::json!({"ok": true})))
}

// GET /api/menu/status
#[derive(Serialize)]
pub struct MenuStatusResponse {
    dish_count: usize,
    stored_rows: i64,
    last_sync: Option<SyncStatus>,
    last_synced_at: Option<DateTime<Utc>>,
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MenuStatusResponse>, AppError> {
    let stored_rows = {
        let conn = db::lock(&state.db);
        queries::count_dishes(&conn)?
    };

    Ok(Json(MenuStatusResponse {
        dish_count: state.menu.dishes().len(),
        stored_rows,
        last_sync: state.menu.sync_status(),
        last_synced_at: sync::last_synced_at(&state.db),
    }))
}

// GET /api/menu/events — SSE stream of menu snapshots
pub async fn events_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let base_url = state.config.image_base_url.clone();
    let rx = state.menu.subscribe();

    // A snapshot that fails to serialize is skipped rather than sent empty.
    let to_event = move |snapshot: MenuSnapshot| {
        match serde_json::to_string(&MenuResponse::new(snapshot, &base_url)) {
            Ok(data) => Some(Event::default().data(data).event("menu")),
            Err(e) => {
                tracing::warn!("failed to serialize menu snapshot: {e}");
                None
            }
        }
    };

    // Current state first so a new observer does not wait for the next change.
    let initial = to_event(state.menu.snapshot());
    let initial_stream = tokio_stream::iter(initial.map(Ok::<_, Infallible>));

    let live_stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(snapshot) => to_event(snapshot).map(Ok),
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::debug!("menu observer lagged by {skipped} snapshots");
            None
        }
    });

    let keepalive_stream = tokio_stream::StreamExt::map(
        tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(Duration::from_secs(30))),
        |_| Ok(Event::default().comment("keepalive")),
    );

    let combined = initial_stream.chain(live_stream);
    Sse::new(StreamExt::merge(combined, keepalive_stream))
}

// GET /api/menu/dishes/:name/image
pub async fn dish_image(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let dish = state
        .menu
        .find_dish(&name)
        .ok_or_else(|| AppError::NotFound(format!("dish {name}")))?;

    match state.images.fetch(&dish).await {
        Some(image) => {
            let content_type = image
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string());
            Ok(([(header::CONTENT_TYPE, content_type)], image.bytes).into_response())
        }
        None => Err(AppError::NotFound(format!("image for {name}"))),
    }
}
