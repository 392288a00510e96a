pub mod http;

use async_trait::async_trait;

use crate::models::Dish;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("menu request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("menu source answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("menu document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Where the authoritative dish list comes from.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch_menu(&self) -> Result<Vec<Dish>, FetchError>;
}
