use std::time::Duration;

use async_trait::async_trait;

use super::{FetchError, MenuSource};
use crate::models::{Dish, MenuPayload};

pub struct HttpMenuSource {
    url: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl HttpMenuSource {
    pub fn new(url: String, timeout: Option<Duration>) -> Self {
        Self {
            url,
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MenuSource for HttpMenuSource {
    async fn fetch_menu(&self) -> Result<Vec<Dish>, FetchError> {
        let mut request = self.client.get(&self.url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let resp = request.send().await.map_err(FetchError::Network)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        // Served as text/plain by some hosts, so decode the body ourselves.
        let body = resp.bytes().await.map_err(FetchError::Network)?;
        let payload: MenuPayload = serde_json::from_slice(&body)?;

        tracing::debug!("fetched {} dishes from {}", payload.menu.len(), self.url);
        Ok(payload.menu)
    }
}
