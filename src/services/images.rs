use crate::models::Dish;

pub struct DishImage {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Downloads dish pictures from the remote image directory. Failures are
/// logged and reported as a missing image; nothing is retried.
pub struct ImageFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl ImageFetcher {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn url_for(&self, dish: &Dish) -> String {
        dish.image_url(&self.base_url)
    }

    pub async fn fetch(&self, dish: &Dish) -> Option<DishImage> {
        let url = self.url_for(dish);

        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("image request for {} failed: {e}", dish.name);
                return None;
            }
        };

        if !resp.status().is_success() {
            tracing::warn!("image for {} answered {}", dish.name, resp.status());
            return None;
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        match resp.bytes().await {
            Ok(bytes) => Some(DishImage {
                content_type,
                bytes: bytes.to_vec(),
            }),
            Err(e) => {
                tracing::warn!("failed to read image for {}: {e}", dish.name);
                None
            }
        }
    }
}
