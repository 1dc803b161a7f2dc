use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::errors::StoreError;
use crate::store::PartialStore;

/// Fetches partials from a static file server as `<base_url>/<name>`.
#[derive(Clone)]
pub struct HttpPartialStore {
    client: Client,
    base_url: String,
}

impl HttpPartialStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport {
                name: String::new(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.trim_start_matches('/'))
    }
}

#[async_trait]
impl PartialStore for HttpPartialStore {
    async fn get(&self, name: &str) -> Result<String, StoreError> {
        let url = self.url_for(name);
        debug!("Fetching partial '{}' from {}", name, url);

        let transport = |e: reqwest::Error| StoreError::Transport {
            name: name.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(&url).send().await.map_err(transport)?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(name.to_string()));
        }

        if !status.is_success() {
            warn!("Partial server returned {} for {}", status, url);
            return Err(StoreError::Transport {
                name: name.to_string(),
                message: format!("unexpected status {status}"),
            });
        }

        response.text().await.map_err(transport)
    }
}
