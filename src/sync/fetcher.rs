use super::traits::RuleFetcher;
use crate::error::{SyncError, SyncResult};
use crate::rules::RemotePayload;
use reqwest::Client;
use tracing::info;

/// HTTP implementation of `RuleFetcher`. One attempt per call; retry policy
/// belongs to the caller's schedule, not here.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent("FeedBlock/0.1")
                .build()
                .unwrap(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RuleFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> SyncResult<RemotePayload> {
        info!("Fetching rule document from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::HttpStatus(status.as_u16()));
        }

        response
            .json::<RemotePayload>()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))
    }
}
