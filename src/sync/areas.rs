//! Best-effort loading of the live-area catalog shown in the rule editor.
//!
//! Providers form an ordered fallback chain: remote catalog, then the
//! compiled-in default list, then an always-succeeding empty list. A provider
//! failure is logged and the next one is tried; the chain as a whole never
//! fails.

use crate::error::{SyncError, SyncResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One filterable live area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
}

#[async_trait::async_trait]
pub trait AreaProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn load(&self) -> SyncResult<Vec<Area>>;
}

pub struct RemoteAreaProvider {
    client: Client,
    url: String,
}

impl RemoteAreaProvider {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::builder()
                .user_agent("FeedBlock/0.1")
                .build()
                .unwrap(),
            url,
        }
    }
}

#[async_trait::async_trait]
impl AreaProvider for RemoteAreaProvider {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn load(&self) -> SyncResult<Vec<Area>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::HttpStatus(status.as_u16()));
        }

        response
            .json::<Vec<Area>>()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))
    }
}

const DEFAULT_AREAS: &[(&str, &str)] = &[
    ("1", "entertainment"),
    ("2", "gaming"),
    ("3", "music"),
    ("4", "vtuber"),
    ("5", "radio"),
];

/// Compiled-in default catalog, used when the remote one is unreachable.
pub struct BundledAreaProvider;

#[async_trait::async_trait]
impl AreaProvider for BundledAreaProvider {
    fn name(&self) -> &'static str {
        "bundled"
    }

    async fn load(&self) -> SyncResult<Vec<Area>> {
        Ok(DEFAULT_AREAS
            .iter()
            .map(|(id, name)| Area {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect())
    }
}

/// Chain terminator; always succeeds with an empty catalog.
pub struct EmptyAreaProvider;

#[async_trait::async_trait]
impl AreaProvider for EmptyAreaProvider {
    fn name(&self) -> &'static str {
        "empty"
    }

    async fn load(&self) -> SyncResult<Vec<Area>> {
        Ok(Vec::new())
    }
}

/// The standard chain: remote (when configured), bundled defaults, empty.
pub fn default_chain(remote_url: Option<String>) -> Vec<Box<dyn AreaProvider>> {
    let mut providers: Vec<Box<dyn AreaProvider>> = Vec::new();
    if let Some(url) = remote_url {
        providers.push(Box::new(RemoteAreaProvider::new(url)));
    }
    providers.push(Box::new(BundledAreaProvider));
    providers.push(Box::new(EmptyAreaProvider));
    providers
}

/// Tries each provider in order, returning the first successful result.
pub async fn load_area_list(providers: &[Box<dyn AreaProvider>]) -> Vec<Area> {
    for provider in providers {
        match provider.load().await {
            Ok(areas) => return areas,
            Err(e) => warn!("Area provider '{}' failed: {}", provider.name(), e),
        }
    }
    Vec::new()
}
