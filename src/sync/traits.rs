use crate::error::SyncResult;
use crate::rules::{RemotePayload, StoredRules};

/// Remote side of a sync: fetches the published rule document.
#[async_trait::async_trait]
pub trait RuleFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> SyncResult<RemotePayload>;
}

/// Durability side of a sync. One attempt per call, no retries; failures
/// surface as storage errors for the orchestrator to report.
#[async_trait::async_trait]
pub trait RuleStore: Send + Sync {
    /// Returns `None` when nothing has been persisted yet.
    async fn load(&self) -> SyncResult<Option<StoredRules>>;

    async fn save(&self, rules: &StoredRules) -> SyncResult<()>;
}
