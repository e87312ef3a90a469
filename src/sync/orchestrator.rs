use super::traits::{RuleFetcher, RuleStore};
use crate::error::SyncResult;
use crate::rules::{merge, RuleSet, StoredRules};
use std::sync::Arc;
use tracing::info;

/// Result of one successful sync pass, with version metadata copied through
/// from the remote document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub merged: usize,
    pub skipped: usize,
    pub remote_version: Option<String>,
    pub last_updated: Option<String>,
}

/// Composes fetch → merge → persist over the collaborator traits.
///
/// Owns the session's rule set as an explicit value; callers serialize access
/// by owning the engine (single writer, no internal locking). A persistence
/// failure leaves the in-memory rules merged but not durable; reload from
/// the store for a consistent view.
pub struct SyncEngine {
    fetcher: Arc<dyn RuleFetcher>,
    store: Arc<dyn RuleStore>,
    rules_url: String,
    rules: RuleSet,
    version: Option<String>,
    last_updated: Option<String>,
}

impl SyncEngine {
    pub fn new(
        fetcher: Arc<dyn RuleFetcher>,
        store: Arc<dyn RuleStore>,
        rules_url: String,
        initial: StoredRules,
    ) -> Self {
        let mut rules = initial.block_rules;
        rules.normalize();
        Self {
            fetcher,
            store,
            rules_url,
            rules,
            version: initial.version,
            last_updated: initial.last_updated,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    pub async fn sync(&mut self, overwrite_existing: bool) -> SyncResult<SyncReport> {
        let payload = self.fetcher.fetch(&self.rules_url).await?;
        let outcome = merge(&mut self.rules, &payload, overwrite_existing)?;

        self.version = payload.version.clone();
        self.last_updated = payload.last_updated.clone();

        let stored = StoredRules {
            block_rules: self.rules.clone(),
            version: self.version.clone(),
            last_updated: self.last_updated.clone(),
        };
        self.store.save(&stored).await?;

        info!(
            "Rule sync complete: {} merged, {} skipped (remote version {})",
            outcome.merged,
            outcome.skipped,
            self.version.as_deref().unwrap_or("unknown")
        );

        Ok(SyncReport {
            merged: outcome.merged,
            skipped: outcome.skipped,
            remote_version: payload.version,
            last_updated: payload.last_updated,
        })
    }
}
