use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use feedblock::error::{SyncError, SyncResult};
use feedblock::rules::{Category, Platform, RemotePayload, RuleSet, StoredRules};
use feedblock::sync::{JsonFileStore, RuleFetcher, RuleStore, SyncEngine};

// --- Mocks ---

struct StaticFetcher {
    body: String,
}

impl StaticFetcher {
    fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl RuleFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> SyncResult<RemotePayload> {
        serde_json::from_str(&self.body).map_err(|e| SyncError::Network(e.to_string()))
    }
}

struct FailingFetcher;

#[async_trait]
impl RuleFetcher for FailingFetcher {
    async fn fetch(&self, _url: &str) -> SyncResult<RemotePayload> {
        Err(SyncError::HttpStatus(503))
    }
}

#[derive(Default)]
struct MemoryStore {
    saved: Mutex<Option<StoredRules>>,
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn load(&self) -> SyncResult<Option<StoredRules>> {
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn save(&self, rules: &StoredRules) -> SyncResult<()> {
        *self.saved.lock().unwrap() = Some(rules.clone());
        Ok(())
    }
}

struct RejectingStore;

#[async_trait]
impl RuleStore for RejectingStore {
    async fn load(&self) -> SyncResult<Option<StoredRules>> {
        Ok(None)
    }

    async fn save(&self, _rules: &StoredRules) -> SyncResult<()> {
        Err(SyncError::Storage("disk full".to_string()))
    }
}

fn seeded_initial() -> StoredRules {
    let mut rules = RuleSet::new();
    rules
        .platform_mut(Platform::Bilibili)
        .keywords
        .push("Foo".to_string());
    StoredRules {
        block_rules: rules,
        version: None,
        last_updated: None,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_sync_merges_and_persists() {
    let fetcher = Arc::new(StaticFetcher::new(
        r#"{
            "blockRules": {
                "bilibili": {"keywords": ["foo", " Bar "], "blacklist": [], "whitelist": []}
            },
            "version": "12",
            "lastUpdated": "2024-11-02"
        }"#,
    ));
    let store = Arc::new(MemoryStore::default());

    let mut engine = SyncEngine::new(
        fetcher,
        store.clone(),
        "http://unused.test/rules.json".to_string(),
        seeded_initial(),
    );

    let report = engine.sync(false).await.unwrap();
    assert_eq!(report.merged, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.remote_version.as_deref(), Some("12"));

    assert_eq!(
        engine.rules().rules(Platform::Bilibili, Category::Keywords),
        ["Foo", "Bar"]
    );

    let saved = store.load().await.unwrap().expect("persisted document");
    assert_eq!(
        saved.block_rules.rules(Platform::Bilibili, Category::Keywords),
        ["Foo", "Bar"]
    );
    assert_eq!(saved.version.as_deref(), Some("12"));
}

#[tokio::test]
async fn test_fetch_failure_leaves_rules_and_store_untouched() {
    let store = Arc::new(MemoryStore::default());
    let mut engine = SyncEngine::new(
        Arc::new(FailingFetcher),
        store.clone(),
        "http://unused.test/rules.json".to_string(),
        seeded_initial(),
    );

    let err = engine.sync(false).await.unwrap_err();
    assert!(matches!(err, SyncError::HttpStatus(503)));
    assert_eq!(
        engine.rules().rules(Platform::Bilibili, Category::Keywords),
        ["Foo"]
    );
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_payload_is_rejected_before_persisting() {
    let store = Arc::new(MemoryStore::default());
    let mut engine = SyncEngine::new(
        Arc::new(StaticFetcher::new(r#"{"version": "12"}"#)),
        store.clone(),
        "http://unused.test/rules.json".to_string(),
        seeded_initial(),
    );

    let err = engine.sync(false).await.unwrap_err();
    assert!(matches!(err, SyncError::InvalidRemoteFormat));
    assert!(store.load().await.unwrap().is_none());
    // Version metadata from the bad payload is not taken over either.
    assert!(engine.version().is_none());
}

#[tokio::test]
async fn test_persist_failure_reports_error_but_keeps_merge_in_memory() {
    let mut engine = SyncEngine::new(
        Arc::new(StaticFetcher::new(
            r#"{"blockRules": {"twitter": {"blacklist": ["bot"]}}}"#,
        )),
        Arc::new(RejectingStore),
        "http://unused.test/rules.json".to_string(),
        StoredRules::default(),
    );

    let err = engine.sync(false).await.unwrap_err();
    assert!(matches!(err, SyncError::Storage(_)));
    // No rollback: the in-memory rules diverge from storage until the next
    // successful persist.
    assert_eq!(
        engine.rules().rules(Platform::Twitter, Category::Blacklist),
        ["bot"]
    );
}

#[tokio::test]
async fn test_overwrite_sync_replaces_local_casing() {
    let fetcher = Arc::new(StaticFetcher::new(
        r#"{"blockRules": {"bilibili": {"keywords": ["  fOO "]}}}"#,
    ));
    let mut engine = SyncEngine::new(
        fetcher,
        Arc::new(MemoryStore::default()),
        "http://unused.test/rules.json".to_string(),
        seeded_initial(),
    );

    let report = engine.sync(true).await.unwrap();
    assert_eq!(report.merged, 0);
    assert_eq!(report.skipped, 0);
    assert_eq!(
        engine.rules().rules(Platform::Bilibili, Category::Keywords),
        ["fOO"]
    );
}

#[tokio::test]
async fn test_sync_against_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.json");

    let fetcher = Arc::new(StaticFetcher::new(
        r#"{"blockRules": {"youtube": {"keywords": ["shorts"]}}, "version": "1"}"#,
    ));
    let store = Arc::new(JsonFileStore::new(&path));

    let mut engine = SyncEngine::new(
        fetcher,
        store.clone(),
        "http://unused.test/rules.json".to_string(),
        StoredRules::default(),
    );
    engine.sync(false).await.unwrap();

    // A fresh session picks the merged rules back up from disk.
    let reloaded = store.load().await.unwrap().expect("persisted document");
    assert_eq!(
        reloaded.block_rules.rules(Platform::Youtube, Category::Keywords),
        ["shorts"]
    );
    assert_eq!(reloaded.version.as_deref(), Some("1"));
}
