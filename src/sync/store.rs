use super::traits::RuleStore;
use crate::error::{SyncError, SyncResult};
use crate::rules::StoredRules;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

/// `RuleStore` backed by a single JSON document on disk.
///
/// Single-writer design: the sync loop is the only writer, so a plain
/// overwrite is sufficient.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl RuleStore for JsonFileStore {
    async fn load(&self) -> SyncResult<Option<StoredRules>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SyncError::StorageUnavailable(e.to_string())),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| SyncError::Storage(format!("corrupt rule document: {}", e)))
    }

    async fn save(&self, rules: &StoredRules) -> SyncResult<()> {
        let json = serde_json::to_string_pretty(rules)
            .map_err(|e| SyncError::Storage(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SyncError::StorageUnavailable(e.to_string()))?;
            }
        }

        fs::write(&self.path, json)
            .await
            .map_err(|e| SyncError::Storage(e.to_string()))
    }
}
