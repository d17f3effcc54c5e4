use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ig_core::{AngleHistory, AngleStore, Error, Result};

/// Angle history kept as a pretty-printed JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl AngleStore for JsonFileStore {
    fn name(&self) -> &str {
        "json"
    }

    async fn load(&self) -> AngleHistory {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return AngleHistory::new(),
            Err(e) => {
                tracing::warn!("Could not read history file {}: {}", self.path.display(), e);
                return AngleHistory::new();
            }
        };

        match serde_json::from_str(&text) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable history file {}: {}",
                    self.path.display(),
                    e
                );
                AngleHistory::new()
            }
        }
    }

    async fn persist(&self, history: &AngleHistory) -> Result<()> {
        let storage_err =
            |e: std::io::Error| Error::Storage(format!("{}: {}", self.path.display(), e));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(storage_err)?;
        }

        let text = serde_json::to_string_pretty(history)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, text).await.map_err(storage_err)?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(storage_err(e));
        }

        tracing::debug!("Wrote {} history entries to {}", history.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("history.json"));
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_persist_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/history.json");
        let store = JsonFileStore::new(&path);

        let mut history = AngleHistory::new();
        history.record("https://site.com/a", "hälsovinkel");
        history.record("https://site.com/a", "cost angle");
        store.persist(&history).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("hälsovinkel"));
        assert!(text.contains('\n'));
        assert!(!store.temp_path().exists());

        let loaded = store.load().await;
        assert_eq!(loaded, history);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");

        std::fs::write(&path, "{not json").unwrap();
        assert!(JsonFileStore::new(&path).load().await.is_empty());

        std::fs::write(&path, r#"["a", "b"]"#).unwrap();
        assert!(JsonFileStore::new(&path).load().await.is_empty());

        std::fs::write(&path, r#"{"https://a": "not a list"}"#).unwrap();
        assert!(JsonFileStore::new(&path).load().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_rename_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();

        let store = JsonFileStore::new(&path);
        let mut history = AngleHistory::new();
        history.record("https://site.com/a", "angle");
        let err = store.persist(&history).await.unwrap_err();

        assert!(matches!(err, Error::Storage(_)));
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_persist_failure_is_storage_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let store = JsonFileStore::new(blocker.join("history.json"));
        let err = store.persist(&AngleHistory::new()).await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
