// Local store for cached API data.
// One file per (kind, id, data type) key; age comes from the file's mtime.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{BuddyError, Result};

use super::paths;

/// Byte storage addressed by a three-part key.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root`. Nothing is created until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn item_path(&self, id: &str, kind: &str, data_type: &str) -> PathBuf {
        paths::item_path(&self.root, kind, id, data_type)
    }

    /// Write bytes for a key, creating the kind directory if needed.
    pub fn store(&self, id: &str, kind: &str, data_type: &str, data: &[u8]) -> Result<()> {
        fs::create_dir_all(paths::kind_dir(&self.root, kind))?;
        let path = self.item_path(id, kind, data_type);
        tracing::debug!(path = %path.display(), bytes = data.len(), "writing cache");

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    /// Read bytes for a key. A missing item is reported as `NotFound`.
    pub fn read(&self, id: &str, kind: &str, data_type: &str) -> Result<Vec<u8>> {
        let path = self.item_path(id, kind, data_type);
        tracing::debug!(path = %path.display(), "reading cache");
        fs::read(&path).map_err(|source| not_found(path, source))
    }

    /// Time since the item was last written, truncated to whole seconds.
    pub fn age(&self, id: &str, kind: &str, data_type: &str) -> Result<Duration> {
        let path = self.item_path(id, kind, data_type);
        let modified = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .map_err(|source| not_found(path, source))?;

        let written_at: DateTime<Utc> = modified.into();
        let elapsed = Utc::now()
            .signed_duration_since(written_at)
            .to_std()
            .unwrap_or(Duration::ZERO);

        Ok(Duration::from_secs(elapsed.as_secs()))
    }

    /// Serialize `data` as JSON and store it.
    pub fn store_json<T: Serialize + ?Sized>(&self, id: &str, kind: &str, data: &T) -> Result<()> {
        let json = serde_json::to_vec(data)?;
        self.store(id, kind, "json", &json)
    }

    /// Read and deserialize a JSON item.
    pub fn read_json<T: DeserializeOwned>(&self, id: &str, kind: &str) -> Result<T> {
        let bytes = self.read(id, kind, "json")?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Store raw text (API key, liked events).
    pub fn store_text(&self, id: &str, kind: &str, text: &str) -> Result<()> {
        self.store(id, kind, "txt", text.as_bytes())
    }

    /// Read raw text, or `None` when the item is absent.
    pub fn read_text(&self, id: &str, kind: &str) -> Result<Option<String>> {
        match self.read(id, kind, "txt") {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(BuddyError::NotFound { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn not_found(path: PathBuf, source: std::io::Error) -> BuddyError {
    BuddyError::NotFound { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_store_and_read_json() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());

        let data = vec![
            TestData {
                name: "first".to_string(),
                value: 1,
            },
            TestData {
                name: "second".to_string(),
                value: 2,
            },
        ];

        store.store_json("conventions", "conventions", &data).unwrap();
        let read: Vec<TestData> = store.read_json("conventions", "conventions").unwrap();
        assert_eq!(read, data);
        assert!(temp_dir.path().join("conventions/conventions.json").exists());
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());

        let err = store.read("nothing", "events", "json").unwrap_err();
        assert!(matches!(err, BuddyError::NotFound { .. }));
        assert!(err.is_cache_miss());

        let err = store.age("nothing", "events", "json").unwrap_err();
        assert!(matches!(err, BuddyError::NotFound { .. }));
    }

    #[test]
    fn test_age_after_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());

        store.store("k", "kind", "json", b"[]").unwrap();
        let first = store.age("k", "kind", "json").unwrap();
        assert!(first < Duration::from_secs(2));
        assert_eq!(first.subsec_nanos(), 0);

        std::thread::sleep(Duration::from_millis(1100));
        let second = store.age("k", "kind", "json").unwrap();
        assert!(second >= first);
    }

    #[test]
    fn test_text_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());

        assert_eq!(store.read_text("client", "apikey").unwrap(), None);
        store.store_text("client", "apikey", "ABC-123").unwrap();
        assert_eq!(
            store.read_text("client", "apikey").unwrap(),
            Some("ABC-123".to_string())
        );
    }

    #[test]
    fn test_overwrite_last_write_wins() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path());

        store.store("k", "kind", "txt", b"one").unwrap();
        store.store("k", "kind", "txt", b"two").unwrap();
        assert_eq!(store.read("k", "kind", "txt").unwrap(), b"two");
        assert!(!temp_dir.path().join("kind/k.tmp").exists());
    }
}
