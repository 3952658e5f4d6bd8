//! Whole-catalogue JSON document on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use mediashelf_inventory::Item;

use super::{ItemRepository, StorageError};

/// Stores the catalogue as one pretty-printed JSON array, rewritten in full on
/// every save.
///
/// Saves go through a temp file in the same directory that is renamed over
/// the target, so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Four-space indentation, matching files written by earlier releases.
fn encode(items: &[Item]) -> Result<Vec<u8>, StorageError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    items
        .serialize(&mut ser)
        .map_err(|e| StorageError::Encode(e.to_string()))?;
    Ok(buf)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait::async_trait]
impl ItemRepository for JsonFileRepository {
    async fn load(&self) -> Result<Option<Vec<Item>>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let items: Vec<Item> =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        debug!(path = %self.path.display(), count = items.len(), "loaded catalogue file");
        Ok(Some(items))
    }

    async fn save(&self, items: &[Item]) -> Result<(), StorageError> {
        let bytes = encode(items)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
            .await
            .map_err(|e| self.io_error(std::io::Error::other(e)))?
            .map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), count = items.len(), "wrote catalogue file");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediashelf_core::Entity;
    use mediashelf_inventory::seed_catalogue;

    fn repo_in(dir: &tempfile::TempDir) -> JsonFileRepository {
        JsonFileRepository::new(dir.path().join("library_data.json"))
    }

    #[tokio::test]
    async fn missing_file_loads_as_nothing_persisted() {
        let dir = tempfile::tempdir().unwrap();
        assert!(repo_in(&dir).load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_items() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(&dir);
        let items = seed_catalogue();

        repo.save(&items).await.unwrap();
        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, items);
    }

    #[tokio::test]
    async fn empty_array_is_persisted_but_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(&dir);
        repo.save(&[]).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn file_is_an_indented_array_of_records() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(&dir);
        repo.save(&seed_catalogue()[..1]).await.unwrap();

        let text = std::fs::read_to_string(repo.path()).unwrap();
        assert!(text.starts_with("[\n    {\n        \"id\": 1,"), "unexpected layout:\n{text}");

        let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            raw,
            serde_json::json!([{
                "id": 1,
                "type": "book",
                "title": "The Pragmatic Engineer",
                "author": "John Doe",
                "year": 2020
            }])
        );
    }

    #[tokio::test]
    async fn garbage_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(&dir);
        std::fs::write(repo.path(), b"{ not json").unwrap();

        let err = repo.load().await.unwrap_err();
        assert!(err.is_corrupt(), "got {err:?}");
    }

    #[tokio::test]
    async fn invalid_records_are_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(&dir);
        std::fs::write(repo.path(), br#"[{"id": 1, "type": "comic", "title": "X"}]"#).unwrap();

        assert!(repo.load().await.unwrap_err().is_corrupt());
    }

    #[tokio::test]
    async fn records_from_older_files_tolerate_null_author() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(&dir);
        std::fs::write(
            repo.path(),
            br#"[{"id": 4, "type": "film", "title": "Heat", "author": null, "year": null}]"#,
        )
        .unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded[0].id().get(), 4);
        assert_eq!(loaded[0].author(), "");
    }

    #[tokio::test]
    async fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested/deeper/items.json"));
        repo.save(&seed_catalogue()).await.unwrap();
        assert!(repo.path().exists());
    }
}
