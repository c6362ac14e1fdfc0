// src/store.rs

use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::{io::AsyncWriteExt, sync::Mutex};

/// Errors raised while loading or persisting a JSON document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A named JSON document held in memory and rewritten in full on every mutation.
///
/// The in-memory value sits behind an async mutex, so every
/// read-modify-persist sequence through [`Document::update`] is one critical
/// section. Mutations are applied to a copy and only swapped in once the copy
/// has reached disk; a failed closure or a failed write leaves both the
/// in-memory value and the file untouched.
#[derive(Debug)]
pub struct Document<T> {
    path: PathBuf,
    value: Mutex<T>,
}

impl<T> Document<T>
where
    T: Serialize + DeserializeOwned + Clone + Send,
{
    /// Loads the document at `path`, creating it with `default` if it does not exist.
    pub async fn open(path: impl Into<PathBuf>, default: T) -> Result<Self, StoreError> {
        let path = path.into();

        let value = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::json(&path, e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Initializing {}", path.display());
                write_atomic(&path, &default).await?;
                default
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        Ok(Self {
            path,
            value: Mutex::new(value),
        })
    }

    /// Runs `f` against the current value.
    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.value.lock().await;
        f(&guard)
    }

    /// Returns a clone of the current value.
    pub async fn snapshot(&self) -> T {
        self.value.lock().await.clone()
    }

    /// Applies `f` and persists the result if it succeeds.
    pub async fn update<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.value.lock().await;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        write_atomic(&self.path, &next).await?;
        *guard = next;
        Ok(out)
    }

    /// Rewrites the file from the in-memory value.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let guard = self.value.lock().await;
        write_atomic(&self.path, &*guard).await
    }
}

/// Writes `value` as pretty JSON to a sibling temp file, syncs it, then renames it over `path`.
async fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| StoreError::json(path, e))?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| StoreError::io(dir, e))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .map_err(|e| StoreError::io(&tmp_path, e))?;
    file.write_all(&bytes)
        .await
        .map_err(|e| StoreError::io(&tmp_path, e))?;
    // Contents must be durable before the rename makes them visible.
    file.sync_all()
        .await
        .map_err(|e| StoreError::io(&tmp_path, e))?;
    drop(file);

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| StoreError::io(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug)]
    struct Rejected;

    impl From<StoreError> for Rejected {
        fn from(_: StoreError) -> Self {
            Rejected
        }
    }

    #[tokio::test]
    async fn open_creates_missing_file_with_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("items.json");

        let doc = Document::open(&path, vec![1, 2, 3]).await.unwrap();

        assert_eq!(doc.snapshot().await, vec![1, 2, 3]);
        let on_disk: Vec<i32> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn open_prefers_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, "[7]").unwrap();

        let doc = Document::open(&path, Vec::<i32>::new()).await.unwrap();

        assert_eq!(doc.snapshot().await, vec![7]);
    }

    #[tokio::test]
    async fn open_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = Document::open(&path, Vec::<i32>::new()).await.unwrap_err();

        assert!(matches!(err, StoreError::Json { .. }));
    }

    #[tokio::test]
    async fn update_persists_and_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        let doc = Document::open(&path, Vec::<i32>::new()).await.unwrap();

        let len = doc
            .update(|items| {
                items.push(42);
                Ok::<_, StoreError>(items.len())
            })
            .await
            .unwrap();
        assert_eq!(len, 1);

        let reopened = Document::open(&path, Vec::<i32>::new()).await.unwrap();
        assert_eq!(reopened.snapshot().await, vec![42]);
        assert!(!dir.path().join("items.json.tmp").exists());
    }

    #[tokio::test]
    async fn failed_write_leaves_memory_and_disk_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        let doc = Document::open(&path, vec![1]).await.unwrap();
        let before = std::fs::read(&path).unwrap();
        std::fs::create_dir(dir.path().join("items.json.tmp")).unwrap();

        let err = doc
            .update(|items| {
                items.push(2);
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Io { .. }));
        assert_eq!(doc.snapshot().await, vec![1]);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_are_all_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        let doc = std::sync::Arc::new(Document::open(&path, Vec::<u32>::new()).await.unwrap());

        let handles: Vec<_> = (0..32)
            .map(|n| {
                let doc = doc.clone();
                tokio::spawn(async move {
                    doc.update(|items| {
                        items.push(n);
                        Ok::<_, StoreError>(())
                    })
                    .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut in_memory = doc.snapshot().await;
        in_memory.sort_unstable();
        assert_eq!(in_memory, (0..32).collect::<Vec<_>>());

        let mut on_disk: Vec<u32> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        on_disk.sort_unstable();
        assert_eq!(on_disk, in_memory);
    }

    #[tokio::test]
    async fn failed_update_leaves_memory_and_disk_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        let doc = Document::open(&path, vec![1]).await.unwrap();
        let before = std::fs::read(&path).unwrap();

        let result: Result<(), Rejected> = doc
            .update(|items| {
                items.clear();
                Err(Rejected)
            })
            .await;

        assert!(result.is_err());
        assert_eq!(doc.snapshot().await, vec![1]);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}
