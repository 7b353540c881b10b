// tattva/src/cache.rs

//! Offline snapshot of a collection, used to seed a list before the first
//! fetch. The record store stays canonical: snapshots are written only from
//! successful fetches.

use crate::error::{TattvaError, TattvaResult};
use crate::store::StoredDocument;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

#[async_trait]
pub trait SnapshotCache: Send + Sync {
  async fn load(&self, collection: &str) -> TattvaResult<Option<Vec<StoredDocument>>>;

  async fn save(&self, collection: &str, docs: &[StoredDocument]) -> TattvaResult<()>;
}

type Snapshots = HashMap<String, Vec<StoredDocument>>;

/// All snapshots in one JSON file, one key per collection. Writes go to a
/// sibling temp file which is then renamed over the original.
#[derive(Debug)]
pub struct JsonFileCache {
  path: PathBuf,
  // Serialises read-modify-write cycles on the file.
  lock: tokio::sync::Mutex<()>,
}

impl JsonFileCache {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      lock: tokio::sync::Mutex::new(()),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  async fn read_all(&self) -> TattvaResult<Snapshots> {
    match fs::read(&self.path).await {
      Ok(bytes) if bytes.is_empty() => Ok(Snapshots::new()),
      Ok(bytes) => serde_json::from_slice(&bytes)
        .map_err(|e| TattvaError::Cache(format!("{} is not a valid snapshot file: {}", self.path.display(), e))),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(Snapshots::new()),
      Err(e) => Err(TattvaError::Cache(format!("reading {}: {}", self.path.display(), e))),
    }
  }
}

#[async_trait]
impl SnapshotCache for JsonFileCache {
  #[instrument(name = "JsonFileCache::load", skip(self), fields(path = %self.path.display()))]
  async fn load(&self, collection: &str) -> TattvaResult<Option<Vec<StoredDocument>>> {
    let _guard = self.lock.lock().await;
    Ok(self.read_all().await?.remove(collection))
  }

  #[instrument(name = "JsonFileCache::save", skip(self, docs), fields(path = %self.path.display(), count = docs.len()))]
  async fn save(&self, collection: &str, docs: &[StoredDocument]) -> TattvaResult<()> {
    let _guard = self.lock.lock().await;
    let mut all = self.read_all().await?;
    all.insert(collection.to_string(), docs.to_vec());

    let bytes = serde_json::to_vec_pretty(&all).map_err(|e| TattvaError::Cache(e.to_string()))?;
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)
        .await
        .map_err(|e| TattvaError::Cache(format!("creating {}: {}", parent.display(), e)))?;
    }
    let tmp = self.path.with_extension("tmp");
    fs::write(&tmp, bytes)
      .await
      .map_err(|e| TattvaError::Cache(format!("writing {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, &self.path)
      .await
      .map_err(|e| TattvaError::Cache(format!("replacing {}: {}", self.path.display(), e)))?;
    debug!("snapshot written");
    Ok(())
  }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
  snapshots: Mutex<Snapshots>,
}

impl MemoryCache {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl SnapshotCache for MemoryCache {
  async fn load(&self, collection: &str) -> TattvaResult<Option<Vec<StoredDocument>>> {
    Ok(self.snapshots.lock().get(collection).cloned())
  }

  async fn save(&self, collection: &str, docs: &[StoredDocument]) -> TattvaResult<()> {
    self.snapshots.lock().insert(collection.to_string(), docs.to_vec());
    Ok(())
  }
}
