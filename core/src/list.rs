// tattva/src/list.rs

//! The entity list: the in-memory, ordered copy of one collection.

use crate::cache::SnapshotCache;
use crate::core::shared::SharedState;
use crate::error::{TattvaError, TattvaResult};
use crate::model::Entity;
use crate::store::{DocumentId, RecordStore, StoreOp, StoredDocument};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Where the list's current contents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListSource {
  /// Nothing loaded yet (or only failed fetches so far).
  Empty,
  /// Seeded from the offline snapshot; not yet confirmed by the store.
  Cache,
  /// Result of the latest successful fetch, possibly locally patched since.
  Store,
}

#[derive(Debug, Clone)]
pub struct ListState<E> {
  pub records: Vec<E>,
  pub source: ListSource,
  pub last_error: Option<String>,
  /// Successful fetches applied so far.
  pub fetches: u64,
}

impl<E> Default for ListState<E> {
  fn default() -> Self {
    Self {
      records: Vec::new(),
      source: ListSource::Empty,
      last_error: None,
      fetches: 0,
    }
  }
}

/// Full-collection fetcher and holder. Cloning is cheap and every clone
/// sees the same list.
pub struct EntityList<E: Entity> {
  store: Arc<dyn RecordStore>,
  cache: Option<Arc<dyn SnapshotCache>>,
  state: SharedState<ListState<E>>,
}

impl<E: Entity> Clone for EntityList<E> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      cache: self.cache.clone(),
      state: self.state.clone(),
    }
  }
}

impl<E: Entity> EntityList<E> {
  pub fn new(store: Arc<dyn RecordStore>) -> Self {
    Self {
      store,
      cache: None,
      state: SharedState::default(),
    }
  }

  pub fn with_cache(mut self, cache: Arc<dyn SnapshotCache>) -> Self {
    self.cache = Some(cache);
    self
  }

  pub fn store(&self) -> &Arc<dyn RecordStore> {
    &self.store
  }

  /// Fills an empty list from the offline snapshot. Returns how many records
  /// were seeded; does nothing once the list holds anything.
  pub async fn seed_from_cache(&self) -> TattvaResult<usize> {
    let Some(cache) = &self.cache else { return Ok(0) };
    if self.state.read().source != ListSource::Empty {
      return Ok(0);
    }
    let Some(docs) = cache.load(E::COLLECTION).await? else { return Ok(0) };
    let records = decode_all::<E>(docs);
    let count = records.len();
    self.state.update(|s| {
      // A fetch may have landed while the snapshot was being read.
      if s.source == ListSource::Empty {
        s.records = records;
        s.source = ListSource::Cache;
      }
    });
    debug!(collection = E::COLLECTION, count, "list seeded from snapshot");
    Ok(count)
  }

  /// Re-reads the whole collection and replaces the list.
  ///
  /// On failure the error is logged and recorded and the list keeps whatever
  /// it held. Overlapping refreshes are applied in completion order.
  #[instrument(name = "EntityList::refresh", skip(self), fields(collection = E::COLLECTION))]
  pub async fn refresh(&self) -> TattvaResult<usize> {
    let docs = match self.store.read_all(E::COLLECTION).await {
      Ok(docs) => docs,
      Err(source) => {
        warn!(error = %source, "fetch failed; keeping the current list");
        self.state.write().last_error = Some(source.to_string());
        return Err(TattvaError::store(StoreOp::ReadAll, E::COLLECTION, source));
      }
    };

    if let Some(cache) = &self.cache {
      if let Err(e) = cache.save(E::COLLECTION, &docs).await {
        warn!(error = %e, "could not write snapshot");
      }
    }

    let records = decode_all::<E>(docs);
    let count = records.len();
    self.state.update(|s| {
      s.records = records;
      s.source = ListSource::Store;
      s.last_error = None;
      s.fetches += 1;
    });
    info!(count, "list refreshed");
    Ok(count)
  }

  pub fn records(&self) -> Vec<E> {
    self.state.read().records.clone()
  }

  pub fn get(&self, id: &DocumentId) -> Option<E> {
    self.state.read().records.iter().find(|r| r.id() == id).cloned()
  }

  pub fn contains(&self, id: &DocumentId) -> bool {
    self.state.read().records.iter().any(|r| r.id() == id)
  }

  pub fn len(&self) -> usize {
    self.state.read().records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn source(&self) -> ListSource {
    self.state.read().source
  }

  pub fn last_error(&self) -> Option<String> {
    self.state.read().last_error.clone()
  }

  pub fn fetch_count(&self) -> u64 {
    self.state.read().fetches
  }

  pub(crate) fn push_local(&self, record: E) {
    self.state.update(|s| s.records.push(record));
  }

  /// Applies `f` to the record with `id`; false when it is not loaded.
  pub(crate) fn patch_local(&self, id: &DocumentId, f: impl FnOnce(&mut E) -> TattvaResult<()>) -> TattvaResult<bool> {
    self.state.update(|s| match s.records.iter_mut().find(|r| r.id() == id) {
      Some(record) => f(record).map(|_| true),
      None => Ok(false),
    })
  }

  pub(crate) fn remove_local(&self, id: &DocumentId) -> bool {
    self.state.update(|s| {
      let before = s.records.len();
      s.records.retain(|r| r.id() != id);
      s.records.len() != before
    })
  }
}

fn decode_all<E: Entity>(docs: Vec<StoredDocument>) -> Vec<E> {
  docs
    .into_iter()
    .filter_map(|doc| match E::from_document(doc) {
      Ok(record) => Some(record),
      Err(e) => {
        warn!(error = %e, "skipping undecodable document");
        None
      }
    })
    .collect()
}
