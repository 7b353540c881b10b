// tattva/src/store/memory.rs

//! In-process `RecordStore`. Used by the service's `memory` backend and by
//! tests, which can deny collections and queue failures.

use super::{DocumentId, Fields, RecordStore, StoreError, StoreOp, StoredDocument};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, instrument};
use uuid::Uuid;

/// A queued failure for the next store call of kind `op`.
#[derive(Debug, Clone)]
pub struct Fault {
  pub op: StoreOp,
  pub error: StoreError,
  /// Apply the operation first, then report the error (a failure after the
  /// store has already committed the change).
  pub after_commit: bool,
}

impl Fault {
  pub fn before_commit(op: StoreOp, error: StoreError) -> Self {
    Self {
      op,
      error,
      after_commit: false,
    }
  }

  pub fn after_commit(op: StoreOp, error: StoreError) -> Self {
    Self {
      op,
      error,
      after_commit: true,
    }
  }
}

#[derive(Debug, Default)]
struct Collection {
  docs: Vec<StoredDocument>,
  last_stamp: Option<DateTime<Utc>>,
}

impl Collection {
  /// Wall-clock time, nudged forward when needed so stamps strictly increase.
  fn next_stamp(&mut self) -> DateTime<Utc> {
    let now = Utc::now();
    let stamp = match self.last_stamp {
      Some(last) if now <= last => last + Duration::microseconds(1),
      _ => now,
    };
    self.last_stamp = Some(stamp);
    stamp
  }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
  collections: RwLock<HashMap<String, Collection>>,
  denied: RwLock<HashSet<String>>,
  faults: Mutex<VecDeque<Fault>>,
  calls: Mutex<HashMap<StoreOp, usize>>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Every subsequent call on `collection` fails with `PermissionDenied`.
  pub fn deny(&self, collection: &str) {
    self.denied.write().insert(collection.to_string());
  }

  pub fn allow(&self, collection: &str) {
    self.denied.write().remove(collection);
  }

  /// Queues a failure; the first queued fault matching an op is consumed by
  /// the next call of that op.
  pub fn inject(&self, fault: Fault) {
    self.faults.lock().push_back(fault);
  }

  /// Number of calls made for `op` so far, failed ones included.
  pub fn call_count(&self, op: StoreOp) -> usize {
    self.calls.lock().get(&op).copied().unwrap_or(0)
  }

  /// Direct read of a document, bypassing faults and call counting.
  pub fn peek(&self, collection: &str, id: &DocumentId) -> Option<StoredDocument> {
    self
      .collections
      .read()
      .get(collection)
      .and_then(|c| c.docs.iter().find(|d| &d.id == id).cloned())
  }

  fn enter(&self, op: StoreOp, collection: &str) -> Result<Option<Fault>, StoreError> {
    *self.calls.lock().entry(op).or_insert(0) += 1;
    if self.denied.read().contains(collection) {
      return Err(StoreError::PermissionDenied {
        collection: collection.to_string(),
      });
    }
    let mut faults = self.faults.lock();
    let fault = faults
      .iter()
      .position(|f| f.op == op)
      .and_then(|idx| faults.remove(idx));
    match fault {
      Some(f) if !f.after_commit => Err(f.error),
      other => Ok(other),
    }
  }

  fn leave<T>(pending: Option<Fault>, value: T) -> Result<T, StoreError> {
    match pending {
      Some(f) => Err(f.error),
      None => Ok(value),
    }
  }
}

#[async_trait]
impl RecordStore for InMemoryStore {
  #[instrument(name = "InMemoryStore::create", skip(self, fields), err(Display))]
  async fn create(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
    let pending = self.enter(StoreOp::Create, collection)?;
    let id = DocumentId::new(Uuid::new_v4().simple().to_string());
    {
      let mut collections = self.collections.write();
      let coll = collections.entry(collection.to_string()).or_default();
      let created_at = coll.next_stamp();
      coll.docs.push(StoredDocument {
        id: id.clone(),
        created_at: Some(created_at),
        fields,
      });
    }
    debug!(%id, "document created");
    Self::leave(pending, id)
  }

  #[instrument(name = "InMemoryStore::read_all", skip(self), err(Display))]
  async fn read_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
    let pending = self.enter(StoreOp::ReadAll, collection)?;
    let docs = self
      .collections
      .read()
      .get(collection)
      .map(|c| c.docs.clone())
      .unwrap_or_default();
    Self::leave(pending, docs)
  }

  #[instrument(name = "InMemoryStore::update_by_id", skip(self, partial), fields(%id), err(Display))]
  async fn update_by_id(&self, collection: &str, id: &DocumentId, partial: Fields) -> Result<(), StoreError> {
    let pending = self.enter(StoreOp::Update, collection)?;
    {
      let mut collections = self.collections.write();
      let doc = collections
        .get_mut(collection)
        .and_then(|c| c.docs.iter_mut().find(|d| &d.id == id))
        .ok_or_else(|| StoreError::NotFound {
          collection: collection.to_string(),
          id: id.clone(),
        })?;
      for (key, value) in partial {
        doc.fields.insert(key, value);
      }
    }
    Self::leave(pending, ())
  }

  #[instrument(name = "InMemoryStore::delete_by_id", skip(self), fields(%id), err(Display))]
  async fn delete_by_id(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
    let pending = self.enter(StoreOp::Delete, collection)?;
    if let Some(coll) = self.collections.write().get_mut(collection) {
      coll.docs.retain(|d| &d.id != id);
    }
    Self::leave(pending, ())
  }
}
