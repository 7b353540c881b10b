// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tattva::{
  Category, CategoryStatus, DocumentId, EditPolicy, Entity, EntityList, EntityWorkspace, Fields, InMemoryStore,
  NewCategory, NewProduct, NotificationCenter, Product, ProductStatus, RecordStore, StoreError, StoredDocument,
  SyncStrategy,
};
use tokio::sync::oneshot;
use tracing::Level;

// --- Helper for Tracing Setup ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Form inputs ---
pub fn pink_floral_dress() -> NewProduct {
  NewProduct {
    name: "Pink Floral Dress".to_string(),
    price: "49.99".to_string(),
    category: "Clothing".to_string(),
    description: "Beautiful pink floral pattern dress for summer".to_string(),
    status: ProductStatus::Published,
    ..NewProduct::default()
  }
}

pub fn new_product(name: &str, price: &str) -> NewProduct {
  NewProduct {
    name: name.to_string(),
    price: price.to_string(),
    category: "Pottery and Terracotta".to_string(),
    ..NewProduct::default()
  }
}

pub fn new_category(name: &str) -> NewCategory {
  NewCategory {
    name: name.to_string(),
    description: format!("{} from local artisans", name),
    status: CategoryStatus::Active,
    ..NewCategory::default()
  }
}

/// Writes a category straight into the store, bypassing the dispatcher, so
/// tests can set fields no form exposes.
pub async fn insert_category(store: &dyn RecordStore, name: &str, product_count: u32) -> DocumentId {
  let mut fields = Fields::new();
  fields.insert("name".into(), json!(name));
  fields.insert("description".into(), json!(""));
  fields.insert("imageUrls".into(), json!([]));
  fields.insert("productCount".into(), json!(product_count));
  fields.insert("status".into(), json!("Active"));
  store.create(Category::COLLECTION, fields).await.unwrap()
}

// --- Workspaces ---
pub fn product_workspace(
  store: Arc<dyn RecordStore>,
  policy: EditPolicy,
  sync: SyncStrategy,
) -> (EntityWorkspace<Product>, Arc<NotificationCenter>) {
  let notes = Arc::new(NotificationCenter::new());
  let ws = EntityWorkspace::new(EntityList::new(store), notes.clone(), policy, sync).unwrap();
  (ws, notes)
}

pub fn category_workspace(
  store: Arc<dyn RecordStore>,
  policy: EditPolicy,
  sync: SyncStrategy,
) -> (EntityWorkspace<Category>, Arc<NotificationCenter>) {
  let notes = Arc::new(NotificationCenter::new());
  let ws = EntityWorkspace::new(EntityList::new(store), notes.clone(), policy, sync).unwrap();
  (ws, notes)
}

pub fn memory_store() -> Arc<InMemoryStore> {
  Arc::new(InMemoryStore::new())
}

// --- A store whose reads can be held back ---

/// Wraps an `InMemoryStore`. A `read_all` takes its result immediately but,
/// if a gate is queued, does not return it until the gate is released. This
/// lets a test decide in which order overlapping fetches resolve.
///
/// An `update_by_id` with a queued write gate waits for the gate first and
/// only then reaches the inner store.
pub struct GatedStore {
  inner: Arc<InMemoryStore>,
  gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
  parked: AtomicUsize,
  write_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
  parked_writes: AtomicUsize,
}

impl GatedStore {
  pub fn new(inner: Arc<InMemoryStore>) -> Self {
    Self {
      inner,
      gates: Mutex::new(VecDeque::new()),
      parked: AtomicUsize::new(0),
      write_gates: Mutex::new(VecDeque::new()),
      parked_writes: AtomicUsize::new(0),
    }
  }

  pub fn hold_next_writes(&self, n: usize) -> Vec<oneshot::Sender<()>> {
    let mut gates = self.write_gates.lock();
    (0..n)
      .map(|_| {
        let (tx, rx) = oneshot::channel();
        gates.push_back(rx);
        tx
      })
      .collect()
  }

  pub async fn wait_until_writes_parked(&self, n: usize) {
    while self.parked_writes.load(Ordering::SeqCst) < n {
      tokio::task::yield_now().await;
    }
  }

  /// Gates the next `n` reads, in call order. Dropping or sending on a
  /// returned sender releases the matching read.
  pub fn hold_next_reads(&self, n: usize) -> Vec<oneshot::Sender<()>> {
    let mut gates = self.gates.lock();
    (0..n)
      .map(|_| {
        let (tx, rx) = oneshot::channel();
        gates.push_back(rx);
        tx
      })
      .collect()
  }

  /// Reads that have taken their snapshot and are waiting on a gate.
  pub fn parked(&self) -> usize {
    self.parked.load(Ordering::SeqCst)
  }

  pub async fn wait_until_parked(&self, n: usize) {
    while self.parked() < n {
      tokio::task::yield_now().await;
    }
  }
}

#[async_trait]
impl RecordStore for GatedStore {
  async fn create(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
    self.inner.create(collection, fields).await
  }

  async fn read_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
    let docs = self.inner.read_all(collection).await;
    let gate = self.gates.lock().pop_front();
    if let Some(gate) = gate {
      self.parked.fetch_add(1, Ordering::SeqCst);
      let _ = gate.await;
    }
    docs
  }

  async fn update_by_id(&self, collection: &str, id: &DocumentId, partial: Fields) -> Result<(), StoreError> {
    let gate = self.write_gates.lock().pop_front();
    if let Some(gate) = gate {
      self.parked_writes.fetch_add(1, Ordering::SeqCst);
      let _ = gate.await;
    }
    self.inner.update_by_id(collection, id, partial).await
  }

  async fn delete_by_id(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
    self.inner.delete_by_id(collection, id).await
  }
}
