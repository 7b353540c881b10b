// tattva/src/store/mod.rs

//! The record store contract: a hosted document database reached through
//! collection-scoped create, read-all, update-by-id and delete-by-id calls.
//! Every call is an independent round trip; nothing links two calls
//! transactionally.

pub mod memory;

pub use memory::{Fault, InMemoryStore};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A document body: a JSON object with camelCase keys.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Store-assigned document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
  pub fn new(id: impl Into<String>) -> Self {
    DocumentId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for DocumentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for DocumentId {
  fn from(s: &str) -> Self {
    DocumentId(s.to_string())
  }
}

impl From<String> for DocumentId {
  fn from(s: String) -> Self {
    DocumentId(s)
  }
}

/// A document as returned by `read_all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
  pub id: DocumentId,
  /// Server-assigned; `None` until the store has acknowledged the write.
  pub created_at: Option<DateTime<Utc>>,
  pub fields: Fields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
  Create,
  ReadAll,
  Update,
  Delete,
}

impl fmt::Display for StoreOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      StoreOp::Create => "create",
      StoreOp::ReadAll => "read_all",
      StoreOp::Update => "update_by_id",
      StoreOp::Delete => "delete_by_id",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
  #[error("permission denied on collection '{collection}'")]
  PermissionDenied { collection: String },

  #[error("document '{id}' not found in collection '{collection}'")]
  NotFound { collection: String, id: DocumentId },

  #[error("store unavailable: {0}")]
  Unavailable(String),

  #[error("store backend error: {0}")]
  Backend(String),
}

/// The hosted document database, as seen by the dashboard.
///
/// Implementations do not enforce any schema beyond what the caller sends.
#[async_trait]
pub trait RecordStore: Send + Sync {
  /// Writes a new document and returns the identifier the store assigned.
  /// The store also stamps the creation time.
  async fn create(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError>;

  /// Every document of the collection, in creation order.
  async fn read_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

  /// Merges `partial` into the existing document. Fails with
  /// `StoreError::NotFound` when the document does not exist.
  async fn update_by_id(&self, collection: &str, id: &DocumentId, partial: Fields) -> Result<(), StoreError>;

  /// Removes the document. Deleting a missing document succeeds.
  async fn delete_by_id(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError>;
}
