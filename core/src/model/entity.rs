// tattva/src/model/entity.rs

use crate::error::{TattvaError, TattvaResult, ValidationError};
use crate::store::{DocumentId, Fields, StoredDocument};
use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// A record type persisted in one collection of the record store.
pub trait Entity: Clone + Debug + PartialEq + Send + Sync + 'static {
  /// Collection name in the store.
  const COLLECTION: &'static str;
  /// Human label used in notifications ("product", "category").
  const LABEL: &'static str;
  /// Shown instead of the generic failure message when a create is rejected
  /// by the store's access rules.
  const CREATE_DENIED_MESSAGE: Option<&'static str> = None;

  /// The editable subset of fields held while a row is in edit mode.
  type Draft: Draft;
  /// Form input for creating a record.
  type New: NewRecord<Self>;

  fn id(&self) -> &DocumentId;

  fn from_document(doc: StoredDocument) -> TattvaResult<Self>;

  fn to_document(&self) -> TattvaResult<StoredDocument>;

  /// A draft copied from the committed record.
  fn draft(&self) -> Self::Draft;

  /// Writes a validated draft into the record (local patch after an
  /// acknowledged update).
  fn apply_draft(&mut self, draft: &Self::Draft) -> TattvaResult<()>;
}

pub trait Draft: Clone + Debug + PartialEq + Send + Sync + 'static {
  fn validate(&self) -> Result<(), ValidationError>;

  /// Only the editable subset, as sent to `update_by_id`.
  fn to_update_fields(&self) -> TattvaResult<Fields>;
}

pub trait NewRecord<E: Entity>: Clone + Debug + Send + Sync + 'static {
  fn validate(&self) -> Result<(), ValidationError>;

  /// The document body sent to `create`.
  fn to_create_fields(&self) -> TattvaResult<Fields>;

  /// The record as it will look once the store has acknowledged it under
  /// `id`. `created_at` stays `None` until the next fetch.
  fn into_record(self, id: DocumentId, created_at: Option<DateTime<Utc>>) -> TattvaResult<E>;
}

/// Serialises a serde struct into a document body.
pub(crate) fn to_fields<T: serde::Serialize>(value: &T) -> TattvaResult<Fields> {
  match serde_json::to_value(value) {
    Ok(serde_json::Value::Object(map)) => Ok(map),
    Ok(other) => Err(TattvaError::Internal(format!(
      "expected a JSON object, serialised to {}",
      other
    ))),
    Err(e) => Err(TattvaError::Internal(format!("serialisation failed: {}", e))),
  }
}

/// Deserialises a document body, reporting the document on failure.
pub(crate) fn from_fields<T: serde::de::DeserializeOwned>(
  collection: &str,
  id: &DocumentId,
  fields: Fields,
) -> TattvaResult<T> {
  serde_json::from_value(serde_json::Value::Object(fields)).map_err(|e| TattvaError::MalformedDocument {
    collection: collection.to_string(),
    id: id.clone(),
    message: e.to_string(),
  })
}
