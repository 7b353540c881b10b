// tattva/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::store::{DocumentId, StoreError, StoreOp};

/// Client-side validation failures. These block a submission before any
/// store call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{field} is required")]
  MissingField { field: &'static str },

  #[error("price '{input}' is not a number")]
  InvalidPrice { input: String },

  #[error("price must not be negative (got {input})")]
  NegativePrice { input: String },
}

#[derive(Debug, Error)]
pub enum TattvaError {
  #[error("Validation failed: {0}")]
  Validation(#[from] ValidationError),

  #[error("Store operation '{op}' on collection '{collection}' failed: {source}")]
  Store {
    op: StoreOp,
    collection: String,
    #[source]
    source: StoreError,
  },

  #[error("Malformed document '{id}' in collection '{collection}': {message}")]
  MalformedDocument {
    collection: String,
    id: DocumentId,
    message: String,
  },

  #[error("Record '{id}' is not in edit mode")]
  NotEditing { id: DocumentId },

  #[error("Record '{id}' is not present in the loaded '{collection}' list")]
  UnknownRecord { collection: String, id: DocumentId },

  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Snapshot cache error: {0}")]
  Cache(String),

  #[error("Error in flow handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal tattva error: {0}")]
  Internal(String),
}

impl TattvaError {
  pub fn store(op: StoreOp, collection: impl Into<String>, source: StoreError) -> Self {
    TattvaError::Store {
      op,
      collection: collection.into(),
      source,
    }
  }

  /// The underlying store error, if this failure came from the record store.
  pub fn store_error(&self) -> Option<&StoreError> {
    match self {
      TattvaError::Store { source, .. } => Some(source),
      _ => None,
    }
  }

  pub fn is_permission_denied(&self) -> bool {
    matches!(self.store_error(), Some(StoreError::PermissionDenied { .. }))
  }
}

impl From<AnyhowError> for TattvaError {
  fn from(err: AnyhowError) -> Self {
    // A TattvaError that went through anyhow cannot be moved back out of a
    // shared reference, so it stays wrapped; its message is preserved.
    TattvaError::HandlerError { source: err }
  }
}

pub type TattvaResult<T, E = TattvaError> = std::result::Result<T, E>;
