// artcraft_admin/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use tattva::{StoreError, TattvaError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Permission Denied: {0}")]
  Forbidden(String),

  #[error("Record Store Error: {0}")]
  Store(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Dashboard Error: {source}")]
  Core {
    #[source]
    source: TattvaError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  // A flow stopped before writing, e.g. a delete without confirmation.
  #[error("Mutation was declined; nothing was written.")]
  Declined,
}

impl From<TattvaError> for AppError {
  fn from(err: TattvaError) -> Self {
    match err {
      TattvaError::Validation(v) => AppError::Validation(v.to_string()),
      TattvaError::NotEditing { .. } | TattvaError::UnknownRecord { .. } => AppError::NotFound(err.to_string()),
      TattvaError::Store { ref source, .. } => match source {
        StoreError::PermissionDenied { .. } => AppError::Forbidden(err.to_string()),
        StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
        StoreError::Unavailable(_) | StoreError::Backend(_) => AppError::Store(err.to_string()),
      },
      other => AppError::Core { source: other },
    }
  }
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::Store(_) => StatusCode::BAD_GATEWAY,
      AppError::Declined => StatusCode::CONFLICT,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Core { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    let body = match self {
      AppError::Validation(m) | AppError::NotFound(m) | AppError::Forbidden(m) => json!({"error": m}),
      AppError::Store(m) => json!({"error": "Record store operation failed", "detail": m}),
      AppError::Config(m) => json!({"error": "Configuration issue", "detail": m}),
      AppError::Sqlx(_) => json!({"error": "Database operation failed"}),
      AppError::Core { source } => {
        tracing::error!(tattva_error_source = ?source, "Dashboard core error details");
        json!({"error": "Dashboard processing error", "detail": source.to_string()})
      }
      AppError::Internal(m) => json!({"error": "An internal error occurred", "detail": m}),
      AppError::Declined => json!({"error": self.to_string()}),
    };
    HttpResponse::build(self.status_code()).json(body)
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
