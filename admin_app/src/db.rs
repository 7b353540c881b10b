// artcraft_admin/src/db.rs

//! `RecordStore` over Postgres: every collection shares one `documents`
//! table with a JSONB body.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tattva::{DocumentId, Fields, RecordStore, StoreError, StoredDocument};
use tracing::{debug, instrument};
use uuid::Uuid;

const SCHEMA: [&str; 2] = [
  "CREATE TABLE IF NOT EXISTS documents (
     collection TEXT NOT NULL,
     id UUID NOT NULL,
     body JSONB NOT NULL,
     created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
     PRIMARY KEY (collection, id)
   )",
  "CREATE INDEX IF NOT EXISTS documents_collection_created_at ON documents (collection, created_at)",
];

// SQLSTATE insufficient_privilege
const PG_INSUFFICIENT_PRIVILEGE: &str = "42501";

#[derive(Clone)]
pub struct PgDocumentStore {
  pool: PgPool,
}

impl PgDocumentStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
      sqlx::query(statement).execute(&self.pool).await?;
    }
    debug!("documents table ready");
    Ok(())
  }
}

fn store_error(collection: &str, err: sqlx::Error) -> StoreError {
  match &err {
    sqlx::Error::Database(db) if db.code().as_deref() == Some(PG_INSUFFICIENT_PRIVILEGE) => StoreError::PermissionDenied {
      collection: collection.to_string(),
    },
    sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StoreError::Unavailable(err.to_string()),
    _ => StoreError::Backend(err.to_string()),
  }
}

/// Ids this store did not mint cannot exist in it.
fn parse_id(id: &DocumentId) -> Option<Uuid> {
  Uuid::parse_str(id.as_str()).ok()
}

#[async_trait]
impl RecordStore for PgDocumentStore {
  #[instrument(name = "PgDocumentStore::create", skip(self, fields), err(Display))]
  async fn create(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
      .bind(collection)
      .bind(id)
      .bind(Json(Value::Object(fields)))
      .execute(&self.pool)
      .await
      .map_err(|e| store_error(collection, e))?;
    Ok(DocumentId::new(id.to_string()))
  }

  #[instrument(name = "PgDocumentStore::read_all", skip(self), err(Display))]
  async fn read_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
    let rows: Vec<(Uuid, Json<Value>, DateTime<Utc>)> =
      sqlx::query_as("SELECT id, body, created_at FROM documents WHERE collection = $1 ORDER BY created_at, id")
        .bind(collection)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(collection, e))?;

    Ok(
      rows
        .into_iter()
        .map(|(id, Json(body), created_at)| StoredDocument {
          id: DocumentId::new(id.to_string()),
          created_at: Some(created_at),
          fields: match body {
            Value::Object(map) => map,
            _ => Fields::new(),
          },
        })
        .collect(),
    )
  }

  #[instrument(name = "PgDocumentStore::update_by_id", skip(self, partial), fields(%id), err(Display))]
  async fn update_by_id(&self, collection: &str, id: &DocumentId, partial: Fields) -> Result<(), StoreError> {
    let not_found = || StoreError::NotFound {
      collection: collection.to_string(),
      id: id.clone(),
    };
    let uuid = parse_id(id).ok_or_else(not_found)?;
    let result = sqlx::query("UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2")
      .bind(collection)
      .bind(uuid)
      .bind(Json(Value::Object(partial)))
      .execute(&self.pool)
      .await
      .map_err(|e| store_error(collection, e))?;
    if result.rows_affected() == 0 {
      return Err(not_found());
    }
    Ok(())
  }

  #[instrument(name = "PgDocumentStore::delete_by_id", skip(self), fields(%id), err(Display))]
  async fn delete_by_id(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
    let Some(uuid) = parse_id(id) else { return Ok(()) };
    sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
      .bind(collection)
      .bind(uuid)
      .execute(&self.pool)
      .await
      .map_err(|e| store_error(collection, e))?;
    Ok(())
  }
}
