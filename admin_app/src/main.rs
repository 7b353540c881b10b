// artcraft_admin/src/main.rs

mod config;
mod db;
mod errors;
mod hooks;
mod seed;
mod state;
mod web;

use crate::config::{AppConfig, StoreBackend};
use crate::db::PgDocumentStore;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;
use tattva::{InMemoryStore, RecordStore};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting catalog admin server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  let store: Arc<dyn RecordStore> = match (app_config.store_backend, app_config.database_url.as_deref()) {
    (StoreBackend::Postgres, Some(database_url)) => {
      let pool = match PgPool::connect(database_url).await {
        Ok(pool) => {
          tracing::info!("Successfully connected to the database.");
          pool
        }
        Err(e) => {
          tracing::error!(error = %e, "Failed to connect to the database.");
          panic!("Database connection error: {}", e);
        }
      };
      let pg_store = PgDocumentStore::new(pool);
      if let Err(e) = pg_store.ensure_schema().await {
        tracing::error!(error = %e, "Failed to prepare the documents table.");
        panic!("Database schema error: {}", e);
      }
      Arc::new(pg_store)
    }
    _ => {
      tracing::warn!("Using the in-memory record store; data is lost on restart.");
      Arc::new(InMemoryStore::new())
    }
  };

  if app_config.seed_db {
    if let Err(e) = seed::seed_demo_products(store.as_ref()).await {
      tracing::error!(error = %e, "Failed to seed demo products.");
    }
  }

  let app_state = match AppState::build(store, app_config.clone()) {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to assemble the dashboard.");
      panic!("Dashboard error: {}", e);
    }
  };
  let summary = app_state.dashboard.mount().await;
  tracing::info!(?summary, "Initial fetch finished.");

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
