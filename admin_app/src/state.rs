// artcraft_admin/src/state.rs
use crate::config::AppConfig;
use crate::errors::Result;
use crate::hooks::attach_audit_hooks;
use std::sync::Arc;
use tattva::{Category, Dashboard, JsonFileCache, Product, RecordStore};

#[derive(Clone)]
pub struct AppState {
  pub dashboard: Arc<Dashboard>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Builds the dashboard over `store` with the configured policies and the
  /// application's flow hooks. Nothing is fetched until `mount`.
  pub fn build(store: Arc<dyn RecordStore>, config: Arc<AppConfig>) -> Result<Self> {
    let mut builder = Dashboard::builder(store)
      .edit_policy(config.edit_policy)
      .sync_strategy(config.sync_strategy);
    if let Some(path) = &config.cache_path {
      builder = builder.product_cache(Arc::new(JsonFileCache::new(path.clone())));
    }
    let mut dashboard = builder.build()?;
    attach_audit_hooks(dashboard.workspace_mut::<Product>())?;
    attach_audit_hooks(dashboard.workspace_mut::<Category>())?;

    Ok(Self {
      dashboard: Arc::new(dashboard),
      config,
    })
  }
}
