// artcraft_admin/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tattva::{EditPolicy, SyncStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Memory,
  Postgres,
}

impl FromStr for StoreBackend {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "memory" => Ok(StoreBackend::Memory),
      "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
      other => Err(format!("unknown store backend '{}'", other)),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  /// Required for the postgres backend.
  pub database_url: Option<String>,
  /// Product snapshot file; no offline seed when unset.
  pub cache_path: Option<PathBuf>,
  pub sync_strategy: SyncStrategy,
  pub edit_policy: EditPolicy,
  /// Insert the demo products when the product collection is empty.
  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source. `from_env` uses the process
  /// environment; tests pass a map.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| lookup(var_name).filter(|v| !v.trim().is_empty());
    let parse = |var_name: &str, default: &str| get_env(var_name).unwrap_or_else(|| default.to_string());

    let server_host = parse("SERVER_HOST", "127.0.0.1");
    let server_port = parse("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let store_backend = parse("STORE_BACKEND", "memory")
      .parse::<StoreBackend>()
      .map_err(|e| AppError::Config(format!("Invalid STORE_BACKEND: {}", e)))?;
    let database_url = get_env("DATABASE_URL");
    if store_backend == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required by STORE_BACKEND=postgres)".to_string(),
      ));
    }
    let cache_path = get_env("CACHE_PATH").map(PathBuf::from);
    let sync_strategy = parse("SYNC_STRATEGY", "refetch")
      .parse::<SyncStrategy>()
      .map_err(|e| AppError::Config(format!("Invalid SYNC_STRATEGY: {}", e)))?;
    let edit_policy = parse("EDIT_POLICY", "per_row")
      .parse::<EditPolicy>()
      .map_err(|e| AppError::Config(format!("Invalid EDIT_POLICY: {}", e)))?;
    let seed_db = parse("SEED_DB", "false")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!(
      backend = ?store_backend,
      sync = ?sync_strategy,
      edit = ?edit_policy,
      cache = cache_path.is_some(),
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      cache_path,
      sync_strategy,
      edit_policy,
      seed_db,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    AppConfig::from_lookup(|name| vars.get(name).cloned())
  }

  #[test]
  fn defaults_use_the_memory_store() {
    let cfg = config(&[]).unwrap();
    assert_eq!(cfg.store_backend, StoreBackend::Memory);
    assert_eq!(cfg.server_port, 8080);
    assert_eq!(cfg.sync_strategy, SyncStrategy::Refetch);
    assert_eq!(cfg.edit_policy, EditPolicy::PerRow);
    assert!(!cfg.seed_db);
    assert!(cfg.cache_path.is_none());
  }

  #[test]
  fn postgres_needs_a_database_url() {
    assert!(matches!(config(&[("STORE_BACKEND", "postgres")]), Err(AppError::Config(_))));
    let cfg = config(&[("STORE_BACKEND", "postgres"), ("DATABASE_URL", "postgres://localhost/admin")]).unwrap();
    assert_eq!(cfg.store_backend, StoreBackend::Postgres);
  }

  #[test]
  fn invalid_values_are_config_errors() {
    for (name, value) in [
      ("SERVER_PORT", "eighty"),
      ("SYNC_STRATEGY", "sometimes"),
      ("EDIT_POLICY", "all_rows"),
      ("SEED_DB", "yes please"),
    ] {
      assert!(matches!(config(&[(name, value)]), Err(AppError::Config(_))), "{}", name);
    }
  }
}
