// tests/list_cache_tests.rs
mod common;
use common::*;
use serde_json::json;
use serial_test::serial;
use std::sync::Arc;
use tattva::{
  Dashboard, EditPolicy, Entity, EntityList, Fault, Fields, JsonFileCache, ListSource, MemoryCache, Product,
  RecordStore, SnapshotCache, StoreError, StoreOp, SyncStrategy,
};

#[tokio::test]
#[serial]
async fn refresh_returns_creation_order_and_skips_undecodable_documents() {
  setup_tracing();
  let store = memory_store();
  let (ws, _notes) = product_workspace(store.clone(), EditPolicy::PerRow, SyncStrategy::Refetch);
  ws.create(new_product("Brass Lamp", "120")).await.unwrap();
  let mut broken = Fields::new();
  broken.insert("name".into(), json!("No price"));
  store.create(Product::COLLECTION, broken).await.unwrap();
  ws.create(new_product("Jute Bag", "15.5")).await.unwrap();

  let count = ws.refresh().await.unwrap();

  assert_eq!(count, 2);
  let names: Vec<String> = ws.records().into_iter().map(|p| p.name).collect();
  assert_eq!(names, vec!["Brass Lamp", "Jute Bag"]);
  let stamps: Vec<_> = ws.records().into_iter().map(|p| p.created_at.unwrap()).collect();
  assert!(stamps[0] < stamps[1]);
}

#[tokio::test]
#[serial]
async fn failed_fetch_keeps_the_previous_list() {
  setup_tracing();
  let store = memory_store();
  let list = EntityList::<Product>::new(store.clone());

  store.inject(Fault::before_commit(StoreOp::ReadAll, StoreError::Unavailable("offline".into())));
  assert!(list.refresh().await.is_err());
  assert!(list.is_empty());
  assert_eq!(list.source(), ListSource::Empty);

  store.create(Product::COLLECTION, new_fields("Brass Lamp", 120.0)).await.unwrap();
  list.refresh().await.unwrap();
  assert_eq!(list.len(), 1);
  assert_eq!(list.last_error(), None);

  store.deny(Product::COLLECTION);
  let err = list.refresh().await.unwrap_err();
  assert!(err.is_permission_denied());
  assert_eq!(list.len(), 1);
  assert_eq!(list.source(), ListSource::Store);
  assert!(list.last_error().is_some());
  assert_eq!(list.fetch_count(), 1);
}

fn new_fields(name: &str, price: f64) -> Fields {
  let mut fields = Fields::new();
  fields.insert("name".into(), json!(name));
  fields.insert("price".into(), json!(price));
  fields.insert("category".into(), json!("Metal and Jewellery work"));
  fields
}

#[tokio::test]
#[serial]
async fn snapshot_seeds_an_offline_start_and_is_replaced_by_the_first_fetch() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("snapshot.json");

  // First session: fetch succeeds and writes the snapshot.
  let online = memory_store();
  online.create(Product::COLLECTION, new_fields("Brass Lamp", 120.0)).await.unwrap();
  online.create(Product::COLLECTION, new_fields("Jute Bag", 15.5)).await.unwrap();
  let first = Dashboard::builder(online.clone())
    .product_cache(Arc::new(JsonFileCache::new(&path)))
    .build()
    .unwrap();
  let summary = first.mount().await;
  assert_eq!(summary.products, Some(2));
  assert!(path.exists());

  // Second session: the store is unreachable, the snapshot fills in.
  let offline = memory_store();
  offline.deny(Product::COLLECTION);
  let second = Dashboard::builder(offline.clone())
    .product_cache(Arc::new(JsonFileCache::new(&path)))
    .build()
    .unwrap();
  let summary = second.mount().await;
  assert_eq!(summary.products_seeded, 2);
  assert_eq!(summary.products, None);
  assert_eq!(second.products().list().source(), ListSource::Cache);
  assert_eq!(second.products().records().len(), 2);

  // Once reachable, the store wins.
  offline.allow(Product::COLLECTION);
  second.products().refresh().await.unwrap();
  assert_eq!(second.products().list().source(), ListSource::Store);
  assert!(second.products().records().is_empty());
  let cached = JsonFileCache::new(&path).load(Product::COLLECTION).await.unwrap().unwrap();
  assert!(cached.is_empty());
}

#[tokio::test]
#[serial]
async fn local_patches_never_reach_the_snapshot() {
  setup_tracing();
  let store = memory_store();
  let cache = Arc::new(MemoryCache::new());
  let dashboard = Dashboard::builder(store.clone())
    .product_cache(cache.clone())
    .sync_strategy(SyncStrategy::Patch)
    .build()
    .unwrap();
  dashboard.mount().await;
  assert_eq!(cache.load(Product::COLLECTION).await.unwrap().map(|d| d.len()), Some(0));

  dashboard.submit_product(pink_floral_dress()).await.unwrap();

  assert_eq!(dashboard.products().records().len(), 1);
  assert_eq!(cache.load(Product::COLLECTION).await.unwrap().map(|d| d.len()), Some(0));
  dashboard.products().refresh().await.unwrap();
  assert_eq!(cache.load(Product::COLLECTION).await.unwrap().map(|d| d.len()), Some(1));
}

#[tokio::test]
#[serial]
async fn seeding_is_skipped_once_the_list_has_been_fetched() {
  setup_tracing();
  let store = memory_store();
  let cache = Arc::new(MemoryCache::new());
  cache
    .save(Product::COLLECTION, &[tattva::StoredDocument {
      id: "stale".into(),
      created_at: None,
      fields: new_fields("Stale Lamp", 1.0),
    }])
    .await
    .unwrap();
  let list = EntityList::<Product>::new(store.clone()).with_cache(cache.clone());

  list.refresh().await.unwrap();

  assert_eq!(list.seed_from_cache().await.unwrap(), 0);
  assert!(list.is_empty());
}

#[tokio::test]
#[serial]
async fn corrupt_snapshot_file_is_a_cache_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("snapshot.json");
  std::fs::write(&path, b"{ not json").unwrap();
  let err = JsonFileCache::new(&path).load(Product::COLLECTION).await.unwrap_err();
  assert!(matches!(err, tattva::TattvaError::Cache(_)));
  assert!(JsonFileCache::new(dir.path().join("missing.json")).load("products").await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn snapshot_file_is_written_into_a_fresh_directory_and_keeps_other_collections() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("state").join("snapshot.json");
  let cache = JsonFileCache::new(&path);
  let store = memory_store();
  store.create("products", new_fields("Vase", 12.0)).await.unwrap();
  let docs = store.read_all("products").await.unwrap();

  cache.save("products", &docs).await.unwrap();
  cache.save("categories", &[]).await.unwrap();

  let reopened = JsonFileCache::new(&path);
  assert_eq!(reopened.load("products").await.unwrap().unwrap(), docs);
  assert!(reopened.load("categories").await.unwrap().unwrap().is_empty());
  assert!(!path.with_extension("tmp").exists());
}
