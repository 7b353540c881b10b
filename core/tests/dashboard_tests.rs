// tests/dashboard_tests.rs
mod common;
use common::*;
use serial_test::serial;
use tattva::{
  Category, Dashboard, EditPolicy, Entity, FormKind, MutationOutcome, NotificationLevel, OrderStatus, Panel,
  Product, View,
};

#[tokio::test]
#[serial]
async fn mount_loads_both_collections() {
  setup_tracing();
  let store = memory_store();
  insert_category(store.as_ref(), "Textiles", 5).await;
  let dashboard = Dashboard::builder(store.clone()).build().unwrap();

  let summary = dashboard.mount().await;

  assert_eq!(summary.products, Some(0));
  assert_eq!(summary.categories, Some(1));
  assert_eq!(dashboard.categories().records()[0].product_count, 5);
  assert_eq!(dashboard.stats().categories, 1);
}

#[tokio::test]
#[serial]
async fn mount_survives_a_denied_collection() {
  setup_tracing();
  let store = memory_store();
  store.deny(Category::COLLECTION);
  let dashboard = Dashboard::builder(store.clone()).build().unwrap();

  let summary = dashboard.mount().await;

  assert_eq!(summary.products, Some(0));
  assert_eq!(summary.categories, None);
  assert!(dashboard.categories().list().last_error().is_some());
  // Fetch failures are logged, not toasted.
  assert!(dashboard.drain_notifications().is_empty());
}

#[tokio::test]
#[serial]
async fn create_form_closes_only_after_an_acknowledged_submit() {
  setup_tracing();
  let store = memory_store();
  let dashboard = Dashboard::builder(store.clone()).build().unwrap();
  dashboard.mount().await;
  dashboard.with_shell(|s| s.open_form(FormKind::Product));

  let mut invalid = pink_floral_dress();
  invalid.price = "".into();
  assert!(dashboard.submit_product(invalid).await.is_err());
  assert!(dashboard.shell().is_open(FormKind::Product));

  store.deny(Product::COLLECTION);
  assert!(dashboard.submit_product(pink_floral_dress()).await.is_err());
  assert!(dashboard.shell().is_open(FormKind::Product));
  let raised = dashboard.drain_notifications();
  assert_eq!(raised.len(), 1);
  assert_eq!(raised[0].level, NotificationLevel::Error);

  store.allow(Product::COLLECTION);
  let outcome = dashboard.submit_product(pink_floral_dress()).await.unwrap();
  assert!(matches!(outcome, MutationOutcome::Created(_)));
  assert!(!dashboard.shell().is_open(FormKind::Product));
  assert_eq!(dashboard.stats().products, 1);
}

#[tokio::test]
#[serial]
async fn shell_and_orders_need_no_store() {
  setup_tracing();
  let dashboard = Dashboard::builder(memory_store())
    .edit_policy(EditPolicy::SingleRow)
    .build()
    .unwrap();

  dashboard.with_shell(|s| s.select(View::Orders));
  assert_eq!(
    dashboard.shell().panels(),
    vec![Panel::OrderStatusFilter, Panel::OrderCards, Panel::OrderTable]
  );
  assert_eq!(dashboard.orders(None).len(), 5);
  let shipped = dashboard.orders(Some(OrderStatus::Shipped));
  assert_eq!(shipped.len(), 1);
  assert_eq!(shipped[0].order_number, "ORD-002");
  assert_eq!(dashboard.products().edit_policy(), EditPolicy::SingleRow);
  assert_eq!(dashboard.stats().cards()[0].value, "665.00");
}
