// tattva/src/dashboard.rs

//! The whole admin dashboard: product and category workspaces, the shell,
//! the demo orders and the notification queue.

use crate::cache::SnapshotCache;
use crate::core::SharedState;
use crate::dispatch::{MutationOutcome, SyncStrategy};
use crate::edit::EditPolicy;
use crate::error::TattvaResult;
use crate::list::EntityList;
use crate::model::order::{demo_orders, filter_by_status};
use crate::model::{Category, Entity, NewCategory, NewProduct, Order, OrderStatus, Product};
use crate::notify::{Notification, NotificationCenter};
use crate::shell::{FormKind, Shell};
use crate::stats::DashboardStats;
use crate::store::RecordStore;
use crate::workspace::EntityWorkspace;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A collection the dashboard manages: which workspace holds it and which
/// create form belongs to it.
pub trait CatalogEntity: Entity {
  const FORM: FormKind;

  fn workspace(dashboard: &Dashboard) -> &EntityWorkspace<Self>;

  fn workspace_mut(dashboard: &mut Dashboard) -> &mut EntityWorkspace<Self>;
}

impl CatalogEntity for Product {
  const FORM: FormKind = FormKind::Product;

  fn workspace(dashboard: &Dashboard) -> &EntityWorkspace<Self> {
    &dashboard.products
  }

  fn workspace_mut(dashboard: &mut Dashboard) -> &mut EntityWorkspace<Self> {
    &mut dashboard.products
  }
}

impl CatalogEntity for Category {
  const FORM: FormKind = FormKind::Category;

  fn workspace(dashboard: &Dashboard) -> &EntityWorkspace<Self> {
    &dashboard.categories
  }

  fn workspace_mut(dashboard: &mut Dashboard) -> &mut EntityWorkspace<Self> {
    &mut dashboard.categories
  }
}

/// What `mount` managed to load. `None` means the fetch failed and the list
/// kept its previous (possibly cached) contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountSummary {
  pub products_seeded: usize,
  pub products: Option<usize>,
  pub categories: Option<usize>,
}

pub struct DashboardBuilder {
  store: Arc<dyn RecordStore>,
  product_cache: Option<Arc<dyn SnapshotCache>>,
  edit_policy: EditPolicy,
  sync: SyncStrategy,
  notifications: Option<Arc<NotificationCenter>>,
}

impl DashboardBuilder {
  /// Only the product list is snapshotted.
  pub fn product_cache(mut self, cache: Arc<dyn SnapshotCache>) -> Self {
    self.product_cache = Some(cache);
    self
  }

  pub fn edit_policy(mut self, policy: EditPolicy) -> Self {
    self.edit_policy = policy;
    self
  }

  pub fn sync_strategy(mut self, sync: SyncStrategy) -> Self {
    self.sync = sync;
    self
  }

  pub fn notifications(mut self, center: Arc<NotificationCenter>) -> Self {
    self.notifications = Some(center);
    self
  }

  pub fn build(self) -> TattvaResult<Dashboard> {
    let notifications = self.notifications.unwrap_or_default();

    let mut product_list = EntityList::<Product>::new(Arc::clone(&self.store));
    if let Some(cache) = self.product_cache {
      product_list = product_list.with_cache(cache);
    }
    let category_list = EntityList::<Category>::new(Arc::clone(&self.store));

    Ok(Dashboard {
      products: EntityWorkspace::new(product_list, notifications.clone(), self.edit_policy, self.sync)?,
      categories: EntityWorkspace::new(category_list, notifications.clone(), self.edit_policy, self.sync)?,
      shell: SharedState::new(Shell::new()),
      orders: demo_orders(),
      notifications,
    })
  }
}

pub struct Dashboard {
  products: EntityWorkspace<Product>,
  categories: EntityWorkspace<Category>,
  shell: SharedState<Shell>,
  orders: Vec<Order>,
  notifications: Arc<NotificationCenter>,
}

impl Dashboard {
  pub fn builder(store: Arc<dyn RecordStore>) -> DashboardBuilder {
    DashboardBuilder {
      store,
      product_cache: None,
      edit_policy: EditPolicy::default(),
      sync: SyncStrategy::default(),
      notifications: None,
    }
  }

  /// Seeds the product list from its snapshot, then fetches both
  /// collections. Fetch failures are logged and reported in the summary.
  #[instrument(name = "Dashboard::mount", skip(self))]
  pub async fn mount(&self) -> MountSummary {
    let products_seeded = self.products.seed_from_cache().await.unwrap_or_else(|e| {
      warn!(error = %e, "product snapshot unreadable; starting empty");
      0
    });
    let products = self.products.refresh().await.ok();
    let categories = self.categories.refresh().await.ok();
    let summary = MountSummary {
      products_seeded,
      products,
      categories,
    };
    info!(?summary, "dashboard mounted");
    summary
  }

  pub fn products(&self) -> &EntityWorkspace<Product> {
    &self.products
  }

  pub fn products_mut(&mut self) -> &mut EntityWorkspace<Product> {
    &mut self.products
  }

  pub fn categories(&self) -> &EntityWorkspace<Category> {
    &self.categories
  }

  pub fn categories_mut(&mut self) -> &mut EntityWorkspace<Category> {
    &mut self.categories
  }

  pub fn shell(&self) -> Shell {
    self.shell.snapshot()
  }

  pub fn with_shell<R>(&self, f: impl FnOnce(&mut Shell) -> R) -> R {
    self.shell.update(f)
  }

  pub fn workspace<E: CatalogEntity>(&self) -> &EntityWorkspace<E> {
    E::workspace(self)
  }

  pub fn workspace_mut<E: CatalogEntity>(&mut self) -> &mut EntityWorkspace<E> {
    E::workspace_mut(self)
  }

  /// Create-form submission: the form closes only once the store has
  /// acknowledged the new record.
  pub async fn submit<E: CatalogEntity>(&self, input: E::New) -> TattvaResult<MutationOutcome> {
    let result = E::workspace(self).create(input).await;
    let created = matches!(result, Ok(MutationOutcome::Created(_)));
    self.shell.update(|s| s.form_submitted(E::FORM, created));
    result
  }

  pub async fn submit_product(&self, input: NewProduct) -> TattvaResult<MutationOutcome> {
    self.submit::<Product>(input).await
  }

  pub async fn submit_category(&self, input: NewCategory) -> TattvaResult<MutationOutcome> {
    self.submit::<Category>(input).await
  }

  pub fn orders(&self, status: Option<OrderStatus>) -> Vec<Order> {
    filter_by_status(&self.orders, status)
  }

  pub fn stats(&self) -> DashboardStats {
    DashboardStats::compute(&self.products.records(), &self.categories.records(), &self.orders)
  }

  pub fn notifications(&self) -> &Arc<NotificationCenter> {
    &self.notifications
  }

  pub fn drain_notifications(&self) -> Vec<Notification> {
    self.notifications.drain()
  }
}
