// tattva/src/dispatch.rs

//! Create, update and delete for one collection.
//!
//! Every mutation runs as a [`Flow`]: `validate`/`confirm`, `write`, then
//! either `patch_local` or `refetch` depending on the [`SyncStrategy`], then
//! `notify`. A success notification is only raised once the store has
//! acknowledged the write. Failures are logged, turned into an error
//! notification and returned; the list is left as it was.
//!
//! Applications can attach their own `before`/`after` handlers to any step
//! through [`MutationDispatcher::create_flow_mut`] and friends.

use crate::core::{FlowControl, FlowOutcome, SharedState, StepDef};
use crate::error::{TattvaError, TattvaResult};
use crate::flow::Flow;
use crate::list::EntityList;
use crate::model::{Draft, Entity, NewRecord};
use crate::notify::{Notification, Notifier};
use crate::store::{DocumentId, RecordStore, StoreOp};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub const STEP_VALIDATE: &str = "validate";
pub const STEP_CONFIRM: &str = "confirm";
pub const STEP_WRITE: &str = "write";
pub const STEP_PATCH_LOCAL: &str = "patch_local";
pub const STEP_REFETCH: &str = "refetch";
pub const STEP_NOTIFY: &str = "notify";

/// How the list catches up after an acknowledged write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStrategy {
  /// Re-read the whole collection.
  #[default]
  Refetch,
  /// Apply the acknowledged change to the loaded list without a round trip.
  Patch,
}

impl FromStr for SyncStrategy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "refetch" => Ok(SyncStrategy::Refetch),
      "patch" => Ok(SyncStrategy::Patch),
      other => Err(format!("unknown sync strategy '{}'", other)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "id", rename_all = "snake_case")]
pub enum MutationOutcome {
  Created(DocumentId),
  Updated(DocumentId),
  Deleted(DocumentId),
  /// The operator declined the confirmation, or a hook halted the flow
  /// before `write`. Nothing was written. A halt after an acknowledged
  /// write reports the completed mutation instead.
  Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationKind {
  Create,
  Update,
  Delete,
}

impl MutationKind {
  fn done(self) -> &'static str {
    match self {
      MutationKind::Create => "added",
      MutationKind::Update => "updated",
      MutationKind::Delete => "deleted",
    }
  }

  fn doing(self) -> &'static str {
    match self {
      MutationKind::Create => "adding",
      MutationKind::Update => "updating",
      MutationKind::Delete => "deleting",
    }
  }
}

/// Asked by the `confirm` step of a delete.
pub trait Confirm: Send + Sync {
  fn confirm(&self, label: &str, id: &DocumentId) -> bool;
}

impl Confirm for bool {
  fn confirm(&self, _label: &str, _id: &DocumentId) -> bool {
    *self
  }
}

/// Per-run data of a create flow.
#[derive(Debug, Clone)]
pub struct CreateCtx<E: Entity> {
  pub input: E::New,
  pub sync: SyncStrategy,
  /// Set by `write` once the store has acknowledged the document.
  pub id: Option<DocumentId>,
}

#[derive(Debug, Clone)]
pub struct UpdateCtx<E: Entity> {
  pub id: DocumentId,
  pub draft: E::Draft,
  pub sync: SyncStrategy,
  /// Set by `write` once the store has acknowledged the change.
  pub written: bool,
}

pub struct DeleteCtx<E: Entity> {
  pub id: DocumentId,
  /// The row as loaded when the delete was requested, if it was loaded.
  pub record: Option<E>,
  pub sync: SyncStrategy,
  pub confirm: Arc<dyn Confirm>,
  pub written: bool,
}

pub type CreateFlow<E> = Flow<CreateCtx<E>, TattvaError>;
pub type UpdateFlow<E> = Flow<UpdateCtx<E>, TattvaError>;
pub type DeleteFlow<E> = Flow<DeleteCtx<E>, TattvaError>;

pub struct MutationDispatcher<E: Entity> {
  list: EntityList<E>,
  notifier: Arc<dyn Notifier>,
  sync: SyncStrategy,
  create_flow: CreateFlow<E>,
  update_flow: UpdateFlow<E>,
  delete_flow: DeleteFlow<E>,
}

impl<E: Entity> MutationDispatcher<E> {
  pub fn new(list: EntityList<E>, notifier: Arc<dyn Notifier>, sync: SyncStrategy) -> TattvaResult<Self> {
    let create_flow = build_create_flow(&list, &notifier)?;
    let update_flow = build_update_flow(&list, &notifier)?;
    let delete_flow = build_delete_flow(&list, &notifier)?;
    Ok(Self {
      list,
      notifier,
      sync,
      create_flow,
      update_flow,
      delete_flow,
    })
  }

  pub fn sync_strategy(&self) -> SyncStrategy {
    self.sync
  }

  pub fn list(&self) -> &EntityList<E> {
    &self.list
  }

  pub fn create_flow_mut(&mut self) -> &mut CreateFlow<E> {
    &mut self.create_flow
  }

  pub fn update_flow_mut(&mut self) -> &mut UpdateFlow<E> {
    &mut self.update_flow
  }

  pub fn delete_flow_mut(&mut self) -> &mut DeleteFlow<E> {
    &mut self.delete_flow
  }

  #[instrument(name = "MutationDispatcher::create", skip_all, fields(collection = E::COLLECTION))]
  pub async fn create(&self, input: E::New) -> TattvaResult<MutationOutcome> {
    let ctx = SharedState::new(CreateCtx {
      input,
      sync: self.sync,
      id: None,
    });
    let result = self.create_flow.run(ctx.clone()).await;
    let id = ctx.read().id.clone();
    let written = id.is_some();
    self.settle(MutationKind::Create, result, written, id.map(MutationOutcome::Created))
  }

  /// Writes `draft`'s editable fields to the document `id`.
  #[instrument(name = "MutationDispatcher::update", skip(self, draft), fields(collection = E::COLLECTION, %id))]
  pub async fn update(&self, id: &DocumentId, draft: E::Draft) -> TattvaResult<MutationOutcome> {
    let ctx = SharedState::new(UpdateCtx {
      id: id.clone(),
      draft,
      sync: self.sync,
      written: false,
    });
    let result = self.update_flow.run(ctx.clone()).await;
    let written = ctx.read().written;
    self.settle(MutationKind::Update, result, written, Some(MutationOutcome::Updated(id.clone())))
  }

  #[instrument(name = "MutationDispatcher::delete", skip(self, confirm), fields(collection = E::COLLECTION, %id))]
  pub async fn delete(&self, id: &DocumentId, confirm: impl Confirm + 'static) -> TattvaResult<MutationOutcome> {
    let ctx = SharedState::new(DeleteCtx {
      id: id.clone(),
      record: self.list.get(id),
      sync: self.sync,
      confirm: Arc::new(confirm),
      written: false,
    });
    let result = self.delete_flow.run(ctx.clone()).await;
    let written = ctx.read().written;
    self.settle(MutationKind::Delete, result, written, Some(MutationOutcome::Deleted(id.clone())))
  }

  fn settle(
    &self,
    kind: MutationKind,
    result: TattvaResult<FlowOutcome>,
    written: bool,
    completed: Option<MutationOutcome>,
  ) -> TattvaResult<MutationOutcome> {
    match result {
      Ok(FlowOutcome::Halted) if !written => Ok(MutationOutcome::Declined),
      Ok(outcome) => {
        if outcome == FlowOutcome::Halted {
          info!(collection = E::COLLECTION, "flow halted after the store acknowledged the write");
        }
        completed.ok_or_else(|| {
          TattvaError::Internal(format!("{} flow for '{}' completed without a document id", E::LABEL, E::COLLECTION))
        })
      }
      Err(e) => {
        self.report_failure(kind, &e);
        Err(e)
      }
    }
  }

  fn report_failure(&self, kind: MutationKind, error: &TattvaError) {
    if let TattvaError::Validation(v) = error {
      // Blocked before any store call; the caller shows it next to the form.
      warn!(collection = E::COLLECTION, error = %v, "submission rejected by validation");
      return;
    }
    warn!(collection = E::COLLECTION, error = %error, "mutation failed");
    let message = match (kind, E::CREATE_DENIED_MESSAGE) {
      (MutationKind::Create, Some(denied)) if error.is_permission_denied() => denied.to_string(),
      _ => format!("Error {} {}. Please try again.", kind.doing(), E::LABEL),
    };
    self.notifier.notify(Notification::error(message));
  }
}

fn capitalized(label: &str) -> String {
  let mut chars = label.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

fn success_message<E: Entity>(kind: MutationKind) -> String {
  format!("{} {} successfully!", capitalized(E::LABEL), kind.done())
}

fn sync_steps<TData: Send + Sync + 'static>(sync_of: fn(&TData) -> SyncStrategy) -> [StepDef<TData>; 2] {
  [
    StepDef::required(STEP_PATCH_LOCAL).skip_when(move |d: &TData| sync_of(d) != SyncStrategy::Patch),
    StepDef::required(STEP_REFETCH).skip_when(move |d: &TData| sync_of(d) != SyncStrategy::Refetch),
  ]
}

/// Refetch after an acknowledged write. A failed re-read does not undo the
/// write; the list keeps its contents and records the error.
async fn refetch_after_write<E: Entity>(list: EntityList<E>) -> TattvaResult<FlowControl> {
  if let Err(e) = list.refresh().await {
    warn!(collection = E::COLLECTION, error = %e, "refetch after write failed");
  }
  Ok(FlowControl::Proceed)
}

fn notify_step<TData, E>(notifier: &Arc<dyn Notifier>, kind: MutationKind) -> impl Fn(SharedState<TData>) -> std::future::Ready<TattvaResult<FlowControl>> + Send + Sync + 'static
where
  TData: Send + Sync + 'static,
  E: Entity,
{
  let notifier = Arc::clone(notifier);
  move |_ctx| {
    notifier.notify(Notification::success(success_message::<E>(kind)));
    std::future::ready(Ok(FlowControl::Proceed))
  }
}

fn build_create_flow<E: Entity>(list: &EntityList<E>, notifier: &Arc<dyn Notifier>) -> TattvaResult<CreateFlow<E>> {
  let [patch_local, refetch] = sync_steps::<CreateCtx<E>>(|c| c.sync);
  let mut flow = Flow::new(
    format!("create_{}", E::LABEL),
    vec![
      StepDef::required(STEP_VALIDATE),
      StepDef::required(STEP_WRITE),
      patch_local,
      refetch,
      StepDef::required(STEP_NOTIFY),
    ],
  );

  flow.on(STEP_VALIDATE, |ctx: SharedState<CreateCtx<E>>| {
    let checked = ctx.read().input.validate();
    std::future::ready(checked.map(|_| FlowControl::Proceed).map_err(TattvaError::from))
  })?;

  let store: Arc<dyn RecordStore> = Arc::clone(list.store());
  flow.on(STEP_WRITE, move |ctx: SharedState<CreateCtx<E>>| {
    let store = Arc::clone(&store);
    async move {
      let fields = ctx.read().input.to_create_fields()?;
      let id = store
        .create(E::COLLECTION, fields)
        .await
        .map_err(|e| TattvaError::store(StoreOp::Create, E::COLLECTION, e))?;
      info!(collection = E::COLLECTION, %id, "document created");
      ctx.write().id = Some(id);
      Ok::<_, TattvaError>(FlowControl::Proceed)
    }
  })?;

  let local = list.clone();
  flow.on(STEP_PATCH_LOCAL, move |ctx: SharedState<CreateCtx<E>>| {
    let acknowledged = {
      let c = ctx.read();
      c.id.clone().map(|id| (id, c.input.clone()))
    };
    let result = match acknowledged {
      Some((id, input)) => input.into_record(id, None).map(|record| {
        local.push_local(record);
        FlowControl::Proceed
      }),
      None => Err(TattvaError::Internal("create acknowledged without an id".to_string())),
    };
    std::future::ready(result)
  })?;

  let fetch = list.clone();
  flow.on(STEP_REFETCH, move |_ctx: SharedState<CreateCtx<E>>| refetch_after_write(fetch.clone()))?;
  flow.on(STEP_NOTIFY, notify_step::<CreateCtx<E>, E>(notifier, MutationKind::Create))?;
  Ok(flow)
}

fn build_update_flow<E: Entity>(list: &EntityList<E>, notifier: &Arc<dyn Notifier>) -> TattvaResult<UpdateFlow<E>> {
  let [patch_local, refetch] = sync_steps::<UpdateCtx<E>>(|c| c.sync);
  let mut flow = Flow::new(
    format!("update_{}", E::LABEL),
    vec![
      StepDef::required(STEP_VALIDATE),
      StepDef::required(STEP_WRITE),
      patch_local,
      refetch,
      StepDef::required(STEP_NOTIFY),
    ],
  );

  flow.on(STEP_VALIDATE, |ctx: SharedState<UpdateCtx<E>>| {
    let checked = ctx.read().draft.validate();
    std::future::ready(checked.map(|_| FlowControl::Proceed).map_err(TattvaError::from))
  })?;

  let store: Arc<dyn RecordStore> = Arc::clone(list.store());
  flow.on(STEP_WRITE, move |ctx: SharedState<UpdateCtx<E>>| {
    let store = Arc::clone(&store);
    async move {
      let (id, fields) = {
        let c = ctx.read();
        (c.id.clone(), c.draft.to_update_fields())
      };
      store
        .update_by_id(E::COLLECTION, &id, fields?)
        .await
        .map_err(|e| TattvaError::store(StoreOp::Update, E::COLLECTION, e))?;
      info!(collection = E::COLLECTION, %id, "document updated");
      ctx.write().written = true;
      Ok::<_, TattvaError>(FlowControl::Proceed)
    }
  })?;

  let local = list.clone();
  flow.on(STEP_PATCH_LOCAL, move |ctx: SharedState<UpdateCtx<E>>| {
    let (id, draft) = {
      let c = ctx.read();
      (c.id.clone(), c.draft.clone())
    };
    let result = local.patch_local(&id, |record| record.apply_draft(&draft)).map(|found| {
      if !found {
        warn!(collection = E::COLLECTION, %id, "updated document is not in the loaded list");
      }
      FlowControl::Proceed
    });
    std::future::ready(result)
  })?;

  let fetch = list.clone();
  flow.on(STEP_REFETCH, move |_ctx: SharedState<UpdateCtx<E>>| refetch_after_write(fetch.clone()))?;
  flow.on(STEP_NOTIFY, notify_step::<UpdateCtx<E>, E>(notifier, MutationKind::Update))?;
  Ok(flow)
}

fn build_delete_flow<E: Entity>(list: &EntityList<E>, notifier: &Arc<dyn Notifier>) -> TattvaResult<DeleteFlow<E>> {
  let [patch_local, refetch] = sync_steps::<DeleteCtx<E>>(|c| c.sync);
  let mut flow = Flow::new(
    format!("delete_{}", E::LABEL),
    vec![
      StepDef::required(STEP_CONFIRM),
      StepDef::required(STEP_WRITE),
      patch_local,
      refetch,
      StepDef::required(STEP_NOTIFY),
    ],
  );

  flow.on(STEP_CONFIRM, |ctx: SharedState<DeleteCtx<E>>| {
    let (approved, id) = {
      let c = ctx.read();
      (c.confirm.confirm(E::LABEL, &c.id), c.id.clone())
    };
    let control = if approved {
      FlowControl::Proceed
    } else {
      info!(collection = E::COLLECTION, %id, "delete declined");
      FlowControl::Halt
    };
    std::future::ready(Ok::<_, TattvaError>(control))
  })?;

  let store: Arc<dyn RecordStore> = Arc::clone(list.store());
  flow.on(STEP_WRITE, move |ctx: SharedState<DeleteCtx<E>>| {
    let store = Arc::clone(&store);
    async move {
      let id = ctx.read().id.clone();
      store
        .delete_by_id(E::COLLECTION, &id)
        .await
        .map_err(|e| TattvaError::store(StoreOp::Delete, E::COLLECTION, e))?;
      info!(collection = E::COLLECTION, %id, "document deleted");
      ctx.write().written = true;
      Ok::<_, TattvaError>(FlowControl::Proceed)
    }
  })?;

  let local = list.clone();
  flow.on(STEP_PATCH_LOCAL, move |ctx: SharedState<DeleteCtx<E>>| {
    let id = ctx.read().id.clone();
    local.remove_local(&id);
    std::future::ready(Ok::<_, TattvaError>(FlowControl::Proceed))
  })?;

  let fetch = list.clone();
  flow.on(STEP_REFETCH, move |_ctx: SharedState<DeleteCtx<E>>| refetch_after_write(fetch.clone()))?;
  flow.on(STEP_NOTIFY, notify_step::<DeleteCtx<E>, E>(notifier, MutationKind::Delete))?;
  Ok(flow)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{Category, CategoryStatus, NewCategory, NewProduct, Product, ProductStatus};
  use crate::notify::{NotificationCenter, NotificationLevel};
  use crate::store::{InMemoryStore, StoreError};

  fn new_category(name: &str) -> NewCategory {
    NewCategory {
      name: name.to_string(),
      description: "Handmade".to_string(),
      image_urls: Vec::new(),
      status: CategoryStatus::Active,
    }
  }

  fn dispatcher<E: Entity>(
    store: &Arc<InMemoryStore>,
    sync: SyncStrategy,
  ) -> (MutationDispatcher<E>, Arc<NotificationCenter>) {
    let notes = Arc::new(NotificationCenter::new());
    let list = EntityList::<E>::new(store.clone());
    let dispatcher = MutationDispatcher::new(list, notes.clone(), sync).unwrap();
    (dispatcher, notes)
  }

  #[tokio::test]
  async fn patch_strategy_appends_without_a_refetch() {
    let store = Arc::new(InMemoryStore::new());
    let (d, notes) = dispatcher::<Category>(&store, SyncStrategy::Patch);

    let outcome = d.create(new_category("Pottery")).await.unwrap();

    let MutationOutcome::Created(id) = outcome else { panic!("expected a created document") };
    assert_eq!(store.call_count(StoreOp::ReadAll), 0);
    let local = d.list().get(&id).unwrap();
    assert_eq!(local.name, "Pottery");
    assert_eq!(local.created_at, None);
    assert_eq!(notes.drain()[0].message, "Category added successfully!");
  }

  #[tokio::test]
  async fn declined_delete_never_reaches_the_store() {
    let store = Arc::new(InMemoryStore::new());
    let (d, notes) = dispatcher::<Category>(&store, SyncStrategy::Refetch);
    let MutationOutcome::Created(id) = d.create(new_category("Pottery")).await.unwrap() else { unreachable!() };
    notes.drain();

    assert_eq!(d.delete(&id, false).await.unwrap(), MutationOutcome::Declined);
    assert_eq!(store.call_count(StoreOp::Delete), 0);
    assert!(d.list().contains(&id));
    assert!(notes.drain().is_empty());
  }

  #[tokio::test]
  async fn denied_product_create_uses_the_access_rules_message() {
    let store = Arc::new(InMemoryStore::new());
    store.deny(Product::COLLECTION);
    let (d, notes) = dispatcher::<Product>(&store, SyncStrategy::Refetch);
    let input = NewProduct {
      name: "Pink Floral Dress".into(),
      price: "49.99".into(),
      category: "Clothing".into(),
      status: ProductStatus::Published,
      ..NewProduct::default()
    };

    let err = d.create(input).await.unwrap_err();

    assert!(err.is_permission_denied());
    let raised = notes.drain();
    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].level, NotificationLevel::Error);
    assert_eq!(raised[0].message, "Permission denied. Please check the store access rules.");
  }

  #[tokio::test]
  async fn other_failures_use_the_generic_message() {
    let store = Arc::new(InMemoryStore::new());
    store.inject(crate::store::Fault::before_commit(
      StoreOp::Create,
      StoreError::Unavailable("offline".into()),
    ));
    let (d, notes) = dispatcher::<Category>(&store, SyncStrategy::Refetch);

    assert!(d.create(new_category("Pottery")).await.is_err());
    assert_eq!(notes.drain()[0].message, "Error adding category. Please try again.");
    assert!(d.list().is_empty());
  }

  #[tokio::test]
  async fn invalid_input_is_blocked_before_the_store() {
    let store = Arc::new(InMemoryStore::new());
    let (d, notes) = dispatcher::<Category>(&store, SyncStrategy::Refetch);

    let err = d.create(new_category("  ")).await.unwrap_err();

    assert!(matches!(err, TattvaError::Validation(_)));
    assert_eq!(store.call_count(StoreOp::Create), 0);
    assert!(notes.drain().is_empty());
  }

  #[test]
  fn strategy_parses_from_config_strings() {
    assert_eq!("Patch".parse::<SyncStrategy>().unwrap(), SyncStrategy::Patch);
    assert!("sometimes".parse::<SyncStrategy>().is_err());
  }
}
