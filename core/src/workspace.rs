// tattva/src/workspace.rs

//! One collection's list, edit state and dispatcher wired together: the
//! table-plus-cards view of products or categories.

use crate::core::SharedState;
use crate::dispatch::{Confirm, MutationDispatcher, MutationOutcome, SyncStrategy};
use crate::edit::{EditPolicy, EditSession, RowMode};
use crate::error::{TattvaError, TattvaResult};
use crate::list::EntityList;
use crate::model::{Draft, Entity};
use crate::notify::Notifier;
use crate::store::DocumentId;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct EntityWorkspace<E: Entity> {
  list: EntityList<E>,
  edits: SharedState<EditSession<E>>,
  dispatcher: MutationDispatcher<E>,
}

impl<E: Entity> EntityWorkspace<E> {
  /// `list` should already carry its snapshot cache, if any.
  pub fn new(list: EntityList<E>, notifier: Arc<dyn Notifier>, policy: EditPolicy, sync: SyncStrategy) -> TattvaResult<Self> {
    let dispatcher = MutationDispatcher::new(list.clone(), notifier, sync)?;
    Ok(Self {
      list,
      edits: SharedState::new(EditSession::new(policy)),
      dispatcher,
    })
  }

  pub fn list(&self) -> &EntityList<E> {
    &self.list
  }

  pub fn dispatcher(&self) -> &MutationDispatcher<E> {
    &self.dispatcher
  }

  /// For attaching hooks before the workspace is shared.
  pub fn dispatcher_mut(&mut self) -> &mut MutationDispatcher<E> {
    &mut self.dispatcher
  }

  pub fn edit_policy(&self) -> EditPolicy {
    self.edits.read().policy()
  }

  pub fn records(&self) -> Vec<E> {
    self.list.records()
  }

  pub async fn seed_from_cache(&self) -> TattvaResult<usize> {
    self.list.seed_from_cache().await
  }

  pub async fn refresh(&self) -> TattvaResult<usize> {
    self.list.refresh().await
  }

  pub fn mode(&self, id: &DocumentId) -> RowMode {
    self.edits.read().mode(id)
  }

  pub fn editing(&self) -> Vec<DocumentId> {
    self.edits.read().editing()
  }

  pub fn draft(&self, id: &DocumentId) -> Option<E::Draft> {
    self.edits.read().draft(id).cloned()
  }

  /// Enters edit mode for a loaded record and returns its fresh draft.
  pub fn begin_edit(&self, id: &DocumentId) -> TattvaResult<E::Draft> {
    let record = self.list.get(id).ok_or_else(|| TattvaError::UnknownRecord {
      collection: E::COLLECTION.to_string(),
      id: id.clone(),
    })?;
    Ok(self.edits.update(|s| s.begin(&record).clone()))
  }

  /// Replaces the draft of a row in edit mode. The committed list is untouched.
  pub fn edit_draft(&self, id: &DocumentId, draft: E::Draft) -> TattvaResult<()> {
    self.edits.update(|s| s.set_draft(id, draft))
  }

  /// Mutates the draft in place and returns the result.
  pub fn update_draft(&self, id: &DocumentId, f: impl FnOnce(&mut E::Draft)) -> TattvaResult<E::Draft> {
    self.edits.update(|s| match s.draft_mut(id) {
      Some(draft) => {
        f(draft);
        Ok(draft.clone())
      }
      None => Err(TattvaError::NotEditing { id: id.clone() }),
    })
  }

  /// Discards the draft; false when the row was not being edited.
  pub fn cancel_edit(&self, id: &DocumentId) -> bool {
    self.edits.update(|s| s.cancel(id)).is_some()
  }

  /// Commits the row's draft. The row leaves edit mode on success; on any
  /// failure the draft is put back so the operator can retry, unless a newer
  /// edit was started while the save was in flight.
  #[instrument(name = "EntityWorkspace::save_edit", skip(self), fields(collection = E::COLLECTION, %id))]
  pub async fn save_edit(&self, id: &DocumentId) -> TattvaResult<MutationOutcome> {
    let draft = self
      .edits
      .update(|s| s.take(id))
      .ok_or_else(|| TattvaError::NotEditing { id: id.clone() })?;

    match self.dispatcher.update(id, draft.clone()).await {
      Ok(MutationOutcome::Declined) => {
        self.restore(id, draft);
        Ok(MutationOutcome::Declined)
      }
      Ok(outcome) => Ok(outcome),
      Err(e) => {
        self.restore(id, draft);
        Err(e)
      }
    }
  }

  fn restore(&self, id: &DocumentId, draft: E::Draft) {
    if self.edits.update(|s| s.restore(id.clone(), draft)) {
      debug!(collection = E::COLLECTION, %id, "draft restored after unsuccessful save");
    }
  }

  /// Validates a draft without saving it.
  pub fn check_draft(&self, id: &DocumentId) -> TattvaResult<()> {
    let draft = self.draft(id).ok_or_else(|| TattvaError::NotEditing { id: id.clone() })?;
    draft.validate().map_err(TattvaError::from)
  }

  pub async fn create(&self, input: E::New) -> TattvaResult<MutationOutcome> {
    self.dispatcher.create(input).await
  }

  /// Deletes after confirmation. A pending draft for the row is dropped once
  /// the delete succeeds.
  pub async fn delete(&self, id: &DocumentId, confirm: impl Confirm + 'static) -> TattvaResult<MutationOutcome> {
    let outcome = self.dispatcher.delete(id, confirm).await?;
    if matches!(outcome, MutationOutcome::Deleted(_)) {
      self.edits.update(|s| s.cancel(id));
    }
    Ok(outcome)
  }
}
