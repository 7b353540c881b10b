// tattva/src/edit.rs

//! Row edit state: which rows are in edit mode and their unsaved drafts.
//! Drafts never touch the committed list.

use crate::error::{TattvaError, TattvaResult};
use crate::model::Entity;
use crate::store::DocumentId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditPolicy {
  /// One shared edit slot. Starting an edit on another row silently
  /// abandons the current draft.
  SingleRow,
  /// Independent drafts keyed by document id.
  #[default]
  PerRow,
}

impl FromStr for EditPolicy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "single_row" | "single" => Ok(EditPolicy::SingleRow),
      "per_row" | "per-row" => Ok(EditPolicy::PerRow),
      other => Err(format!("unknown edit policy '{}'", other)),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowMode {
  Viewing,
  Editing,
}

#[derive(Debug, Clone)]
pub struct EditSession<E: Entity> {
  policy: EditPolicy,
  drafts: Vec<(DocumentId, E::Draft)>,
}

impl<E: Entity> EditSession<E> {
  pub fn new(policy: EditPolicy) -> Self {
    Self {
      policy,
      drafts: Vec::new(),
    }
  }

  pub fn policy(&self) -> EditPolicy {
    self.policy
  }

  /// Puts `record`'s row in edit mode with a fresh draft copied from the
  /// committed record. Re-entering an already-editing row resets its draft.
  pub fn begin(&mut self, record: &E) -> &E::Draft {
    self.install(record.id().clone(), record.draft())
  }

  /// Puts a draft back after a failed save. A newer edit always wins: the
  /// draft is dropped when the row was re-entered in the meantime, or, under
  /// `SingleRow`, when another row now holds the edit slot. Returns whether
  /// the draft was put back.
  pub fn restore(&mut self, id: DocumentId, draft: E::Draft) -> bool {
    let slot_taken = match self.policy {
      EditPolicy::SingleRow => !self.drafts.is_empty(),
      EditPolicy::PerRow => self.is_editing(&id),
    };
    if slot_taken {
      debug!(collection = E::COLLECTION, %id, "newer edit in progress; dropping the failed draft");
      return false;
    }
    self.install(id, draft);
    true
  }

  fn install(&mut self, id: DocumentId, draft: E::Draft) -> &E::Draft {
    if self.policy == EditPolicy::SingleRow {
      for (abandoned, _) in self.drafts.iter().filter(|(other, _)| *other != id) {
        debug!(collection = E::COLLECTION, id = %abandoned, "abandoning unsaved draft");
      }
      self.drafts.clear();
    } else {
      self.drafts.retain(|(other, _)| *other != id);
    }
    self.drafts.push((id, draft));
    let last = self.drafts.len() - 1;
    &self.drafts[last].1
  }

  pub fn mode(&self, id: &DocumentId) -> RowMode {
    if self.is_editing(id) {
      RowMode::Editing
    } else {
      RowMode::Viewing
    }
  }

  pub fn is_editing(&self, id: &DocumentId) -> bool {
    self.drafts.iter().any(|(other, _)| other == id)
  }

  pub fn editing(&self) -> Vec<DocumentId> {
    self.drafts.iter().map(|(id, _)| id.clone()).collect()
  }

  pub fn draft(&self, id: &DocumentId) -> Option<&E::Draft> {
    self.drafts.iter().find(|(other, _)| other == id).map(|(_, d)| d)
  }

  pub fn draft_mut(&mut self, id: &DocumentId) -> Option<&mut E::Draft> {
    self.drafts.iter_mut().find(|(other, _)| other == id).map(|(_, d)| d)
  }

  /// Replaces the draft of a row that is already in edit mode.
  pub fn set_draft(&mut self, id: &DocumentId, draft: E::Draft) -> TattvaResult<()> {
    let slot = self
      .draft_mut(id)
      .ok_or_else(|| TattvaError::NotEditing { id: id.clone() })?;
    *slot = draft;
    Ok(())
  }

  /// Leaves edit mode and throws the draft away.
  pub fn cancel(&mut self, id: &DocumentId) -> Option<E::Draft> {
    self.take(id)
  }

  /// Removes the draft so it can be committed.
  pub fn take(&mut self, id: &DocumentId) -> Option<E::Draft> {
    let idx = self.drafts.iter().position(|(other, _)| other == id)?;
    Some(self.drafts.remove(idx).1)
  }
}

impl<E: Entity> Default for EditSession<E> {
  fn default() -> Self {
    Self::new(EditPolicy::default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{Category, CategoryStatus};

  fn category(id: &str, name: &str) -> Category {
    Category {
      id: DocumentId::from(id),
      name: name.to_string(),
      description: String::new(),
      image_urls: Vec::new(),
      product_count: 0,
      status: CategoryStatus::Active,
      created_at: None,
    }
  }

  #[test]
  fn single_row_policy_abandons_the_previous_draft() {
    let (a, b) = (category("a", "Pottery"), category("b", "Textiles"));
    let mut session = EditSession::<Category>::new(EditPolicy::SingleRow);
    session.begin(&a);
    session.draft_mut(a.id()).unwrap().name = "Pottery & Clay".into();

    session.begin(&b);

    assert_eq!(session.mode(a.id()), RowMode::Viewing);
    assert!(session.draft(a.id()).is_none());
    assert_eq!(session.editing(), vec![b.id().clone()]);
  }

  #[test]
  fn per_row_policy_keeps_drafts_independent() {
    let (a, b) = (category("a", "Pottery"), category("b", "Textiles"));
    let mut session = EditSession::<Category>::new(EditPolicy::PerRow);
    session.begin(&a);
    session.draft_mut(a.id()).unwrap().name = "Pottery & Clay".into();
    session.begin(&b);

    assert_eq!(session.draft(a.id()).unwrap().name, "Pottery & Clay");
    assert_eq!(session.mode(b.id()), RowMode::Editing);
    assert_eq!(session.cancel(b.id()).unwrap().name, "Textiles");
    assert_eq!(session.mode(b.id()), RowMode::Viewing);
  }

  #[test]
  fn restore_never_overwrites_a_newer_edit() {
    let (a, b) = (category("a", "Pottery"), category("b", "Textiles"));
    let mut single = EditSession::<Category>::new(EditPolicy::SingleRow);
    single.begin(&a);
    let saved = single.take(a.id()).unwrap();
    single.begin(&b);
    single.draft_mut(b.id()).unwrap().name = "Handloom".into();

    assert!(!single.restore(a.id().clone(), saved));
    assert_eq!(single.editing(), vec![b.id().clone()]);
    assert_eq!(single.draft(b.id()).unwrap().name, "Handloom");

    let mut per_row = EditSession::<Category>::new(EditPolicy::PerRow);
    per_row.begin(&a);
    let saved = per_row.take(a.id()).unwrap();
    per_row.begin(&a);
    per_row.draft_mut(a.id()).unwrap().name = "Clay".into();
    assert!(!per_row.restore(a.id().clone(), saved.clone()));
    assert_eq!(per_row.draft(a.id()).unwrap().name, "Clay");

    per_row.cancel(a.id());
    assert!(per_row.restore(a.id().clone(), saved));
    assert_eq!(per_row.draft(a.id()).unwrap().name, "Pottery");
  }

  #[test]
  fn set_draft_requires_edit_mode() {
    let a = category("a", "Pottery");
    let mut session = EditSession::<Category>::default();
    let err = session.set_draft(a.id(), a.draft()).unwrap_err();
    assert!(matches!(err, TattvaError::NotEditing { .. }));
    assert_eq!("single_row".parse::<EditPolicy>().unwrap(), EditPolicy::SingleRow);
  }
}
