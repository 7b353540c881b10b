// tattva/src/flow/definition.rs

//! The `Flow<TData, Err>` struct and its structural operations.

use crate::core::handler::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::{TattvaError, TattvaResult};
use std::collections::HashMap;

/// An ordered list of named steps, each with `before`, `on` and `after`
/// handlers, run against one `SharedState<TData>`.
///
/// `Err` is the error type handlers return. It must be constructible from
/// `TattvaError` so wiring problems (a required step with no handler) can be
/// reported through it.
pub struct Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<TattvaError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<TattvaError> + Send + Sync + 'static,
{
  pub fn new(name: impl Into<String>, steps: Vec<StepDef<TData>>) -> Self {
    Self {
      name: name.into(),
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn has_step(&self, step_name: &str) -> bool {
    self.steps.iter().any(|s| s.name == step_name)
  }

  pub(crate) fn ensure_step_exists(&self, step_name: &str) -> TattvaResult<()> {
    if self.has_step(step_name) {
      Ok(())
    } else {
      Err(TattvaError::StepNotFound {
        step_name: format!("{}::{}", self.name, step_name),
      })
    }
  }

  /// Inserts a new step directly after `existing_step_name`.
  pub fn insert_after_step(&mut self, existing_step_name: &str, step: StepDef<TData>) -> TattvaResult<()> {
    let idx = self
      .steps
      .iter()
      .position(|s| s.name == existing_step_name)
      .ok_or_else(|| TattvaError::StepNotFound {
        step_name: format!("{}::{}", self.name, existing_step_name),
      })?;
    if self.has_step(&step.name) {
      return Err(TattvaError::Internal(format!(
        "step '{}' already exists in flow '{}'",
        step.name, self.name
      )));
    }
    self.steps.insert(idx + 1, step);
    Ok(())
  }

  /// Removes a step and every handler attached to it. Unknown names are a no-op.
  pub fn remove_step(&mut self, step_name: &str) {
    self.steps.retain(|s| s.name != step_name);
    self.before.remove(step_name);
    self.on.remove(step_name);
    self.after.remove(step_name);
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) -> TattvaResult<()> {
    self.ensure_step_exists(step_name)?;
    if let Some(step) = self.steps.iter_mut().find(|s| s.name == step_name) {
      step.skip_if = skip_if;
    }
    Ok(())
  }
}

impl<TData, Err> std::fmt::Debug for Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<TattvaError> + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Flow")
      .field("name", &self.name)
      .field("steps", &self.steps)
      .finish_non_exhaustive()
  }
}
