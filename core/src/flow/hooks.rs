// tattva/src/flow/hooks.rs

//! Registration of `before`, `on` and `after` handlers.

use crate::core::control::FlowControl;
use crate::core::handler::Handler;
use crate::core::shared::SharedState;
use crate::error::{TattvaError, TattvaResult};
use crate::flow::definition::Flow;
use std::collections::HashMap;
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
  Before,
  On,
  After,
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<TattvaError> + Send + Sync + 'static,
{
  /// Registers a handler that runs before the step's `on` handlers.
  ///
  /// The handler's own error type only has to convert into the flow's `Err`.
  pub fn before<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(SharedState<TData>) -> F + Send + Sync + 'static,
  ) -> TattvaResult<()>
  where
    F: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(Phase::Before, step_name, handler_fn)
  }

  /// Registers a main handler for the step.
  pub fn on<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(SharedState<TData>) -> F + Send + Sync + 'static,
  ) -> TattvaResult<()>
  where
    F: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(Phase::On, step_name, handler_fn)
  }

  /// Registers a handler that runs after the step's `on` handlers.
  pub fn after<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(SharedState<TData>) -> F + Send + Sync + 'static,
  ) -> TattvaResult<()>
  where
    F: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(Phase::After, step_name, handler_fn)
  }

  fn register<F, HandlerErr>(
    &mut self,
    phase: Phase,
    step_name: &str,
    handler_fn: impl Fn(SharedState<TData>) -> F + Send + Sync + 'static,
  ) -> TattvaResult<()>
  where
    F: Future<Output = Result<FlowControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name)?;
    let boxed: Handler<TData, Err> = Box::new(move |state| {
      let fut = handler_fn(state);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    let table: &mut HashMap<String, Vec<Handler<TData, Err>>> = match phase {
      Phase::Before => &mut self.before,
      Phase::On => &mut self.on,
      Phase::After => &mut self.after,
    };
    table.entry(step_name.to_string()).or_default().push(boxed);
    tracing::trace!(flow = %self.name, step = step_name, ?phase, "handler registered");
    Ok(())
  }
}
