// tattva/src/core/handler.rs

use crate::core::control::FlowControl;
use crate::core::shared::SharedState;
use std::future::Future;
use std::pin::Pin;

/// A step handler: takes a handle to the flow's shared data and resolves to
/// a `FlowControl` or the flow's error type.
///
/// Handlers lock the `SharedState` to read or write it and must drop every
/// guard before their first `.await`.
pub type Handler<TData, Err> = Box<
  dyn Fn(SharedState<TData>) -> Pin<Box<dyn Future<Output = Result<FlowControl, Err>> + Send>>
    + Send
    + Sync,
>;
