// tattva/src/core/control.rs

//! Signals for controlling flow execution and the outcome of a flow run.

/// Returned by a step handler to say whether the flow should go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
  /// Run the remaining handlers of this step and the steps after it.
  Proceed,
  /// Halt the flow immediately. Nothing after this handler runs.
  Halt,
}

/// Outcome of a full flow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every non-skipped step ran to completion.
  Completed,
  /// A handler returned `FlowControl::Halt`.
  Halted,
}
