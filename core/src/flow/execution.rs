// tattva/src/flow/execution.rs

//! `Flow::run()`: executes the steps and their handlers in order.

use crate::core::control::{FlowControl, FlowOutcome};
use crate::core::handler::Handler;
use crate::core::shared::SharedState;
use crate::error::TattvaError;
use crate::flow::definition::Flow;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<TattvaError> + Send + Sync + 'static,
{
  /// Runs every step against `state`.
  ///
  /// Per step: the skip condition is checked, then `before`, `on` and `after`
  /// handlers run in registration order. A handler returning
  /// `FlowControl::Halt` ends the run with `FlowOutcome::Halted`; a handler
  /// error ends it with that error. A required step with no handlers at all
  /// fails with `TattvaError::HandlerMissing`.
  #[instrument(
    name = "Flow::run",
    skip_all,
    fields(flow = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, state: SharedState<TData>) -> Result<FlowOutcome, Err> {
    event!(Level::DEBUG, "Flow execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = span!(Level::DEBUG, "flow_step", step_name, step_index = step_idx);

      if step_def.should_skip(&state) {
        event!(parent: &step_span, Level::DEBUG, "Step skipped by its skip condition.");
        continue;
      }

      let phases: [(&str, Option<&Vec<Handler<TData, Err>>>); 3] = [
        ("before", self.before.get(step_name)),
        ("on", self.on.get(step_name)),
        ("after", self.after.get(step_name)),
      ];

      if phases.iter().all(|(_, hs)| hs.map_or(true, |v| v.is_empty())) {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Required step has no handlers.");
        return Err(Err::from(TattvaError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      for (phase, handlers) in phases {
        let Some(handlers) = handlers else { continue };
        for handler_fn in handlers {
          let control = handler_fn(state.clone())
            .instrument(span!(parent: &step_span, Level::TRACE, "handler", phase))
            .await;
          match control {
            Ok(FlowControl::Proceed) => {}
            Ok(FlowControl::Halt) => {
              event!(parent: &step_span, Level::INFO, phase, "Flow halted by a handler.");
              return Ok(FlowOutcome::Halted);
            }
            Err(e) => {
              event!(parent: &step_span, Level::WARN, phase, error = %e, "Handler failed.");
              return Err(e);
            }
          }
        }
      }
    }

    event!(Level::DEBUG, "Flow execution completed.");
    Ok(FlowOutcome::Completed)
  }
}
