// tests/flow_tests.rs
mod common;
use common::*;
use serial_test::serial;
use tattva::{Flow, FlowControl, FlowOutcome, SharedState, StepDef, TattvaError};

#[derive(Debug, Default)]
struct Steps {
  seen: Vec<String>,
  halt_at: Option<&'static str>,
}

fn record(label: &'static str) -> impl Fn(SharedState<Steps>) -> std::future::Ready<Result<FlowControl, TattvaError>> {
  move |state: SharedState<Steps>| {
    let control = state.update(|s| {
      s.seen.push(label.to_string());
      if s.halt_at == Some(label) {
        FlowControl::Halt
      } else {
        FlowControl::Proceed
      }
    });
    std::future::ready(Ok(control))
  }
}

#[tokio::test]
#[serial]
async fn inserted_steps_run_in_place_and_halt_stops_the_rest() {
  setup_tracing();
  let mut flow = Flow::<Steps, TattvaError>::new("demo", vec![StepDef::required("a"), StepDef::required("c")]);
  flow.on("a", record("a")).unwrap();
  flow.on("c", record("c")).unwrap();
  flow.insert_after_step("a", StepDef::required("b")).unwrap();
  flow.on("b", record("b")).unwrap();
  assert_eq!(flow.step_names(), vec!["a", "b", "c"]);

  let state = SharedState::new(Steps::default());
  assert_eq!(flow.run(state.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(state.read().seen, vec!["a", "b", "c"]);

  let halted = SharedState::new(Steps {
    halt_at: Some("b"),
    ..Default::default()
  });
  assert_eq!(flow.run(halted.clone()).await.unwrap(), FlowOutcome::Halted);
  assert_eq!(halted.read().seen, vec!["a", "b"]);
}

#[tokio::test]
#[serial]
async fn required_step_without_handlers_fails_the_run() {
  setup_tracing();
  let mut flow = Flow::<Steps, TattvaError>::new("demo", vec![StepDef::required("a"), StepDef::optional("maybe")]);
  flow.on("a", record("a")).unwrap();
  assert!(flow.run(SharedState::new(Steps::default())).await.is_ok());

  flow.insert_after_step("maybe", StepDef::required("must")).unwrap();
  let err = flow.run(SharedState::new(Steps::default())).await.unwrap_err();
  assert!(matches!(err, TattvaError::HandlerMissing { ref step_name } if step_name == "must"));

  flow.remove_step("must");
  assert!(!flow.has_step("must"));
  assert!(flow.insert_after_step("a", StepDef::required("a")).is_err());
}

#[tokio::test]
#[serial]
async fn handler_errors_propagate_and_skip_conditions_can_be_replaced() {
  setup_tracing();
  let mut flow = Flow::<Steps, TattvaError>::new("demo", vec![StepDef::required("a"), StepDef::required("boom")]);
  flow.on("a", record("a")).unwrap();
  flow
    .on("boom", |_state: SharedState<Steps>| async move {
      Err::<FlowControl, _>(anyhow::anyhow!("exploded"))
    })
    .unwrap();

  let err = flow.run(SharedState::new(Steps::default())).await.unwrap_err();
  assert!(matches!(err, TattvaError::HandlerError { .. }));
  assert!(err.to_string().contains("exploded"));

  flow
    .set_skip_condition("boom", Some(std::sync::Arc::new(|s: &Steps| s.seen.contains(&"a".to_string()))))
    .unwrap();
  assert_eq!(
    flow.run(SharedState::new(Steps::default())).await.unwrap(),
    FlowOutcome::Completed
  );
}
