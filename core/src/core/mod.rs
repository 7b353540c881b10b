pub mod control;
pub mod handler;
pub mod shared;
pub mod step;

pub use control::{FlowControl, FlowOutcome};
pub use handler::Handler;
pub use shared::SharedState;
pub use step::StepDef;
