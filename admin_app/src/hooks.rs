// artcraft_admin/src/hooks.rs

//! Application handlers attached to the dashboard's mutation flows.

use tattva::dispatch::{CreateCtx, DeleteCtx, UpdateCtx, STEP_WRITE};
use tattva::{CatalogEntity, EntityWorkspace, FlowControl, SharedState, TattvaError, TattvaResult};
use tracing::info;

/// Logs every acknowledged write as an audit line.
pub fn attach_audit_hooks<E: CatalogEntity>(workspace: &mut EntityWorkspace<E>) -> TattvaResult<()> {
  let dispatcher = workspace.dispatcher_mut();

  dispatcher.create_flow_mut().after(STEP_WRITE, |ctx: SharedState<CreateCtx<E>>| async move {
    let id = ctx.read().id.clone();
    if let Some(id) = id {
      info!(target: "audit", collection = E::COLLECTION, %id, "record created");
    }
    Ok::<_, TattvaError>(FlowControl::Proceed)
  })?;

  dispatcher.update_flow_mut().after(STEP_WRITE, |ctx: SharedState<UpdateCtx<E>>| async move {
    let id = ctx.read().id.clone();
    info!(target: "audit", collection = E::COLLECTION, %id, "record updated");
    Ok::<_, TattvaError>(FlowControl::Proceed)
  })?;

  dispatcher.delete_flow_mut().after(STEP_WRITE, |ctx: SharedState<DeleteCtx<E>>| async move {
    let id = ctx.read().id.clone();
    info!(target: "audit", collection = E::COLLECTION, %id, "record deleted");
    Ok::<_, TattvaError>(FlowControl::Proceed)
  })?;

  Ok(())
}
