// tests/race_tests.rs
mod common;
use common::*;
use serial_test::serial;
use std::sync::Arc;
use tattva::{EditPolicy, MutationOutcome, SyncStrategy};

/// Two saves overlap; their re-fetches resolve in the opposite order from the
/// one they were issued in. The list shows whatever resolved last, even when
/// that is the older snapshot.
#[tokio::test]
#[serial]
async fn overlapping_updates_show_the_last_resolved_refetch() {
  setup_tracing();
  let inner = memory_store();
  let gated = Arc::new(GatedStore::new(inner.clone()));
  let (ws, _notes) = category_workspace(gated.clone(), EditPolicy::PerRow, SyncStrategy::Refetch);
  ws.create(new_category("Pottery")).await.unwrap();
  ws.create(new_category("Textiles")).await.unwrap();
  let ws = Arc::new(ws);
  let (a, b) = (ws.records()[0].id.clone(), ws.records()[1].id.clone());
  ws.begin_edit(&a).unwrap();
  ws.update_draft(&a, |d| d.name = "Pottery & Clay".into()).unwrap();
  ws.begin_edit(&b).unwrap();
  ws.update_draft(&b, |d| d.name = "Handloom Textiles".into()).unwrap();

  let mut gates = gated.hold_next_reads(2).into_iter();
  let (first_gate, second_gate) = (gates.next().unwrap(), gates.next().unwrap());

  // Save A: its re-fetch sees only A's change and parks.
  let save_a = tokio::spawn({
    let (ws, a) = (ws.clone(), a.clone());
    async move { ws.save_edit(&a).await }
  });
  gated.wait_until_parked(1).await;

  // Save B: its re-fetch sees both changes and parks.
  let save_b = tokio::spawn({
    let (ws, b) = (ws.clone(), b.clone());
    async move { ws.save_edit(&b).await }
  });
  gated.wait_until_parked(2).await;

  // B's re-fetch resolves first, then A's older snapshot lands on top.
  second_gate.send(()).unwrap();
  assert_eq!(save_b.await.unwrap().unwrap(), MutationOutcome::Updated(b.clone()));
  let after_b: Vec<String> = ws.records().into_iter().map(|c| c.name).collect();
  assert_eq!(after_b, vec!["Pottery & Clay", "Handloom Textiles"]);

  first_gate.send(()).unwrap();
  assert_eq!(save_a.await.unwrap().unwrap(), MutationOutcome::Updated(a.clone()));
  let shown: Vec<String> = ws.records().into_iter().map(|c| c.name).collect();
  assert_eq!(shown, vec!["Pottery & Clay", "Textiles"]);

  // The store itself holds both writes; the next fetch catches up.
  ws.refresh().await.unwrap();
  let fresh: Vec<String> = ws.records().into_iter().map(|c| c.name).collect();
  assert_eq!(fresh, vec!["Pottery & Clay", "Handloom Textiles"]);
}

/// Two saves of the same product overlap. The newer save's re-fetch resolves
/// first, so the older snapshot is what stays on screen.
#[tokio::test]
#[serial]
async fn overlapping_saves_of_one_product_show_the_last_resolved_refetch() {
  setup_tracing();
  let inner = memory_store();
  let gated = Arc::new(GatedStore::new(inner.clone()));
  let (ws, _notes) = product_workspace(gated.clone(), EditPolicy::PerRow, SyncStrategy::Refetch);
  ws.create(pink_floral_dress()).await.unwrap();
  let ws = Arc::new(ws);
  let id = ws.records()[0].id.clone();

  let mut gates = gated.hold_next_reads(2).into_iter();
  let (first_gate, second_gate) = (gates.next().unwrap(), gates.next().unwrap());

  ws.begin_edit(&id).unwrap();
  ws.update_draft(&id, |d| d.price = "39.99".into()).unwrap();
  let first_save = tokio::spawn({
    let (ws, id) = (ws.clone(), id.clone());
    async move { ws.save_edit(&id).await }
  });
  gated.wait_until_parked(1).await;

  // Edited again before the first re-fetch has come back.
  ws.begin_edit(&id).unwrap();
  ws.update_draft(&id, |d| d.price = "29.99".into()).unwrap();
  let second_save = tokio::spawn({
    let (ws, id) = (ws.clone(), id.clone());
    async move { ws.save_edit(&id).await }
  });
  gated.wait_until_parked(2).await;

  second_gate.send(()).unwrap();
  assert_eq!(second_save.await.unwrap().unwrap(), MutationOutcome::Updated(id.clone()));
  assert_eq!(ws.records()[0].price, 29.99);

  first_gate.send(()).unwrap();
  assert_eq!(first_save.await.unwrap().unwrap(), MutationOutcome::Updated(id.clone()));
  assert_eq!(ws.records()[0].price, 39.99);

  ws.refresh().await.unwrap();
  assert_eq!(ws.records()[0].price, 29.99);
}
