// artcraft_admin/src/web/handlers/catalog_handlers.rs

//! Handlers shared by `/products` and `/categories`, generic over the
//! catalog entity.

use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tattva::{CatalogEntity, Confirm, DocumentId, EntityWorkspace, MutationOutcome};
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

pub const CONFIRM_DELETE_HEADER: &str = "X-Confirm-Delete";

/// The operator's answer to "delete this record?", carried by the
/// `X-Confirm-Delete` header. Anything but `yes` declines.
#[derive(Debug, Clone, Copy)]
pub struct DeleteConfirmation {
  pub confirmed: bool,
}

impl FromRequest for DeleteConfirmation {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let confirmed = req
      .headers()
      .get(CONFIRM_DELETE_HEADER)
      .and_then(|v| v.to_str().ok())
      .map(|v| v.trim().eq_ignore_ascii_case("yes"))
      .unwrap_or(false);
    futures_util::future::ready(Ok(DeleteConfirmation { confirmed }))
  }
}

impl Confirm for DeleteConfirmation {
  fn confirm(&self, label: &str, id: &DocumentId) -> bool {
    if !self.confirmed {
      warn!(label, %id, "Delete requested without {} header.", CONFIRM_DELETE_HEADER);
    }
    self.confirmed
  }
}

fn workspace<E: CatalogEntity>(app_state: &AppState) -> &EntityWorkspace<E> {
  app_state.dashboard.workspace::<E>()
}

fn capitalised(label: &str) -> String {
  let mut chars = label.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

#[instrument(name = "handler::list_records", skip(app_state), fields(collection = E::COLLECTION))]
pub async fn list_handler<E>(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError>
where
  E: CatalogEntity + Serialize,
{
  let ws = workspace::<E>(&app_state);
  let records = ws.records();
  info!("Listing {} {} records.", records.len(), E::LABEL);
  Ok(HttpResponse::Ok().json(json!({
      "message": format!("{} list fetched successfully.", capitalised(E::LABEL)),
      "collection": E::COLLECTION,
      "source": ws.list().source(),
      "lastError": ws.list().last_error(),
      "editing": ws.editing(),
      "records": records,
  })))
}

#[instrument(name = "handler::refresh_records", skip(app_state), fields(collection = E::COLLECTION))]
pub async fn refresh_handler<E>(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError>
where
  E: CatalogEntity + Serialize,
{
  let ws = workspace::<E>(&app_state);
  let count = ws.refresh().await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": format!("Fetched {} {} records.", count, E::LABEL),
      "collection": E::COLLECTION,
      "records": ws.records(),
  })))
}

/// Create-form submission. The create form closes once the store has
/// acknowledged the record.
#[instrument(name = "handler::create_record", skip(app_state, payload), fields(collection = E::COLLECTION))]
pub async fn create_handler<E>(
  app_state: web::Data<AppState>,
  payload: web::Json<E::New>,
) -> Result<HttpResponse, AppError>
where
  E: CatalogEntity + Serialize,
  E::New: DeserializeOwned,
{
  let outcome = app_state.dashboard.submit::<E>(payload.into_inner()).await?;
  let MutationOutcome::Created(id) = outcome else {
    return Err(AppError::Declined);
  };
  let record = workspace::<E>(&app_state).list().get(&id);
  info!(%id, "{} created.", capitalised(E::LABEL));
  Ok(HttpResponse::Created().json(json!({
      "message": format!("{} added successfully!", capitalised(E::LABEL)),
      "id": id,
      "record": record,
  })))
}

#[instrument(name = "handler::begin_edit", skip(app_state, path), fields(collection = E::COLLECTION, id = %path.as_ref()))]
pub async fn begin_edit_handler<E>(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError>
where
  E: CatalogEntity,
  E::Draft: Serialize,
{
  let id = DocumentId::new(path.into_inner());
  let ws = workspace::<E>(&app_state);
  let draft = ws.begin_edit(&id)?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Row is in edit mode.",
      "id": id,
      "mode": ws.mode(&id),
      "editing": ws.editing(),
      "draft": draft,
  })))
}

/// Replaces the draft's fields. The draft is validated for the response but
/// only rejected on save.
#[instrument(name = "handler::update_draft", skip(app_state, path, payload), fields(collection = E::COLLECTION, id = %path.as_ref()))]
pub async fn update_draft_handler<E>(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<E::Draft>,
) -> Result<HttpResponse, AppError>
where
  E: CatalogEntity,
  E::Draft: Serialize + DeserializeOwned,
{
  let id = DocumentId::new(path.into_inner());
  let ws = workspace::<E>(&app_state);
  ws.edit_draft(&id, payload.into_inner())?;
  let problem = ws.check_draft(&id).err().map(|e| e.to_string());
  Ok(HttpResponse::Ok().json(json!({
      "message": "Draft updated.",
      "id": id,
      "draft": ws.draft(&id),
      "valid": problem.is_none(),
      "problem": problem,
  })))
}

#[instrument(name = "handler::save_edit", skip(app_state, path), fields(collection = E::COLLECTION, id = %path.as_ref()))]
pub async fn save_edit_handler<E>(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError>
where
  E: CatalogEntity + Serialize,
{
  let id = DocumentId::new(path.into_inner());
  let ws = workspace::<E>(&app_state);
  match ws.save_edit(&id).await? {
    MutationOutcome::Declined => Err(AppError::Declined),
    outcome => Ok(HttpResponse::Ok().json(json!({
        "message": format!("{} updated successfully!", capitalised(E::LABEL)),
        "outcome": outcome,
        "record": ws.list().get(&id),
    }))),
  }
}

#[instrument(name = "handler::cancel_edit", skip(app_state, path), fields(collection = E::COLLECTION, id = %path.as_ref()))]
pub async fn cancel_edit_handler<E>(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError>
where
  E: CatalogEntity,
{
  let id = DocumentId::new(path.into_inner());
  let cancelled = workspace::<E>(&app_state).cancel_edit(&id);
  Ok(HttpResponse::Ok().json(json!({
      "message": if cancelled { "Edit discarded." } else { "Row was not being edited." },
      "id": id,
      "cancelled": cancelled,
  })))
}

#[instrument(name = "handler::delete_record", skip(app_state, path, confirmation), fields(collection = E::COLLECTION, id = %path.as_ref()))]
pub async fn delete_handler<E>(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  confirmation: DeleteConfirmation,
) -> Result<HttpResponse, AppError>
where
  E: CatalogEntity,
{
  let id = DocumentId::new(path.into_inner());
  match workspace::<E>(&app_state).delete(&id, confirmation).await? {
    MutationOutcome::Declined => Err(AppError::Declined),
    outcome => Ok(HttpResponse::Ok().json(json!({
        "message": format!("{} deleted successfully!", capitalised(E::LABEL)),
        "outcome": outcome,
    }))),
  }
}
