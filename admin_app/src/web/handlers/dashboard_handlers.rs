// artcraft_admin/src/web/handlers/dashboard_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tattva::{FormKind, Shell, View};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

fn shell_body(message: &str, shell: &Shell) -> serde_json::Value {
  let view = shell.active();
  json!({
      "message": message,
      "view": view,
      "label": view.label(),
      "implemented": view.is_implemented(),
      "panels": shell.panels(),
      "openForms": shell.open_forms(),
  })
}

#[instrument(name = "handler::dashboard_overview", skip(app_state))]
pub async fn overview_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let dashboard = &app_state.dashboard;
  let stats = dashboard.stats();
  let mut body = shell_body("Dashboard fetched successfully.", &dashboard.shell());
  body["stats"] = json!(stats);
  body["cards"] = json!(stats.cards());
  body["syncStrategy"] = json!(app_state.config.sync_strategy);
  body["editPolicy"] = json!(app_state.config.edit_policy);
  Ok(HttpResponse::Ok().json(body))
}

#[instrument(name = "handler::select_view", skip(app_state, path), fields(view = %path.as_ref()))]
pub async fn select_view_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let view: View = path.parse().map_err(AppError::Validation)?;
  let shell = app_state.dashboard.with_shell(|s| {
    s.select(view);
    s.clone()
  });
  info!(view = view.id(), "View selected.");
  Ok(HttpResponse::Ok().json(shell_body("View selected.", &shell)))
}

#[instrument(name = "handler::open_form", skip(app_state, path), fields(form = %path.as_ref()))]
pub async fn open_form_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let form: FormKind = path.parse().map_err(AppError::Validation)?;
  let shell = app_state.dashboard.with_shell(|s| {
    s.open_form(form);
    s.clone()
  });
  Ok(HttpResponse::Ok().json(shell_body("Form opened.", &shell)))
}

#[instrument(name = "handler::close_form", skip(app_state, path), fields(form = %path.as_ref()))]
pub async fn close_form_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let form: FormKind = path.parse().map_err(AppError::Validation)?;
  let shell = app_state.dashboard.with_shell(|s| {
    s.close_form(form);
    s.clone()
  });
  Ok(HttpResponse::Ok().json(shell_body("Form closed.", &shell)))
}
