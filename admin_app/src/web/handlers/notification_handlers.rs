// artcraft_admin/src/web/handlers/notification_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;

/// Returns the pending notifications and clears them.
#[instrument(name = "handler::drain_notifications", skip(app_state))]
pub async fn drain_notifications_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let notifications = app_state.dashboard.drain_notifications();
  Ok(HttpResponse::Ok().json(json!({ "notifications": notifications })))
}
