// artcraft_admin/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tattva::OrderStatus;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListOrdersQuery {
  /// `all` or absent for every order.
  pub status: Option<String>,
}

#[instrument(name = "handler::list_orders", skip(app_state))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListOrdersQuery>,
) -> Result<HttpResponse, AppError> {
  let status = match query.status.as_deref().map(str::trim) {
    None | Some("") | Some("all") => None,
    Some(s) => Some(s.parse::<OrderStatus>().map_err(AppError::Validation)?),
  };
  let orders = app_state.dashboard.orders(status);
  info!(count = orders.len(), "Orders fetched.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Orders fetched successfully.",
      "status": status,
      "orders": orders,
  })))
}
