// artcraft_admin/src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tattva::{CatalogEntity, Category, Product};

use crate::web::handlers::{catalog_handlers, dashboard_handlers, notification_handlers, order_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// List, create, edit and delete routes for one collection.
fn catalog_scope<E>(path: &str) -> actix_web::Scope
where
  E: CatalogEntity + Serialize,
  E::Draft: Serialize + DeserializeOwned,
  E::New: DeserializeOwned,
{
  web::scope(path)
    .route("", web::get().to(catalog_handlers::list_handler::<E>))
    .route("", web::post().to(catalog_handlers::create_handler::<E>))
    .route("/refresh", web::post().to(catalog_handlers::refresh_handler::<E>))
    .route("/{id}", web::delete().to(catalog_handlers::delete_handler::<E>))
    .route("/{id}/edit", web::post().to(catalog_handlers::begin_edit_handler::<E>))
    .route("/{id}/draft", web::put().to(catalog_handlers::update_draft_handler::<E>))
    .route("/{id}/save", web::post().to(catalog_handlers::save_edit_handler::<E>))
    .route("/{id}/cancel", web::post().to(catalog_handlers::cancel_edit_handler::<E>))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/dashboard")
          .route("", web::get().to(dashboard_handlers::overview_handler))
          .route("/view/{view}", web::put().to(dashboard_handlers::select_view_handler))
          .route("/forms/{kind}/open", web::post().to(dashboard_handlers::open_form_handler))
          .route("/forms/{kind}/close", web::post().to(dashboard_handlers::close_form_handler)),
      )
      .service(catalog_scope::<Product>("/products"))
      .service(catalog_scope::<Category>("/categories"))
      .route("/orders", web::get().to(order_handlers::list_orders_handler))
      .route("/notifications", web::get().to(notification_handlers::drain_notifications_handler)),
  );
}
