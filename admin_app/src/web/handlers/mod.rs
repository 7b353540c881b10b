// artcraft_admin/src/web/handlers/mod.rs

pub mod catalog_handlers;
pub mod dashboard_handlers;
pub mod notification_handlers;
pub mod order_handlers;
