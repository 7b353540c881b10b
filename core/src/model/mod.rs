// tattva/src/model/mod.rs

//! Catalog entities and the `Entity` contract the list, edit and dispatch
//! layers are generic over.

pub mod category;
pub mod entity;
pub mod order;
pub mod product;

pub use category::{Category, CategoryDraft, CategoryStatus, NewCategory};
pub use entity::{Draft, Entity, NewRecord};
pub use order::{Address, LineItem, Order, OrderStatus, PaymentStatus};
pub use product::{NewProduct, Product, ProductDraft, ProductStatus, SUGGESTED_PRODUCT_CATEGORIES};

use crate::error::ValidationError;

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    Err(ValidationError::MissingField { field })
  } else {
    Ok(())
  }
}

/// Parses a price typed into a form: finite and not negative.
pub fn parse_price(input: &str) -> Result<f64, ValidationError> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(ValidationError::MissingField { field: "price" });
  }
  let value: f64 = trimmed.parse().map_err(|_| ValidationError::InvalidPrice {
    input: input.to_string(),
  })?;
  if !value.is_finite() {
    return Err(ValidationError::InvalidPrice {
      input: input.to_string(),
    });
  }
  if value < 0.0 {
    return Err(ValidationError::NegativePrice {
      input: input.to_string(),
    });
  }
  Ok(value)
}

/// Drops blank rows from an image URL list, keeping order.
pub(crate) fn non_blank_urls(urls: &[String]) -> Vec<String> {
  urls
    .iter()
    .map(|u| u.trim())
    .filter(|u| !u.is_empty())
    .map(str::to_string)
    .collect()
}
