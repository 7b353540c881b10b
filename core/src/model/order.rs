// tattva/src/model/order.rs

//! Orders are not persisted: the dashboard shows a fixed demo set.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
  Pending,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "Pending",
      OrderStatus::Processing => "Processing",
      OrderStatus::Shipped => "Shipped",
      OrderStatus::Delivered => "Delivered",
      OrderStatus::Cancelled => "Cancelled",
    }
  }
}

impl FromStr for OrderStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| format!("unknown order status '{}'", s))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
  Pending,
  Paid,
  Failed,
  Refunded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
  pub product_id: String,
  /// Name at the time of ordering.
  pub product_name: String,
  pub quantity: u32,
  pub price: f64,
  pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
  pub street: String,
  pub city: String,
  pub state: String,
  pub zip_code: String,
  pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: String,
  pub order_number: String,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_phone: String,
  pub items: Vec<LineItem>,
  /// As recorded; not checked against `items`.
  pub total_amount: f64,
  pub status: OrderStatus,
  pub shipping_address: Address,
  pub payment_method: String,
  pub payment_status: PaymentStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  /// Sum of quantity × unit price. May differ from `total_amount`.
  pub fn line_items_total(&self) -> f64 {
    self.items.iter().map(|i| f64::from(i.quantity) * i.price).sum()
  }

  pub fn item_count(&self) -> u32 {
    self.items.iter().map(|i| i.quantity).sum()
  }
}

/// Orders matching `status`; `None` is "All Status".
pub fn filter_by_status(orders: &[Order], status: Option<OrderStatus>) -> Vec<Order> {
  orders
    .iter()
    .filter(|o| status.map_or(true, |s| o.status == s))
    .cloned()
    .collect()
}

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
  NaiveDate::from_ymd_opt(y, m, d)
    .and_then(|date| date.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
    .unwrap_or_default()
}

fn item(product_id: &str, product_name: &str, quantity: u32, price: f64) -> LineItem {
  LineItem {
    product_id: product_id.to_string(),
    product_name: product_name.to_string(),
    quantity,
    price,
    image_url: Some("/dummy.jpg".to_string()),
  }
}

fn address(street: &str, city: &str, state: &str, zip_code: &str) -> Address {
  Address {
    street: street.to_string(),
    city: city.to_string(),
    state: state.to_string(),
    zip_code: zip_code.to_string(),
    country: "USA".to_string(),
  }
}

#[allow(clippy::too_many_arguments)]
fn order(
  n: u32,
  customer: (&str, &str, &str),
  items: Vec<LineItem>,
  total_amount: f64,
  status: OrderStatus,
  shipping_address: Address,
  payment: (&str, PaymentStatus),
  dates: (DateTime<Utc>, DateTime<Utc>),
) -> Order {
  Order {
    id: n.to_string(),
    order_number: format!("ORD-{:03}", n),
    customer_name: customer.0.to_string(),
    customer_email: customer.1.to_string(),
    customer_phone: customer.2.to_string(),
    items,
    total_amount,
    status,
    shipping_address,
    payment_method: payment.0.to_string(),
    payment_status: payment.1,
    created_at: dates.0,
    updated_at: dates.1,
  }
}

/// The fixed demo orders shown on the Orders tab.
pub fn demo_orders() -> Vec<Order> {
  vec![
    order(
      1,
      ("John Smith", "john.smith@email.com", "+1-555-0123"),
      vec![
        item("prod-1", "Tribal Art Painting", 1, 150.0),
        item("prod-2", "Wooden Sculpture", 2, 75.0),
      ],
      300.0,
      OrderStatus::Processing,
      address("123 Main St", "New York", "NY", "10001"),
      ("Credit Card", PaymentStatus::Paid),
      (day(2024, 1, 15), day(2024, 1, 15)),
    ),
    order(
      2,
      ("Sarah Johnson", "sarah.j@email.com", "+1-555-0456"),
      vec![item("prod-3", "Handwoven Rug", 1, 200.0)],
      200.0,
      OrderStatus::Shipped,
      address("456 Oak Ave", "Los Angeles", "CA", "90210"),
      ("PayPal", PaymentStatus::Paid),
      (day(2024, 1, 14), day(2024, 1, 16)),
    ),
    order(
      3,
      ("Mike Wilson", "mike.wilson@email.com", "+1-555-0789"),
      vec![
        item("prod-4", "Ceramic Pottery", 3, 45.0),
        item("prod-5", "Beaded Necklace", 1, 30.0),
      ],
      165.0,
      OrderStatus::Delivered,
      address("789 Pine St", "Chicago", "IL", "60601"),
      ("Bank Transfer", PaymentStatus::Paid),
      (day(2024, 1, 10), day(2024, 1, 18)),
    ),
    order(
      4,
      ("Emily Davis", "emily.davis@email.com", "+1-555-0321"),
      vec![item("prod-6", "Traditional Mask", 1, 120.0)],
      120.0,
      OrderStatus::Pending,
      address("321 Elm St", "Miami", "FL", "33101"),
      ("Credit Card", PaymentStatus::Pending),
      (day(2024, 1, 20), day(2024, 1, 20)),
    ),
    order(
      5,
      ("David Brown", "david.brown@email.com", "+1-555-0654"),
      vec![
        item("prod-7", "Bamboo Basket", 2, 35.0),
        item("prod-8", "Stone Carving", 1, 85.0),
        item("prod-9", "Textile Wall Hanging", 1, 95.0),
      ],
      250.0,
      OrderStatus::Cancelled,
      address("654 Maple Dr", "Seattle", "WA", "98101"),
      ("Credit Card", PaymentStatus::Refunded),
      (day(2024, 1, 12), day(2024, 1, 17)),
    ),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn demo_set_has_five_numbered_orders() {
    let orders = demo_orders();
    let numbers: Vec<_> = orders.iter().map(|o| o.order_number.as_str()).collect();
    assert_eq!(numbers, vec!["ORD-001", "ORD-002", "ORD-003", "ORD-004", "ORD-005"]);
    assert!(orders.iter().all(|o| o.items.iter().all(|i| i.quantity >= 1)));
  }

  #[test]
  fn recorded_total_is_not_reconciled_with_line_items() {
    let orders = demo_orders();
    assert_eq!(orders[0].line_items_total(), 300.0);
    // Nothing enforces total == sum of items.
    let mut odd = orders[1].clone();
    odd.total_amount = 1.0;
    assert_ne!(odd.total_amount, odd.line_items_total());
  }

  #[test]
  fn status_filter_and_parsing() {
    let orders = demo_orders();
    assert_eq!(filter_by_status(&orders, None).len(), 5);
    let shipped = filter_by_status(&orders, Some("shipped".parse().unwrap()));
    assert_eq!(shipped.len(), 1);
    assert_eq!(shipped[0].customer_name, "Sarah Johnson");
    assert!("lost".parse::<OrderStatus>().is_err());
    assert_eq!(demo_orders()[0].created_at.to_rfc3339(), "2024-01-15T00:00:00+00:00");
  }
}
