// tattva/src/stats.rs

//! Headline numbers for the dashboard tab.

use crate::model::{Category, Order, PaymentStatus, Product};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
  Up,
  Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
  pub title: String,
  pub value: String,
  /// Percentage change against the previous period, when known.
  pub change: Option<f64>,
}

impl StatCard {
  pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      value: value.into(),
      change: None,
    }
  }

  pub fn with_change(mut self, change: f64) -> Self {
    self.change = Some(change);
    self
  }

  pub fn trend(&self) -> Option<Trend> {
    self.change.map(|c| if c >= 0.0 { Trend::Up } else { Trend::Down })
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  /// Sum of order totals whose payment went through.
  pub revenue: f64,
  pub orders: usize,
  pub customers: usize,
  pub products: usize,
  pub categories: usize,
}

impl DashboardStats {
  pub fn compute(products: &[Product], categories: &[Category], orders: &[Order]) -> Self {
    let revenue = orders
      .iter()
      .filter(|o| o.payment_status == PaymentStatus::Paid)
      .map(|o| o.total_amount)
      .sum();
    let customers = orders
      .iter()
      .map(|o| o.customer_email.trim().to_ascii_lowercase())
      .collect::<HashSet<_>>()
      .len();
    Self {
      revenue,
      orders: orders.len(),
      customers,
      products: products.len(),
      categories: categories.len(),
    }
  }

  pub fn cards(&self) -> Vec<StatCard> {
    vec![
      StatCard::new("Total Revenue", format_amount(self.revenue)),
      StatCard::new("Total Orders", format_count(self.orders)),
      StatCard::new("Total Customers", format_count(self.customers)),
      StatCard::new("Total Products", format_count(self.products)),
      StatCard::new("Total Categories", format_count(self.categories)),
    ]
  }
}

fn group_thousands(digits: &str) -> String {
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(ch);
  }
  out
}

pub fn format_count(n: usize) -> String {
  group_thousands(&n.to_string())
}

/// `12548.5` → `"12,548.50"`.
pub fn format_amount(amount: f64) -> String {
  let fixed = format!("{:.2}", amount.abs());
  let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
  let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
  format!("{}{}.{}", sign, group_thousands(whole), cents)
}
