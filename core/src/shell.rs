// tattva/src/shell.rs

//! Navigation state of the dashboard: the active tab and the two create-form
//! overlays. Holds no entity data.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
  #[default]
  Dashboard,
  Products,
  Categories,
  Orders,
  Customers,
  Analytics,
  Settings,
}

impl View {
  /// Sidebar order.
  pub const ALL: [View; 7] = [
    View::Dashboard,
    View::Products,
    View::Categories,
    View::Orders,
    View::Customers,
    View::Analytics,
    View::Settings,
  ];

  pub fn id(&self) -> &'static str {
    match self {
      View::Dashboard => "dashboard",
      View::Products => "products",
      View::Categories => "categories",
      View::Orders => "orders",
      View::Customers => "customers",
      View::Analytics => "analytics",
      View::Settings => "settings",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      View::Dashboard => "Dashboard",
      View::Products => "Products",
      View::Categories => "Categories",
      View::Orders => "Orders",
      View::Customers => "Customers",
      View::Analytics => "Analytics",
      View::Settings => "Settings",
    }
  }

  pub fn is_implemented(&self) -> bool {
    !matches!(self, View::Customers | View::Analytics | View::Settings)
  }

  /// What the view shows, top to bottom.
  pub fn panels(&self) -> Vec<Panel> {
    match self {
      View::Dashboard => vec![
        Panel::StatCards,
        Panel::AddButton(FormKind::Product),
        Panel::ProductCards,
        Panel::ProductTable,
      ],
      View::Products => vec![
        Panel::AddButton(FormKind::Product),
        Panel::ProductCards,
        Panel::ProductTable,
      ],
      View::Categories => vec![
        Panel::AddButton(FormKind::Category),
        Panel::CategoryCards,
        Panel::CategoryTable,
      ],
      View::Orders => vec![Panel::OrderStatusFilter, Panel::OrderCards, Panel::OrderTable],
      View::Customers | View::Analytics | View::Settings => vec![Panel::Placeholder],
    }
  }
}

impl FromStr for View {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    View::ALL
      .into_iter()
      .find(|v| v.id().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| format!("unknown view '{}'", s))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
  Product,
  Category,
}

impl FromStr for FormKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "product" | "products" => Ok(FormKind::Product),
      "category" | "categories" => Ok(FormKind::Category),
      other => Err(format!("unknown form '{}'", other)),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "panel", content = "form", rename_all = "snake_case")]
pub enum Panel {
  StatCards,
  AddButton(FormKind),
  ProductCards,
  ProductTable,
  CategoryCards,
  CategoryTable,
  OrderStatusFilter,
  OrderCards,
  OrderTable,
  Placeholder,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shell {
  active: View,
  product_form_open: bool,
  category_form_open: bool,
}

impl Shell {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn active(&self) -> View {
    self.active
  }

  pub fn select(&mut self, view: View) {
    debug!(from = self.active.id(), to = view.id(), "view selected");
    self.active = view;
  }

  pub fn panels(&self) -> Vec<Panel> {
    self.active.panels()
  }

  pub fn is_open(&self, form: FormKind) -> bool {
    match form {
      FormKind::Product => self.product_form_open,
      FormKind::Category => self.category_form_open,
    }
  }

  pub fn open_form(&mut self, form: FormKind) {
    *self.flag(form) = true;
  }

  /// Cancel button.
  pub fn close_form(&mut self, form: FormKind) {
    *self.flag(form) = false;
  }

  /// Closes the form after its submission was acknowledged. A failed
  /// submission leaves it open.
  pub fn form_submitted(&mut self, form: FormKind, succeeded: bool) {
    if succeeded {
      self.close_form(form);
    }
  }

  pub fn open_forms(&self) -> Vec<FormKind> {
    [FormKind::Product, FormKind::Category]
      .into_iter()
      .filter(|f| self.is_open(*f))
      .collect()
  }

  fn flag(&mut self, form: FormKind) -> &mut bool {
    match form {
      FormKind::Product => &mut self.product_form_open,
      FormKind::Category => &mut self.category_form_open,
    }
  }
}
