// tattva/src/model/product.rs

use super::entity::{from_fields, to_fields, Draft, Entity, NewRecord};
use super::{non_blank_urls, parse_price, require_text};
use crate::error::{TattvaError, TattvaResult, ValidationError};
use crate::store::{DocumentId, Fields, StoredDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category values offered by the product form. Any non-blank text is
/// accepted; these are suggestions.
pub const SUGGESTED_PRODUCT_CATEGORIES: [&str; 6] = [
  "Paintings and Visual-arts",
  "Textiles and Weaving",
  "Crafts from natural materials",
  "Metal and Jewellery work",
  "Pottery and Terracotta",
  "Performing arts",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
  #[default]
  Draft,
  Published,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: DocumentId,
  pub name: String,
  pub price: f64,
  pub category: String,
  pub description: String,
  pub history: Option<String>,
  /// The first URL is the primary image.
  pub image_urls: Vec<String>,
  pub status: ProductStatus,
  pub created_at: Option<DateTime<Utc>>,
}

impl Product {
  pub fn primary_image(&self) -> Option<&str> {
    self.image_urls.first().map(String::as_str)
  }
}

/// Document body of a product, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductFields {
  name: String,
  price: f64,
  #[serde(default)]
  category: String,
  #[serde(default)]
  description: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  history: Option<String>,
  #[serde(default)]
  image_urls: Vec<String>,
  #[serde(default)]
  status: ProductStatus,
}

impl Entity for Product {
  const COLLECTION: &'static str = "products";
  const LABEL: &'static str = "product";
  const CREATE_DENIED_MESSAGE: Option<&'static str> = Some("Permission denied. Please check the store access rules.");

  type Draft = ProductDraft;
  type New = NewProduct;

  fn id(&self) -> &DocumentId {
    &self.id
  }

  fn from_document(doc: StoredDocument) -> TattvaResult<Self> {
    let f: ProductFields = from_fields(Self::COLLECTION, &doc.id, doc.fields)?;
    Ok(Product {
      id: doc.id,
      name: f.name,
      price: f.price,
      category: f.category,
      description: f.description,
      history: f.history,
      image_urls: f.image_urls,
      status: f.status,
      created_at: doc.created_at,
    })
  }

  fn to_document(&self) -> TattvaResult<StoredDocument> {
    let body = ProductFields {
      name: self.name.clone(),
      price: self.price,
      category: self.category.clone(),
      description: self.description.clone(),
      history: self.history.clone(),
      image_urls: self.image_urls.clone(),
      status: self.status,
    };
    Ok(StoredDocument {
      id: self.id.clone(),
      created_at: self.created_at,
      fields: to_fields(&body)?,
    })
  }

  fn draft(&self) -> ProductDraft {
    ProductDraft {
      name: self.name.clone(),
      category: self.category.clone(),
      price: self.price.to_string(),
      status: self.status,
    }
  }

  fn apply_draft(&mut self, draft: &ProductDraft) -> TattvaResult<()> {
    draft.validate()?;
    self.name = draft.name.clone();
    self.category = draft.category.clone();
    self.price = parse_price(&draft.price)?;
    self.status = draft.status;
    Ok(())
  }
}

/// Editable product fields. The price is kept as typed text until save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
  pub name: String,
  pub category: String,
  pub price: String,
  pub status: ProductStatus,
}

impl Draft for ProductDraft {
  fn validate(&self) -> Result<(), ValidationError> {
    require_text("name", &self.name)?;
    parse_price(&self.price)?;
    require_text("category", &self.category)
  }

  fn to_update_fields(&self) -> TattvaResult<Fields> {
    let mut fields = Fields::new();
    fields.insert("name".into(), self.name.clone().into());
    fields.insert("category".into(), self.category.clone().into());
    fields.insert("price".into(), parse_price(&self.price)?.into());
    let status = serde_json::to_value(self.status)
      .map_err(|e| TattvaError::Internal(format!("serialisation failed: {}", e)))?;
    fields.insert("status".into(), status);
    Ok(fields)
  }
}

/// The "Add New Product" form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProduct {
  pub name: String,
  pub price: String,
  pub category: String,
  pub description: String,
  pub history: String,
  pub image_urls: Vec<String>,
  pub status: ProductStatus,
}

impl NewProduct {
  fn body(&self) -> TattvaResult<ProductFields> {
    Ok(ProductFields {
      name: self.name.clone(),
      price: parse_price(&self.price)?,
      category: self.category.clone(),
      description: self.description.clone(),
      history: (!self.history.trim().is_empty()).then(|| self.history.clone()),
      image_urls: non_blank_urls(&self.image_urls),
      status: self.status,
    })
  }
}

impl NewRecord<Product> for NewProduct {
  fn validate(&self) -> Result<(), ValidationError> {
    require_text("name", &self.name)?;
    parse_price(&self.price)?;
    require_text("category", &self.category)
  }

  fn to_create_fields(&self) -> TattvaResult<Fields> {
    self.validate()?;
    to_fields(&self.body()?)
  }

  fn into_record(self, id: DocumentId, created_at: Option<DateTime<Utc>>) -> TattvaResult<Product> {
    let body = self.body()?;
    Ok(Product {
      id,
      name: body.name,
      price: body.price,
      category: body.category,
      description: body.description,
      history: body.history,
      image_urls: body.image_urls,
      status: body.status,
      created_at,
    })
  }
}
