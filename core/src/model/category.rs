// tattva/src/model/category.rs

use super::entity::{from_fields, to_fields, Draft, Entity, NewRecord};
use super::{non_blank_urls, require_text};
use crate::error::{TattvaResult, ValidationError};
use crate::store::{DocumentId, Fields, StoredDocument};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryStatus {
  #[default]
  Active,
  Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
  pub id: DocumentId,
  pub name: String,
  pub description: String,
  pub image_urls: Vec<String>,
  /// Denormalised. Written as 0 on create; no mutation path maintains it.
  pub product_count: u32,
  pub status: CategoryStatus,
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryFields {
  name: String,
  #[serde(default)]
  description: String,
  #[serde(default)]
  image_urls: Vec<String>,
  #[serde(default)]
  product_count: u32,
  #[serde(default)]
  status: CategoryStatus,
}

impl Entity for Category {
  const COLLECTION: &'static str = "categories";
  const LABEL: &'static str = "category";

  type Draft = CategoryDraft;
  type New = NewCategory;

  fn id(&self) -> &DocumentId {
    &self.id
  }

  fn from_document(doc: StoredDocument) -> TattvaResult<Self> {
    let f: CategoryFields = from_fields(Self::COLLECTION, &doc.id, doc.fields)?;
    Ok(Category {
      id: doc.id,
      name: f.name,
      description: f.description,
      image_urls: f.image_urls,
      product_count: f.product_count,
      status: f.status,
      created_at: doc.created_at,
    })
  }

  fn to_document(&self) -> TattvaResult<StoredDocument> {
    let body = CategoryFields {
      name: self.name.clone(),
      description: self.description.clone(),
      image_urls: self.image_urls.clone(),
      product_count: self.product_count,
      status: self.status,
    };
    Ok(StoredDocument {
      id: self.id.clone(),
      created_at: self.created_at,
      fields: to_fields(&body)?,
    })
  }

  fn draft(&self) -> CategoryDraft {
    CategoryDraft {
      name: self.name.clone(),
      description: self.description.clone(),
      status: self.status,
    }
  }

  fn apply_draft(&mut self, draft: &CategoryDraft) -> TattvaResult<()> {
    draft.validate()?;
    self.name = draft.name.clone();
    self.description = draft.description.clone();
    self.status = draft.status;
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
  pub name: String,
  pub description: String,
  pub status: CategoryStatus,
}

impl Draft for CategoryDraft {
  fn validate(&self) -> Result<(), ValidationError> {
    require_text("name", &self.name)
  }

  fn to_update_fields(&self) -> TattvaResult<Fields> {
    to_fields(self)
  }
}

/// The "Add New Category" form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCategory {
  pub name: String,
  pub description: String,
  pub image_urls: Vec<String>,
  pub status: CategoryStatus,
}

impl NewCategory {
  fn body(&self) -> CategoryFields {
    CategoryFields {
      name: self.name.clone(),
      description: self.description.clone(),
      image_urls: non_blank_urls(&self.image_urls),
      product_count: 0,
      status: self.status,
    }
  }
}

impl NewRecord<Category> for NewCategory {
  fn validate(&self) -> Result<(), ValidationError> {
    require_text("name", &self.name)
  }

  fn to_create_fields(&self) -> TattvaResult<Fields> {
    self.validate()?;
    to_fields(&self.body())
  }

  fn into_record(self, id: DocumentId, created_at: Option<DateTime<Utc>>) -> TattvaResult<Category> {
    let body = self.body();
    Ok(Category {
      id,
      name: body.name,
      description: body.description,
      image_urls: body.image_urls,
      product_count: body.product_count,
      status: body.status,
      created_at,
    })
  }
}
