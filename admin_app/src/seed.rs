// artcraft_admin/src/seed.rs

//! Demo catalogue for an empty store.

use crate::errors::Result;
use tattva::{Entity, NewProduct, NewRecord, Product, ProductStatus, RecordStore, TattvaError, StoreOp};
use tracing::info;

pub fn demo_products() -> Vec<NewProduct> {
  let product = |name: &str, price: &str, category: &str, description: &str, image: &str, status| NewProduct {
    name: name.to_string(),
    price: price.to_string(),
    category: category.to_string(),
    description: description.to_string(),
    image_urls: vec![image.to_string()],
    status,
    ..NewProduct::default()
  };
  vec![
    product(
      "Pink Floral Dress",
      "49.99",
      "Clothing",
      "Beautiful pink floral pattern dress for summer",
      "https://images.unsplash.com/photo-1595777457583-95e059d581b8?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=60",
      ProductStatus::Published,
    ),
    product(
      "Rose Gold Watch",
      "89.99",
      "Accessories",
      "Elegant rose gold watch with leather strap",
      "https://images.unsplash.com/photo-1524592094714-0f0654e20314?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=60",
      ProductStatus::Published,
    ),
    product(
      "Pink Ceramic Mug",
      "19.99",
      "Home & Living",
      "Handcrafted ceramic mug in pastel pink",
      "https://images.unsplash.com/photo-1544787219-7f47ccb76574?ixlib=rb-1.2.1&auto=format&fit=crop&w=500&q=60",
      ProductStatus::Draft,
    ),
  ]
}

/// Writes the demo products when the product collection is empty. Returns
/// how many were inserted.
pub async fn seed_demo_products(store: &dyn RecordStore) -> Result<usize> {
  let existing = store
    .read_all(Product::COLLECTION)
    .await
    .map_err(|e| TattvaError::store(StoreOp::ReadAll, Product::COLLECTION, e))?;
  if !existing.is_empty() {
    info!(count = existing.len(), "Products already present, skipping demo seed.");
    return Ok(0);
  }

  let demo = demo_products();
  for input in &demo {
    let fields = input.to_create_fields()?;
    store
      .create(Product::COLLECTION, fields)
      .await
      .map_err(|e| TattvaError::store(StoreOp::Create, Product::COLLECTION, e))?;
  }
  info!(count = demo.len(), "Demo products seeded.");
  Ok(demo.len())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tattva::InMemoryStore;

  #[tokio::test]
  async fn seeds_once_into_an_empty_store() {
    let store = InMemoryStore::new();
    assert_eq!(seed_demo_products(&store).await.unwrap(), 3);
    assert_eq!(seed_demo_products(&store).await.unwrap(), 0);

    let docs = store.read_all(Product::COLLECTION).await.unwrap();
    let first = Product::from_document(docs[0].clone()).unwrap();
    assert_eq!(first.name, "Pink Floral Dress");
    assert_eq!(first.price, 49.99);
    let last = Product::from_document(docs[2].clone()).unwrap();
    assert_eq!(last.status, ProductStatus::Draft);
  }
}
