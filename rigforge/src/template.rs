//! Named build templates.
//!
//! A template stores product ids and quantities, not product snapshots.
//! Loading one resolves each id against the live catalog and drops the ids
//! that no longer exist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::catalog::Product;
use crate::persistence::{KeyValueStore, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItem {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildTemplate {
    pub id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub items: Vec<TemplateItem>,
}

/// A resolved template. `dropped` counts references missing from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLoad {
    pub cart: Cart,
    pub dropped: usize,
}

impl BuildTemplate {
    pub fn from_cart(name: impl Into<String>, cart: &Cart) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            timestamp: Utc::now(),
            items: cart
                .items()
                .iter()
                .map(|item| TemplateItem {
                    product_id: item.id().to_string(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }

    /// Re-resolve every reference against `catalog`.
    pub fn resolve(&self, catalog: &[Product]) -> TemplateLoad {
        let mut cart = Cart::new();
        let mut dropped = 0;
        for item in &self.items {
            match catalog.iter().find(|p| p.id == item.product_id) {
                Some(product) => cart.add(product.clone(), item.quantity),
                None => {
                    tracing::warn!(
                        "Template '{}' references missing product {}",
                        self.name,
                        item.product_id
                    );
                    dropped += 1;
                }
            }
        }
        TemplateLoad { cart, dropped }
    }
}

/// Templates kept as one JSON array under a single store key.
pub struct TemplateLibrary<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> TemplateLibrary<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Saved templates; a corrupt blob reads as an empty library.
    pub fn list(&self) -> Result<Vec<BuildTemplate>, StorageError> {
        let Some(blob) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&blob) {
            Ok(templates) => Ok(templates),
            Err(e) => {
                tracing::warn!("Ignoring malformed template library: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Insert or replace by template id.
    pub fn save(&self, template: BuildTemplate) -> Result<(), StorageError> {
        let mut templates = self.list()?;
        match templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => templates.push(template),
        }
        self.write(&templates)
    }

    /// Returns whether a template was removed.
    pub fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut templates = self.list()?;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Ok(false);
        }
        self.write(&templates)?;
        Ok(true)
    }

    /// Resolve a saved template; `None` when no template has that id.
    pub fn load(&self, id: &str, catalog: &[Product]) -> Result<Option<TemplateLoad>, StorageError> {
        let loaded = self
            .list()?
            .into_iter()
            .find(|t| t.id == id)
            .map(|t| t.resolve(catalog));
        if let Some(ref load) = loaded {
            tracing::info!(
                "Loaded template {} with {} items ({} dropped)",
                id,
                load.cart.len(),
                load.dropped
            );
        }
        Ok(loaded)
    }

    fn write(&self, templates: &[BuildTemplate]) -> Result<(), StorageError> {
        let json = serde_json::to_string(templates)?;
        self.store.set(&self.key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::persistence::MemoryStore;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("cpu", "CPU", Category::Cpu, 300),
            Product::new("gpu", "GPU", Category::Gpu, 700),
            Product::new("ram", "RAM", Category::Ram, 90),
        ]
    }

    fn cart_from(catalog: &[Product]) -> Cart {
        let mut cart = Cart::new();
        cart.add(catalog[0].clone(), 1);
        cart.add(catalog[1].clone(), 1);
        cart.add(catalog[2].clone(), 2);
        cart
    }

    #[test]
    fn test_from_cart_keeps_references_only() {
        let template = BuildTemplate::from_cart("Gaming", &cart_from(&catalog()));
        assert_eq!(template.items.len(), 3);
        assert_eq!(template.items[2], TemplateItem { product_id: "ram".into(), quantity: 2 });

        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(json["items"][0]["productId"], "cpu");
        assert!(json["items"][0].get("name").is_none());
    }

    #[test]
    fn test_resolve_drops_missing_products() {
        let full = catalog();
        let template = BuildTemplate::from_cart("Gaming", &cart_from(&full));

        let shrunk: Vec<_> = full.into_iter().filter(|p| p.id != "gpu").collect();
        let load = template.resolve(&shrunk);

        assert_eq!(load.cart.len(), 2);
        assert_eq!(load.dropped, 1);
        assert_eq!(load.cart.get("ram").unwrap().quantity, 2);
    }

    #[test]
    fn test_resolve_uses_current_catalog_data() {
        let mut products = catalog();
        let template = BuildTemplate::from_cart("Gaming", &cart_from(&products));
        products[0].price = 250;

        let load = template.resolve(&products);
        assert_eq!(load.cart.get("cpu").unwrap().product.price, 250);
    }

    #[test]
    fn test_library_save_load_delete() {
        let products = catalog();
        let library = TemplateLibrary::new(MemoryStore::new(), "templates");
        let template = BuildTemplate::from_cart("Office", &cart_from(&products));
        let id = template.id.clone();

        library.save(template).unwrap();
        assert_eq!(library.list().unwrap().len(), 1);

        let load = library.load(&id, &products).unwrap().unwrap();
        assert_eq!(load.dropped, 0);
        assert_eq!(load.cart.len(), 3);

        assert!(library.load("nope", &products).unwrap().is_none());
        assert!(library.delete(&id).unwrap());
        assert!(!library.delete(&id).unwrap());
        assert!(library.list().unwrap().is_empty());
    }

    #[test]
    fn test_library_save_replaces_same_id() {
        let products = catalog();
        let library = TemplateLibrary::new(MemoryStore::new(), "templates");
        let mut template = BuildTemplate::from_cart("Draft", &cart_from(&products));
        library.save(template.clone()).unwrap();

        template.name = "Final".to_string();
        library.save(template).unwrap();

        let saved = library.list().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "Final");
    }

    #[test]
    fn test_corrupt_library_is_empty() {
        let store = MemoryStore::new();
        store.set("templates", "[{").unwrap();
        let library = TemplateLibrary::new(&store, "templates");
        assert!(library.list().unwrap().is_empty());
    }
}
