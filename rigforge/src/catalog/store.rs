//! Catalog storage collaborators.
//!
//! The engine only ever reads [`CatalogStore::list`]; the write side exists so
//! the CLI and tests can maintain a catalog without a real backend.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::catalog::product::Product;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
    #[error("Duplicate product id in batch: {0}")]
    DuplicateId(String),
    #[error("Catalog IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

pub trait CatalogStore {
    fn list(&self) -> Vec<Product>;

    fn get(&self, id: &str) -> Option<Product> {
        self.list().into_iter().find(|p| p.id == id)
    }

    fn upsert(&mut self, product: Product) -> Result<()>;

    fn delete(&mut self, id: &str) -> Result<()>;

    /// All-or-nothing: a batch containing the same id twice is rejected before anything is written.
    fn bulk_upsert(&mut self, products: Vec<Product>) -> Result<()>;
}

/// Catalog held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let mut catalog = Self::new();
        for product in products {
            catalog.put(product);
        }
        catalog
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn put(&mut self, product: Product) {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
    }

    fn stamped(mut product: Product) -> Product {
        product.last_updated = Some(Utc::now());
        product
    }
}

fn check_batch_ids(products: &[Product]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for product in products {
        if !seen.insert(product.id.as_str()) {
            return Err(CatalogError::DuplicateId(product.id.clone()));
        }
    }
    Ok(())
}

impl CatalogStore for InMemoryCatalog {
    fn list(&self) -> Vec<Product> {
        self.products.clone()
    }

    fn get(&self, id: &str) -> Option<Product> {
        self.products.iter().find(|p| p.id == id).cloned()
    }

    fn upsert(&mut self, product: Product) -> Result<()> {
        self.put(Self::stamped(product));
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        if self.products.len() == before {
            return Err(CatalogError::UnknownProduct(id.to_string()));
        }
        Ok(())
    }

    fn bulk_upsert(&mut self, products: Vec<Product>) -> Result<()> {
        check_batch_ids(&products)?;
        for product in products {
            self.put(Self::stamped(product));
        }
        Ok(())
    }
}

/// Catalog persisted as a pretty-printed JSON array.
///
/// Every write goes to disk before the in-memory list is swapped, so a failed
/// write leaves the catalog exactly as it was.
#[derive(Debug)]
pub struct JsonFileCatalog {
    path: PathBuf,
    inner: InMemoryCatalog,
}

impl JsonFileCatalog {
    /// Open a catalog file; a missing file starts an empty catalog.
    pub fn open(path: &Path) -> Result<Self> {
        let inner = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            InMemoryCatalog::with_products(serde_json::from_str(&content)?)
        } else {
            InMemoryCatalog::new()
        };
        tracing::debug!("Opened catalog {:?} with {} products", path, inner.len());
        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit(&mut self, next: InMemoryCatalog) -> Result<()> {
        let json = serde_json::to_string_pretty(next.products())?;
        std::fs::write(&self.path, json)?;
        self.inner = next;
        Ok(())
    }
}

impl CatalogStore for JsonFileCatalog {
    fn list(&self) -> Vec<Product> {
        self.inner.list()
    }

    fn get(&self, id: &str) -> Option<Product> {
        self.inner.get(id)
    }

    fn upsert(&mut self, product: Product) -> Result<()> {
        let mut next = self.inner.clone();
        next.upsert(product)?;
        self.commit(next)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let mut next = self.inner.clone();
        next.delete(id)?;
        self.commit(next)
    }

    fn bulk_upsert(&mut self, products: Vec<Product>) -> Result<()> {
        let mut next = self.inner.clone();
        next.bulk_upsert(products)?;
        self.commit(next)
    }
}
