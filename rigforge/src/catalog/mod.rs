//! Product catalog: records, categories, storage and bulk import.

pub mod import;
pub mod product;
pub mod store;

pub use import::{import_records, ImportReport, RecordError};
pub use product::{keys, split_multi_value, Category, CategoryFilter, Product, SpecMap, UnknownCategory};
pub use store::{CatalogError, CatalogStore, InMemoryCatalog, JsonFileCatalog};
