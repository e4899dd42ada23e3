//! Rigforge - PC component configurator engine
//!
//! This library keeps a build (a cart of catalog parts with quantities),
//! flags incompatible parts, and derives the power draw, PSU size and price
//! of the build.
//!
//! # Quick Start
//!
//! ```
//! use rigforge::prelude::*;
//!
//! let mut cart = Cart::new();
//! cart.add(Product::new("cpu", "Core i5", Category::Cpu, 220).with_spec("socket", "LGA1700"), 1);
//! cart.add(Product::new("mb", "B650", Category::Motherboard, 180).with_spec("socket", "AM5"), 1);
//!
//! let summary = summarize(&cart, &CompatibilityEngine::default(), &PowerProfile::default());
//! for diagnostic in &summary.diagnostics {
//!     println!("{}: {}", diagnostic.item_id, diagnostic.message);
//! }
//! assert_eq!(summary.diagnostics.len(), 2);
//! ```
//!
//! # Features
//!
//! - **Search**: AND/OR free-text queries, spec filters, cascading facets
//! - **Compatibility**: socket, memory type, GPU length and cooler height rules
//! - **Power budgeting**: estimated draw and recommended PSU wattage
//! - **Persistence**: saved builds and named templates over a key-value store
//! - **Optional AI**: build suggestions through an external advisor

pub mod advisor;
pub mod build;
pub mod cart;
pub mod catalog;
pub mod compat;
pub mod config;
pub mod core;
pub mod export;
pub mod measure;
pub mod persistence;
pub mod power;
pub mod search;
pub mod template;

// Re-export main types
pub use build::BuildState;
pub use cart::{Cart, CartItem, QuantityChange};
pub use catalog::{Category, CategoryFilter, Product, SpecMap};
pub use compat::{CompatibilityEngine, Diagnostic, Diagnostics, Rule};
pub use config::EngineConfig;
pub use crate::core::{summarize, BuildSummary, Configurator, GroupSummary, RigforgeError};
pub use power::{total_price, PowerProfile};
pub use search::{filter_products, smart_options, sort_products, ActiveFilters, SortOrder};

/// Load a catalog from a JSON array file (convenience wrapper).
pub fn load_catalog(path: &std::path::Path) -> Result<Vec<Product>, RigforgeError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load a saved build from a JSON file in the persisted cart format.
pub fn load_build(path: &std::path::Path) -> Result<Cart, RigforgeError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        summarize, BuildSummary, Cart, CartItem, Category, CategoryFilter, CompatibilityEngine,
        Configurator, EngineConfig, PowerProfile, Product, RigforgeError,
    };
}
