//! AI build suggestions.
//!
//! The advisor itself is an external service. This module owns the request
//! and response shapes, and turns a response into a cart using only ids that
//! exist in the current catalog.

pub mod claude;
pub mod prompts;
pub mod provider;

pub use claude::ClaudeAdvisor;
pub use provider::{Advisor, AdvisorError, InventoryEntry, SuggestionRequest, SuggestionResponse};

use crate::cart::Cart;
use crate::catalog::Product;

/// Cart built from a suggestion, plus the ids that were not in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionOutcome {
    pub cart: Cart,
    pub ignored: Vec<String>,
    pub explanation: String,
}

/// Build a replacement cart from `response`. Unknown ids are skipped; a
/// repeated id adds another unit.
pub fn apply_suggestion(response: &SuggestionResponse, catalog: &[Product]) -> SuggestionOutcome {
    let mut cart = Cart::new();
    let mut ignored = Vec::new();
    for id in &response.product_ids {
        match catalog.iter().find(|p| &p.id == id) {
            Some(product) => cart.add(product.clone(), 1),
            None => ignored.push(id.clone()),
        }
    }
    if !ignored.is_empty() {
        tracing::warn!("Advisor suggested {} unknown products: {:?}", ignored.len(), ignored);
    }
    SuggestionOutcome {
        cart,
        ignored,
        explanation: response.explanation.clone(),
    }
}
