//! Session facade shared by the CLI and embedding applications.
//! Owns the cart; everything else is derived on demand.

use serde::Serialize;

use crate::advisor::{apply_suggestion, Advisor, AdvisorError, SuggestionOutcome, SuggestionRequest};
use crate::build::BuildState;
use crate::cart::{Cart, QuantityChange};
use crate::catalog::{CatalogError, CatalogStore, Category, Product};
use crate::compat::{CompatibilityEngine, Diagnostics};
use crate::config::EngineConfig;
use crate::export::render_share_text;
use crate::persistence::{load_cart, save_cart, KeyValueStore, StorageError};
use crate::power::{total_price, PowerProfile};
use crate::template::{BuildTemplate, TemplateLibrary};

#[derive(Debug, thiserror::Error)]
pub enum RigforgeError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Advisor error: {0}")]
    Advisor(#[from] AdvisorError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupSummary {
    pub category: Category,
    pub item_ids: Vec<String>,
}

/// Everything the UI shows next to the build, computed from one cart.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BuildSummary {
    pub groups: Vec<GroupSummary>,
    pub diagnostics: Diagnostics,
    pub total_draw_w: u64,
    pub recommended_psu_w: u64,
    pub total_price: u64,
}

impl BuildSummary {
    pub fn has_conflicts(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Derive the full summary for `cart`.
pub fn summarize(cart: &Cart, engine: &CompatibilityEngine, power: &PowerProfile) -> BuildSummary {
    let build = BuildState::from_cart(cart);
    let groups = build
        .iter()
        .map(|(category, items)| GroupSummary {
            category,
            item_ids: items.iter().map(|i| i.id().to_string()).collect(),
        })
        .collect();
    let total_draw_w = power.total_draw(cart.items());
    BuildSummary {
        groups,
        diagnostics: engine.diagnose(cart),
        total_draw_w,
        recommended_psu_w: power.recommended_psu(total_draw_w),
        total_price: total_price(cart.items()),
    }
}

/// An interactive build session.
///
/// Every mutation is applied to a copy of the cart and saved; the session's
/// cart only changes once the save succeeds.
pub struct Configurator<S: KeyValueStore> {
    cart: Cart,
    store: S,
    config: EngineConfig,
    engine: CompatibilityEngine,
}

impl<S: KeyValueStore> Configurator<S> {
    /// Start a session, restoring the saved build if there is a readable one.
    pub fn new(store: S, config: EngineConfig) -> Self {
        let cart = load_cart(&store, &config.cart_storage_key);
        tracing::debug!("Restored build with {} items", cart.len());
        Self {
            cart,
            store,
            config,
            engine: CompatibilityEngine::with_default_rules(),
        }
    }

    pub fn with_engine(mut self, engine: CompatibilityEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn commit(&mut self, next: Cart) -> Result<(), RigforgeError> {
        save_cart(&self.store, &self.config.cart_storage_key, &next)?;
        self.cart = next;
        Ok(())
    }

    fn mutate<T>(&mut self, f: impl FnOnce(&mut Cart) -> T) -> Result<T, RigforgeError> {
        let mut next = self.cart.clone();
        let out = f(&mut next);
        self.commit(next)?;
        Ok(out)
    }

    pub fn add(&mut self, product: Product, quantity: u32) -> Result<(), RigforgeError> {
        self.mutate(|cart| cart.add(product, quantity))
    }

    /// Add a catalog product by id.
    pub fn add_by_id<C: CatalogStore + ?Sized>(
        &mut self,
        catalog: &C,
        id: &str,
        quantity: u32,
    ) -> Result<(), RigforgeError> {
        let product = catalog
            .get(id)
            .ok_or_else(|| CatalogError::UnknownProduct(id.to_string()))?;
        self.add(product, quantity)
    }

    pub fn remove(&mut self, id: &str) -> Result<bool, RigforgeError> {
        self.mutate(|cart| cart.remove(id))
    }

    pub fn change_quantity(&mut self, id: &str, delta: i64) -> Result<Option<u32>, RigforgeError> {
        self.mutate(|cart| cart.change_quantity(id, delta))
    }

    pub fn decrement(&mut self, id: &str, step: u32) -> Result<QuantityChange, RigforgeError> {
        self.mutate(|cart| cart.decrement(id, step))
    }

    pub fn replace(&mut self, old_id: &str, product: Product, quantity: u32) -> Result<(), RigforgeError> {
        self.mutate(|cart| cart.replace(old_id, product, quantity))
    }

    pub fn clear_category(&mut self, category: Category) -> Result<usize, RigforgeError> {
        self.mutate(|cart| cart.clear_category(category))
    }

    pub fn reset(&mut self) -> Result<(), RigforgeError> {
        self.mutate(Cart::reset)
    }

    /// Fresh diagnostics and aggregates for the current cart.
    pub fn summary(&self) -> BuildSummary {
        summarize(&self.cart, &self.engine, &self.config.power)
    }

    pub fn share_text(&self) -> String {
        render_share_text(&self.cart)
    }

    fn templates(&self) -> TemplateLibrary<&S> {
        TemplateLibrary::new(&self.store, self.config.template_storage_key.clone())
    }

    pub fn list_templates(&self) -> Result<Vec<BuildTemplate>, RigforgeError> {
        Ok(self.templates().list()?)
    }

    /// Save the current cart as a named template.
    pub fn save_template(&self, name: &str) -> Result<BuildTemplate, RigforgeError> {
        let template = BuildTemplate::from_cart(name, &self.cart);
        self.templates().save(template.clone())?;
        Ok(template)
    }

    pub fn delete_template(&self, id: &str) -> Result<bool, RigforgeError> {
        Ok(self.templates().delete(id)?)
    }

    /// Replace the cart with a saved template resolved against `catalog`.
    /// Returns the number of dropped references, or `None` if the template does not exist.
    pub fn load_template(&mut self, id: &str, catalog: &[Product]) -> Result<Option<usize>, RigforgeError> {
        let Some(load) = self.templates().load(id, catalog)? else {
            return Ok(None);
        };
        self.commit(load.cart)?;
        Ok(Some(load.dropped))
    }

    /// Ask `advisor` for a build and, on success, replace the cart with it.
    /// On failure the cart is untouched.
    pub async fn request_suggestion(
        &mut self,
        advisor: &dyn Advisor,
        catalog: &[Product],
        budget: u64,
        usage: &str,
    ) -> Result<SuggestionOutcome, RigforgeError> {
        let request = SuggestionRequest::from_catalog(catalog, budget, usage);
        tracing::info!("Requesting build suggestion from {}", advisor.name());
        let response = advisor.suggest(&request).await?;
        let outcome = apply_suggestion(&response, catalog);
        self.commit(outcome.cart.clone())?;
        tracing::info!(
            "Applied suggestion: {} items, {} unknown ids ignored",
            outcome.cart.len(),
            outcome.ignored.len()
        );
        Ok(outcome)
    }
}
