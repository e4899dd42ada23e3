//! Rule dispatch and the per-item diagnostic map.

use std::sync::Arc;

use serde::Serialize;

use crate::build::BuildState;
use crate::cart::{Cart, CartItem};
use crate::compat::rules::*;

/// A conflict reported for one cart item.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub item_id: String,
    pub rule_id: String,
    pub message: String,
}

/// Diagnostics for a whole build, in cart order. Items without a conflict have no entry.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn message_for(&self, item_id: &str) -> Option<&str> {
        self.get(item_id).map(|d| d.message.as_str())
    }

    pub fn get(&self, item_id: &str) -> Option<&Diagnostic> {
        self.0.iter().find(|d| d.item_id == item_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Ordered rule list; the first rule that reports a conflict for an item wins.
pub struct CompatibilityEngine {
    rules: Vec<Arc<dyn Rule>>,
}

impl CompatibilityEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Arc::new(SocketRule));
        engine.add_rule(Arc::new(BoardMemoryRule));
        engine.add_rule(Arc::new(RamBoardMemoryRule));
        engine.add_rule(Arc::new(MixedRamRule));
        engine.add_rule(Arc::new(GpuLengthRule));
        engine.add_rule(Arc::new(CaseGpuClearanceRule));
        engine.add_rule(Arc::new(CoolerHeightRule));
        engine.add_rule(Arc::new(CaseCoolerClearanceRule));
        engine
    }

    /// Appends after the existing rules, so it only fires when none of them do.
    pub fn add_rule(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    /// First conflict for `item`, as `(rule id, message)`.
    pub fn check_item(&self, item: &CartItem, build: &BuildState<'_>) -> Option<(String, String)> {
        self.rules
            .iter()
            .find_map(|rule| rule.check(item, build).map(|msg| (rule.id().to_string(), msg)))
    }

    /// Convenience wrapper returning just the message.
    pub fn check_compatibility(&self, item: &CartItem, build: &BuildState<'_>) -> Option<String> {
        self.check_item(item, build).map(|(_, message)| message)
    }

    /// Recompute diagnostics for every item of `cart` from scratch.
    pub fn diagnose(&self, cart: &Cart) -> Diagnostics {
        let build = BuildState::from_cart(cart);
        let diagnostics: Vec<Diagnostic> = cart
            .items()
            .iter()
            .filter_map(|item| {
                self.check_item(item, &build).map(|(rule_id, message)| Diagnostic {
                    item_id: item.id().to_string(),
                    rule_id,
                    message,
                })
            })
            .collect();
        tracing::debug!(
            "Diagnosed {} items with {} rules: {} conflicts",
            cart.len(),
            self.rules.len(),
            diagnostics.len()
        );
        Diagnostics(diagnostics)
    }
}

impl Default for CompatibilityEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
