//! The build selection: a flat, ordered list of products with quantities.
//!
//! A cart holds at most one entry per product id and never an entry with a
//! quantity below one.

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Product};

/// A product in the build, with its quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self {
            product,
            quantity: quantity.max(1),
        }
    }

    pub fn id(&self) -> &str {
        &self.product.id
    }

    pub fn category(&self) -> Category {
        self.product.category
    }

    /// Price × quantity, saturating at `u64::MAX`.
    pub fn line_total(&self) -> u64 {
        self.product.price.saturating_mul(u64::from(self.quantity))
    }
}

/// Result of a quantity decrement under the UI convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    Updated(u32),
    Removed,
    NotFound,
}

/// Deserializing goes through [`Cart::from_items`], so stored JSON with repeated
/// ids or zero quantities is normalized on the way in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from raw items, merging repeated ids and clamping quantities to one.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add(item.product, item.quantity);
        }
        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Add `quantity` units; an existing entry for the same id is incremented in place.
    pub fn add(&mut self, product: Product, quantity: u32) {
        let quantity = quantity.max(1);
        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => self.items.push(CartItem { product, quantity }),
        }
    }

    /// Drop the entry regardless of quantity. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id() != id);
        self.items.len() != before
    }

    /// Apply `delta`, flooring the quantity at one. Returns the new quantity.
    pub fn change_quantity(&mut self, id: &str, delta: i64) -> Option<u32> {
        let item = self.items.iter_mut().find(|i| i.id() == id)?;
        let next = (i64::from(item.quantity) + delta).clamp(1, i64::from(u32::MAX));
        item.quantity = next as u32;
        Some(item.quantity)
    }

    /// UI decrement: a step that would take the quantity below one removes the item instead.
    pub fn decrement(&mut self, id: &str, step: u32) -> QuantityChange {
        let Some(item) = self.get(id) else {
            return QuantityChange::NotFound;
        };
        if item.quantity <= step {
            self.remove(id);
            QuantityChange::Removed
        } else {
            match self.change_quantity(id, -i64::from(step)) {
                Some(q) => QuantityChange::Updated(q),
                None => QuantityChange::NotFound,
            }
        }
    }

    /// Swap `old_id` for `product` in one step. The new entry merges with an
    /// existing entry of the same id, otherwise it takes the old entry's position.
    pub fn replace(&mut self, old_id: &str, product: Product, quantity: u32) {
        let quantity = quantity.max(1);
        let position = self.items.iter().position(|i| i.id() == old_id);
        self.items.retain(|i| i.id() != old_id);

        if self.contains(&product.id) {
            self.add(product, quantity);
            return;
        }
        let item = CartItem { product, quantity };
        match position {
            Some(pos) => self.items.insert(pos.min(self.items.len()), item),
            None => self.items.push(item),
        }
    }

    /// Remove every item of `category`. Returns how many entries were dropped.
    pub fn clear_category(&mut self, category: Category) -> usize {
        let before = self.items.len();
        self.items.retain(|i| i.category() != category);
        before - self.items.len()
    }

    pub fn reset(&mut self) {
        self.items.clear();
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl FromIterator<CartItem> for Cart {
    fn from_iter<I: IntoIterator<Item = CartItem>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}
