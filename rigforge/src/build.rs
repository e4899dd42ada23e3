//! Per-category projection of a cart.

use crate::cart::{Cart, CartItem};
use crate::catalog::Category;

/// Cart items grouped by category, borrowing from the cart they were built from.
///
/// Every category has a (possibly empty) slot; order inside a slot follows
/// cart order, so the first item of a slot is that category's primary.
#[derive(Debug, Clone)]
pub struct BuildState<'a> {
    groups: [Vec<&'a CartItem>; Category::COUNT],
}

impl<'a> BuildState<'a> {
    pub fn from_items(items: &'a [CartItem]) -> Self {
        let mut groups: [Vec<&'a CartItem>; Category::COUNT] = Default::default();
        for item in items {
            groups[item.category().index()].push(item);
        }
        Self { groups }
    }

    pub fn from_cart(cart: &'a Cart) -> Self {
        Self::from_items(cart.items())
    }

    pub fn items(&self, category: Category) -> &[&'a CartItem] {
        &self.groups[category.index()]
    }

    /// First item of `category`, the one consulted by cross-category rules.
    pub fn primary(&self, category: Category) -> Option<&'a CartItem> {
        self.groups[category.index()].first().copied()
    }

    pub fn has(&self, category: Category) -> bool {
        !self.groups[category.index()].is_empty()
    }

    /// Non-empty groups in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[&'a CartItem])> + '_ {
        Category::ALL
            .iter()
            .map(move |c| (*c, self.items(*c)))
            .filter(|(_, items)| !items.is_empty())
    }
}
