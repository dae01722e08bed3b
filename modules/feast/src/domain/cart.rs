//! The shopping cart: the session-local list of dish selections awaiting checkout.
//!
//! Nothing here touches the backend. The cart lives as long as the session that owns it
//! and is handed to checkout by `&mut`, which is also what keeps a cart from being
//! submitted twice concurrently.

use rust_decimal::Decimal;
use tracing::debug;

use crate::contract::model::CartItem;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    items: Vec<CartItem>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `item.quantity` units of the item; a zero quantity counts as one.
    /// An entry with the same id has its quantity increased instead of being duplicated.
    pub fn add(&mut self, item: CartItem) {
        let added = item.quantity.max(1);
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(added);
                debug!(id = %existing.id, quantity = existing.quantity, "cart entry incremented");
            }
            None => {
                debug!(id = %item.id, quantity = added, "cart entry added");
                self.items.push(CartItem {
                    quantity: added,
                    ..item
                });
            }
        }
    }

    /// Remove the entry with `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|i| i.id != id);
    }

    /// Set the quantity of an entry; zero removes it. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
            return;
        }
        if let Some(entry) = self.items.iter_mut().find(|i| i.id == id) {
            entry.quantity = quantity;
        }
    }

    pub fn increment(&mut self, id: &str) {
        if let Some(q) = self.quantity_of(id) {
            self.update_quantity(id, q.saturating_add(1));
        }
    }

    /// Decrementing the last unit removes the entry.
    pub fn decrement(&mut self, id: &str) {
        if let Some(q) = self.quantity_of(id) {
            self.update_quantity(id, q - 1);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price × quantity, recomputed on every call.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Number of units across all entries (the navigation badge).
    /// Summed as `u64` so saturated lines cannot overflow the count.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, id: &str) -> Option<u32> {
        self.items.iter().find(|i| i.id == id).map(|i| i.quantity)
    }
}
