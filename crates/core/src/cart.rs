//! Cart value type.
//!
//! A cart is an ordered list of item snapshots with quantities, holding at
//! most one entry per item id. Persistence and change notification live in
//! the storefront; this type only knows how to mutate and (de)serialize
//! itself.
//!
//! The snapshot format is a JSON array of `{"repuesto": item, "cantidad": n}`.

use serde::{Deserialize, Serialize};

use crate::types::{Item, ItemId, Price};

/// One cart line: an item snapshot and a quantity of at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(rename = "repuesto")]
    pub item: Item,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

impl CartEntry {
    /// Price of this line.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.item
            .price
            .amount()
            .saturating_mul(u64::from(self.quantity))
    }
}

/// Ordered cart contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.item.id == id)
    }

    /// Add `quantity` units of `item`. An existing entry for the same id is
    /// incremented in place (its snapshot is kept); otherwise a new entry is
    /// appended. A quantity of 0 counts as 1.
    pub fn add(&mut self, item: Item, quantity: u32) {
        let quantity = quantity.max(1);
        match self.entries.iter_mut().find(|e| e.item.id == item.id) {
            Some(entry) => entry.quantity = entry.quantity.saturating_add(quantity),
            None => self.entries.push(CartEntry { item, quantity }),
        }
    }

    /// Set the quantity of the entry for `id` to `max(1, quantity)`.
    /// Unknown ids are ignored; use [`Cart::remove`] to drop an entry.
    pub fn update_quantity(&mut self, id: &ItemId, quantity: i64) {
        let quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        if let Some(entry) = self.entries.iter_mut().find(|e| &e.item.id == id) {
            entry.quantity = quantity;
        }
    }

    /// Remove the entry for `id`, if present.
    pub fn remove(&mut self, id: &ItemId) {
        self.entries.retain(|e| &e.item.id != id);
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        Price::new(
            self.entries
                .iter()
                .fold(0u64, |acc, e| acc.saturating_add(e.line_total())),
        )
    }

    /// Serialize to the persisted snapshot format.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; in practice this cannot fail for this type.
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a persisted snapshot. Entries with a quantity of 0 are raised to
    /// 1 and duplicate ids are merged, so a hand-edited snapshot still yields
    /// a well-formed cart.
    ///
    /// # Errors
    ///
    /// Returns the parse error for malformed snapshots; callers decide the
    /// fallback.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<CartEntry> = serde_json::from_str(snapshot)?;
        let mut cart = Self::new();
        for entry in entries {
            cart.add(entry.item, entry.quantity);
        }
        Ok(cart)
    }
}
