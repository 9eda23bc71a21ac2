use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::lock;
use crate::ProtocolError;

/// One line of an inventory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    /// Product name.
    pub product: String,
    /// Units in stock.
    pub quantity: u64,
}

/// Shared product → quantity ledger.
///
/// Each mutation runs as one critical section together with the listing it
/// returns, so concurrent buys can never oversell a product.
#[derive(Debug, Default)]
pub struct Inventory {
    items: Mutex<BTreeMap<String, u64>>,
}

impl Inventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of `product`, creating the entry if needed.
    pub fn increment(
        &self,
        product: &str,
        quantity: u64,
    ) -> Result<Vec<StockEntry>, ProtocolError> {
        let mut items = lock(&self.items);
        let stock = items.get(product).copied().unwrap_or(0);
        let updated = stock.checked_add(quantity).ok_or(ProtocolError::Overflow)?;
        items.insert(product.to_owned(), updated);
        Ok(listing(&items))
    }

    /// Removes `quantity` units of `product`.
    ///
    /// Leaves the inventory untouched if the product is unknown or the stock
    /// is too low.
    pub fn decrement(
        &self,
        product: &str,
        quantity: u64,
    ) -> Result<Vec<StockEntry>, ProtocolError> {
        let mut items = lock(&self.items);
        let stock = items
            .get_mut(product)
            .ok_or_else(|| ProtocolError::UnknownProduct(product.to_owned()))?;
        if *stock < quantity {
            return Err(ProtocolError::InsufficientStock {
                product: product.to_owned(),
                quantity,
            });
        }
        *stock -= quantity;
        Ok(listing(&items))
    }

    /// Returns the current listing, sorted by product name.
    pub fn snapshot(&self) -> Vec<StockEntry> {
        listing(&lock(&self.items))
    }

    /// Current stock of one product.
    pub fn quantity(&self, product: &str) -> Option<u64> {
        lock(&self.items).get(product).copied()
    }
}

fn listing(items: &BTreeMap<String, u64>) -> Vec<StockEntry> {
    items
        .iter()
        .map(|(product, &quantity)| StockEntry {
            product: product.clone(),
            quantity,
        })
        .collect()
}
