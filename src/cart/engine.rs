//! Cart Engine
//!
//! Owns the lines of a single session's cart. Totals are recomputed on every
//! read, and every mutation writes a full snapshot to the backing storage.
//! Storage failures are logged and swallowed: the in-memory lines stay
//! authoritative for the session.

use super::{
    helpers::merge_lines,
    models::{CartLine, CartView},
    storage::CartStorage,
};
use crate::catalog::Product;
use std::sync::Arc;

/// Fixed storage key holding the serialized line list
pub const STORAGE_KEY: &str = "ecommerce-cart";

pub struct CartEngine {
    lines: Vec<CartLine>,
    storage: Arc<dyn CartStorage>,
}

impl std::fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEngine")
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl CartEngine {
    /// Hydrates a cart from `storage`.
    ///
    /// A missing, malformed or non-sequence snapshot yields an empty cart.
    pub fn load(storage: Arc<dyn CartStorage>) -> Self {
        let lines = read_snapshot(storage.as_ref());
        Self { lines, storage }
    }

    pub fn items(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of `price * quantity` over all lines.
    pub fn total(&self) -> f64 {
        self.lines.iter().fold(0.0, |acc, line| acc + line.subtotal())
    }

    /// Sum of quantities over all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn view(&self) -> CartView {
        CartView {
            items: self.lines.clone(),
            total: self.total(),
            item_count: self.item_count(),
        }
    }

    /// Adds one unit of `product`, appending a line if it is not in the cart yet.
    pub fn add_to_cart(&mut self, product: Product) {
        match self.lines.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(product, 1)),
        }
        self.persist();
    }

    /// Drops the line for `product_id`; absent ids are ignored.
    pub fn remove_from_cart(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product.id != product_id);
        self.persist();
    }

    /// Sets the quantity of an existing line.
    ///
    /// Non-positive quantities remove the line. Never creates a line, and an
    /// absent id leaves both the cart and its snapshot untouched.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        let Some(index) = self.lines.iter().position(|l| l.product.id == product_id) else {
            return;
        };

        if quantity <= 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.persist();
    }

    /// Replaces every line, merging repeated products.
    pub fn replace_lines(&mut self, lines: Vec<CartLine>) {
        let mut merged = Vec::with_capacity(lines.len());
        merge_lines(&mut merged, lines);
        self.lines = merged;
        self.persist();
    }

    pub fn clear_cart(&mut self) {
        self.lines.clear();
        self.persist();
    }

    fn persist(&self) {
        let snapshot = match serde_json::to_string(&self.lines) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize cart snapshot");
                return;
            }
        };

        if let Err(e) = self.storage.save(STORAGE_KEY, &snapshot) {
            tracing::warn!(error = %e, "Failed to persist cart, keeping in-memory state");
        }
    }
}

fn read_snapshot(storage: &dyn CartStorage) -> Vec<CartLine> {
    let raw = match storage.load(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartLine>>(&raw) {
        Ok(stored) => {
            let mut lines = Vec::with_capacity(stored.len());
            merge_lines(&mut lines, stored);
            lines
        }
        Err(e) => {
            tracing::warn!(error = %e, "Stored cart is corrupted, starting empty");
            Vec::new()
        }
    }
}
