//! Shopping Cart Domain Models
//!
//! This module contains all data structures related to the shopping cart
//! business domain.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Domain Models
// =============================================================================

/// One product and how many of it are in the cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Snapshot of the product at the time it was added
    pub product: Product,

    /// Always at least 1 while the line is in a cart
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Read-only projection of a cart with its derived totals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total: f64,
    pub item_count: u64,
}

// =============================================================================
// HTTP Inputs
// =============================================================================

/// Body of `POST /api/cart/items`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemInput {
    pub product_id: String,
}

/// Body of `PUT /api/cart/items/:id`
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityInput {
    /// Zero or negative removes the line
    pub quantity: i64,
}

/// One entry of a client cart copy; the product itself comes from the catalog
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncItemInput {
    pub product_id: String,
    pub quantity: u32,
}

/// Body of `POST /api/cart/sync`
#[derive(Debug, Deserialize)]
pub struct SyncCartInput {
    /// Replacement lines; repeated products are merged
    pub items: Vec<SyncItemInput>,
}
