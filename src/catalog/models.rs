//! Catalog Domain Models
//!
//! Products are owned by the catalog; carts and tools only hold copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Catalog Domain Models
// =============================================================================

/// A product offered by the storefront
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Long-form description, searched alongside the name
    pub description: String,

    /// Unit price, never negative
    pub price: f64,

    /// Image URL
    pub image: String,

    /// Category label, matched exactly when filtering
    pub category: String,

    /// Whether the product can currently be bought
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_in_stock() -> bool {
    true
}

/// Filter applied by [`super::CatalogStore::search`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Keyword matched case-insensitively against name and description
    #[serde(default, rename = "q")]
    pub query: Option<String>,

    /// Exact category label
    #[serde(default)]
    pub category: Option<String>,

    /// Maximum number of results
    #[serde(skip)]
    pub limit: Option<usize>,
}

impl ProductQuery {
    pub fn keyword(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The keyword with surrounding whitespace removed, or `None` when blank.
    pub fn normalized_query(&self) -> Option<&str> {
        non_blank(self.query.as_deref())
    }

    /// The category with surrounding whitespace removed, or `None` when blank.
    pub fn normalized_category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Failures of the catalog backing store
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}
