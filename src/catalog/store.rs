//! Catalog Store
//!
//! The query surface consumed by the HTTP API and the storefront tools, plus
//! an in-memory implementation loaded from the seed set or a JSON file.

use super::models::{CatalogError, Product, ProductQuery};
use async_trait::async_trait;
use std::{collections::BTreeSet, path::Path};

/// Read-only product lookups
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Keyword and/or category search, newest products first.
    async fn search(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError>;

    /// Distinct category labels in ascending order.
    async fn categories(&self) -> Result<Vec<String>, CatalogError>;

    /// Looks up one product by id.
    async fn find(&self, id: &str) -> Result<Option<Product>, CatalogError>;
}

/// Catalog held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Catalog populated with the built-in seed products
    pub fn seeded() -> Self {
        Self::new(super::seed::seed_products(chrono::Utc::now()))
    }

    /// Loads a JSON array of products, as written by the `seed` command.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        tracing::info!(count = products.len(), path = %path.display(), "Loaded catalog");
        Ok(Self::new(products))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Case-insensitive substring match on name or description.
fn matches_keyword(product: &Product, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    product.name.to_lowercase().contains(&needle)
        || product.description.to_lowercase().contains(&needle)
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn search(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        let keyword = query.normalized_query();
        let category = query.normalized_category();

        let mut found: Vec<Product> = self
            .products
            .iter()
            .filter(|p| keyword.map_or(true, |k| matches_keyword(p, k)))
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect();

        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = query.limit {
            found.truncate(limit);
        }

        Ok(found)
    }

    async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        let distinct: BTreeSet<&str> = self.products.iter().map(|p| p.category.as_str()).collect();
        Ok(distinct.into_iter().map(str::to_string).collect())
    }

    async fn find(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }
}
