//! Product Catalog Module
//!
//! This module contains the product catalog, including:
//! - Domain models (Product, ProductQuery)
//! - The catalog store trait and its in-memory implementation
//! - Seed data
//! - REST API handlers

pub mod handlers;
pub mod models;
pub mod seed;
pub mod store;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use models::{CatalogError, Product, ProductQuery};
pub use store::{CatalogStore, InMemoryCatalog};
