//! Shopping Cart Domain Module
//!
//! This module contains all shopping cart business logic, including:
//! - Domain models (CartLine, CartView, inputs)
//! - The cart engine and its persistence backends
//! - Per-session cart state
//! - REST API handlers

pub mod engine;
pub mod handlers;
pub mod helpers;
pub mod models;
pub mod state;
pub mod storage;

// Re-export commonly used types for convenience
pub use engine::{CartEngine, STORAGE_KEY};
pub use handlers::routes;
pub use models::{CartLine, CartView};
pub use state::{CartSessions, SessionStore};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
