//! Storefront Library
//!
//! This library provides the core functionality for a storefront: a product
//! catalog, session shopping carts, and a model-context tool registry that
//! exposes both to an external agent over MCP.

// Domain modules
pub mod cart;
pub mod catalog;
pub mod mcp;
pub mod webmcp;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;
pub mod state;
