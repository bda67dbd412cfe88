//! Model Context Tool Registry
//!
//! This module exposes storefront operations to an external agent, including:
//! - Input schemas and shallow validation
//! - Tool definitions and responses
//! - The model context registry with its call history
//! - The storefront tool set

pub mod registry;
pub mod schema;
pub mod tool;
pub mod tools;

// Re-export commonly used types for convenience
pub use registry::{
    CallRecord, ModelContext, ModelContextOptions, RegisteredTool, RegistryError, ToolOrigin,
    WebMcpDebug,
};
pub use schema::{Schema, SchemaKind, ValidationError};
pub use tool::{
    ModelContextClient, Tool, ToolAnnotations, ToolDescriptor, ToolError, ToolHandler,
    ToolResponse, ToolResponseContent,
};
pub use tools::{register_storefront_tools, storefront_tools, ToolRegistration};
