//! MCP Protocol Models and Constants
//!
//! JSON-RPC envelopes and constants for the Model Context Protocol endpoint.

use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// MCP Constants
// =============================================================================

/// Server identifier
pub const SERVER_NAME: &str = "storefront-rust";
/// Protocol version for MCP
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 error codes
pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

// =============================================================================
// MCP Protocol Models
// =============================================================================

/// Standard JSON-RPC 2.0 Request envelope
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version (should be "2.0")
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,

    /// Method name to invoke
    pub method: String,

    /// Parameters for the method
    pub params: Option<Value>,

    /// Request identifier
    pub id: Option<Value>,
}

/// Parameters of `tools/call`
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    pub name: String,

    /// Tool input; an absent value is treated as `{}`
    #[serde(default)]
    pub arguments: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_call_params_require_a_name() {
        let call: ToolCallParams = serde_json::from_value(json!({ "name": "get_cart" })).unwrap();
        assert_eq!(call.name, "get_cart");
        assert!(call.arguments.is_none());

        for params in [json!({ "arguments": {} }), json!(null), json!({ "name": 7 })] {
            assert!(serde_json::from_value::<ToolCallParams>(params).is_err());
        }
    }
}
