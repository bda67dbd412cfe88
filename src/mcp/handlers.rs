//! MCP (Model Context Protocol) route handlers
//!
//! This module implements the Model Context Protocol handlers for the storefront.
//! Tool discovery and invocation are served from the shared [`ModelContext`];
//! `handle_tool_call` is public so tests can drive it without HTTP.

use super::{helpers::*, models::*};
use crate::cart::helpers::{resolve_session_id, with_session_cookie};
use crate::state::SharedState;
use crate::webmcp::{ModelContext, ModelContextClient, ToolError};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

/// Creates routes for MCP-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/", post(handle_mcp).get(handle_mcp_sse))
        .route("/mcp", post(handle_mcp).get(handle_mcp_sse)) // Standard endpoint
        .route("/mcp/", post(handle_mcp).get(handle_mcp_sse)) // Trailing slash safety
        .route("/api/webmcp/debug", get(handle_debug))
}

/// Handle SSE (Server-Sent Events) handshake for GET requests
async fn handle_mcp_sse() -> impl IntoResponse {
    (
        [("content-type", "text/event-stream")],
        "event: endpoint\ndata: /mcp\n\n",
    )
}

/// Endpoint: GET /api/webmcp/debug
/// Registered tools and the full call history.
async fn handle_debug(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.model_context.debug())
}

/// Endpoint: POST /mcp
/// Handles the Model Context Protocol communication for POST requests.
async fn handle_mcp(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Json<JsonRpcRequest>, axum::extract::rejection::JsonRejection>,
) -> axum::response::Response {
    // Parse JSON-RPC Request (POST)
    let req = match body {
        Ok(Json(r)) => r,
        Err(e) => {
            tracing::warn!("JSON Parse Error: {}", e.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(rpc_error(Value::Null, PARSE_ERROR, "Parse error")),
            )
                .into_response();
        }
    };

    let id = req.id.unwrap_or(Value::Null);
    let method_name = req.method.as_str();
    let params = req.params.unwrap_or(Value::Null);

    tracing::info!(method = method_name, id = %id, "MCP Call");

    let (session_id, is_new_session) = resolve_session_id(&headers);

    // Dispatch Method
    let response_body = match method_name {
        "initialize" => rpc_success(id, handle_initialize()),
        "notifications/initialized" => rpc_success(id, json!({})),
        "tools/list" => rpc_success(id, handle_tools_list(&state.model_context)),
        "tools/call" => match serde_json::from_value::<ToolCallParams>(params) {
            Ok(call) => {
                let client = ModelContextClient::new(session_id.clone());
                let context = &state.model_context;
                match handle_tool_call(context, &call.name, call.arguments, &client).await {
                    Ok(result) => rpc_success(id, result),
                    // Invalid input or handler failure
                    Err(e) => rpc_error(id, INVALID_PARAMS, e.to_string()),
                }
            }
            Err(e) => {
                tracing::warn!("Malformed tools/call params: {}", e);
                rpc_error(id, INVALID_PARAMS, format!("Invalid params: {}", e))
            }
        },
        "ping" => rpc_success(id, json!({})), // Optional but good for health checks
        _ => {
            tracing::warn!("Unknown method: {}", method_name);
            rpc_error(id, METHOD_NOT_FOUND, "Method not found")
        }
    };

    with_session_cookie(
        Json(response_body).into_response(),
        &session_id,
        is_new_session,
    )
}

// =============================================================================
// MCP Method Handlers
// =============================================================================

/// Handles `initialize` request (Handshake).
fn handle_initialize() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": true }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

/// Handles `tools/list` request.
fn handle_tools_list(context: &ModelContext) -> Value {
    let tools: Vec<Value> = context
        .tools()
        .into_iter()
        .map(|registered| {
            let tool = registered.descriptor;
            let mut entry = json!({
                "name": tool.name,
                "description": tool.description,
                // MCP clients require a schema; default to an open object.
                "inputSchema": tool
                    .input_schema
                    .map(|s| s.to_value())
                    .unwrap_or_else(|| json!({ "type": "object" })),
            });
            if let Some(annotations) = tool.annotations {
                entry["annotations"] = json!(annotations);
            }
            entry
        })
        .collect();

    json!({ "tools": tools })
}

/// Handles `tools/call` request (Business Logic).
pub async fn handle_tool_call(
    context: &ModelContext,
    name: &str,
    arguments: Option<Value>,
    client: &ModelContextClient,
) -> Result<Value, ToolError> {
    let input = arguments.unwrap_or_else(|| json!({}));
    let response = context.execute(name, input, client).await?;
    Ok(serde_json::to_value(response)?)
}
