//! Tool definitions
//!
//! A [`Tool`] pairs a name, description and optional input schema with an
//! asynchronous [`ToolHandler`].

use super::schema::{Schema, ValidationError};
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{fmt, future::Future, sync::Arc};
use thiserror::Error;

/// Failure of a tool invocation
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0}")]
    Handler(String),
}

impl ToolError {
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Handler(err.to_string())
    }
}

/// Hints about how a tool behaves
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_hint: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolResponseContent {
    Text { text: String },
}

/// What a tool hands back to the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub content: Vec<ToolResponseContent>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResponse {
    /// `data` serialized as a single text block.
    pub fn ok<T: Serialize + ?Sized>(data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content: vec![ToolResponseContent::Text {
                text: serde_json::to_string(data)?,
            }],
            is_error: false,
        })
    }

    /// An error-flagged response carrying `{"error": message}`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResponseContent::Text {
                text: json!({ "error": message.into() }).to_string(),
            }],
            is_error: true,
        }
    }

    /// Text of the first content block.
    pub fn text(&self) -> Option<&str> {
        self.content.first().map(|c| match c {
            ToolResponseContent::Text { text } => text.as_str(),
        })
    }

    /// First content block parsed back into JSON.
    pub fn json(&self) -> Option<Value> {
        self.text().and_then(|t| serde_json::from_str(t).ok())
    }
}

/// The caller on whose behalf a tool runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelContextClient {
    session_id: String,
}

impl ModelContextClient {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    /// Cart session the calling agent is acting in.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Runs a step that needs the user's attention. There is no UI to
    /// prompt here, so the callback is simply awaited.
    pub async fn request_user_interaction<F, Fut, T>(&self, callback: F) -> T
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
    {
        callback().await
    }
}

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn execute(
        &self,
        input: Value,
        client: &ModelContextClient,
    ) -> Result<ToolResponse, ToolError>;
}

/// Future returned by closure-backed handlers
pub type ToolFuture = BoxFuture<'static, Result<ToolResponse, ToolError>>;

struct FnHandler<F>(F);

#[async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(Value, ModelContextClient) -> ToolFuture + Send + Sync,
{
    async fn execute(
        &self,
        input: Value,
        client: &ModelContextClient,
    ) -> Result<ToolResponse, ToolError> {
        (self.0)(input, client.clone()).await
    }
}

#[derive(Clone)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: Option<Schema>,
    pub annotations: Option<ToolAnnotations>,
    handler: Arc<dyn ToolHandler>,
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .field("annotations", &self.annotations)
            .finish_non_exhaustive()
    }
}

impl Tool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl ToolHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
            annotations: None,
            handler: Arc::new(handler),
        }
    }

    /// Tool backed by a closure returning a boxed future.
    pub fn from_fn<F>(name: impl Into<String>, description: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, ModelContextClient) -> ToolFuture + Send + Sync + 'static,
    {
        Self::new(name, description, FnHandler(f))
    }

    pub fn with_input_schema(mut self, schema: Schema) -> Self {
        self.input_schema = Some(schema);
        self
    }

    pub fn with_annotations(mut self, annotations: ToolAnnotations) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Marks the tool as free of side effects.
    pub fn read_only(self) -> Self {
        self.with_annotations(ToolAnnotations {
            read_only_hint: Some(true),
        })
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
            annotations: self.annotations.clone(),
        }
    }
}

/// Serializable view of a tool, without its handler
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<ToolAnnotations>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;

    #[test]
    fn test_response_wire_format() {
        let ok = ToolResponse::ok(&json!({ "success": true })).unwrap();
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "content": [{ "type": "text", "text": "{\"success\":true}" }] })
        );

        let err = ToolResponse::error("Product not found");
        let wire = serde_json::to_value(&err).unwrap();
        assert_eq!(wire["isError"], true);
        assert_eq!(err.json().unwrap(), json!({ "error": "Product not found" }));
    }

    #[tokio::test]
    async fn test_fn_tool_receives_input_and_client() {
        let tool = Tool::from_fn("echo", "Echo input", |input, client| {
            async move {
                let payload = json!({ "input": input, "session": client.session_id() });
                Ok::<_, ToolError>(ToolResponse::ok(&payload)?)
            }
            .boxed()
        })
        .read_only();

        let client = ModelContextClient::new("s-1");
        let response = tool
            .handler()
            .execute(json!({ "a": 1 }), &client)
            .await
            .unwrap();

        assert_eq!(
            response.json().unwrap(),
            json!({ "input": { "a": 1 }, "session": "s-1" })
        );
        assert_eq!(tool.descriptor().annotations.unwrap().read_only_hint, Some(true));
    }

    #[tokio::test]
    async fn test_request_user_interaction_runs_callback() {
        let client = ModelContextClient::new("s-1");
        let answer = client.request_user_interaction(|| async { 41 + 1 }).await;
        assert_eq!(answer, 42);
    }

    #[test]
    fn test_descriptor_serialization() {
        let tool = Tool::from_fn("noop", "Does nothing", |_, _| {
            async { Ok::<_, ToolError>(ToolResponse::error("never")) }.boxed()
        })
        .with_input_schema(Schema::object().property("id", Schema::string()).required(["id"]));

        let wire = serde_json::to_value(tool.descriptor()).unwrap();
        assert_eq!(wire["inputSchema"]["required"], json!(["id"]));
        assert!(wire.get("annotations").is_none());
    }
}
