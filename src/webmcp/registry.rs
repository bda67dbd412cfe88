//! Model Context Registry
//!
//! Holds the callable tool namespace exposed to an external agent.
//!
//! Tools come from two sources that share one namespace:
//!
//! - **base** tools, replaced wholesale by [`ModelContext::provide_context`]
//! - **dynamic** tools, added and removed one at a time
//!
//! A name may live in at most one of the two sets. Every invocation attempt
//! made through [`ModelContext::execute`], including ones rejected by input
//! validation, is appended to the call history.

use super::tool::{ModelContextClient, Tool, ToolDescriptor, ToolError, ToolResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::{
    collections::{BTreeMap, HashSet},
    sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use thiserror::Error;

/// Registration conflicts. A failed operation never changes the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool \"{0}\" is already registered")]
    AlreadyRegistered(String),

    #[error("Tool \"{0}\" already registered as a dynamic tool")]
    DynamicConflict(String),

    #[error("Tool \"{0}\" appears more than once in the provided context")]
    DuplicateInContext(String),

    #[error("Tool \"{0}\" is not registered")]
    NotRegistered(String),
}

/// Argument of [`ModelContext::provide_context`]
#[derive(Debug, Clone, Default)]
pub struct ModelContextOptions {
    pub tools: Vec<Tool>,
}

impl ModelContextOptions {
    pub fn with_tools(tools: Vec<Tool>) -> Self {
        Self { tools }
    }
}

/// Which set a registered tool belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolOrigin {
    Base,
    Dynamic,
}

/// One invocation attempt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub tool: String,
    pub input: Value,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ToolResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredTool {
    #[serde(flatten)]
    pub descriptor: ToolDescriptor,
    pub origin: ToolOrigin,
}

/// Point-in-time snapshot for external inspection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebMcpDebug {
    pub tools: Vec<RegisteredTool>,
    pub call_history: Vec<CallRecord>,
}

#[derive(Default)]
struct ToolSets {
    base: BTreeMap<String, Tool>,
    dynamic: BTreeMap<String, Tool>,
}

impl ToolSets {
    fn get(&self, name: &str) -> Option<&Tool> {
        self.base.get(name).or_else(|| self.dynamic.get(name))
    }

    fn contains(&self, name: &str) -> bool {
        self.base.contains_key(name) || self.dynamic.contains_key(name)
    }
}

/// Tool namespace plus call history, shared behind an `Arc`
#[derive(Default)]
pub struct ModelContext {
    tools: RwLock<ToolSets>,
    history: Mutex<Vec<CallRecord>>,
}

impl ModelContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_tools(&self) -> RwLockReadGuard<'_, ToolSets> {
        self.tools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tools(&self) -> RwLockWriteGuard<'_, ToolSets> {
        self.tools.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_history(&self) -> MutexGuard<'_, Vec<CallRecord>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces every base tool with `options.tools`.
    ///
    /// All-or-nothing: if any incoming name is already a dynamic tool, or
    /// appears twice in `options`, nothing changes. Dynamic tools are never
    /// touched.
    pub fn provide_context(&self, options: ModelContextOptions) -> Result<(), RegistryError> {
        let mut sets = self.write_tools();

        let mut seen = HashSet::new();
        for tool in &options.tools {
            if sets.dynamic.contains_key(&tool.name) {
                return Err(RegistryError::DynamicConflict(tool.name.clone()));
            }
            if !seen.insert(tool.name.as_str()) {
                return Err(RegistryError::DuplicateInContext(tool.name.clone()));
            }
        }

        sets.base = options
            .tools
            .into_iter()
            .map(|tool| (tool.name.clone(), tool))
            .collect();

        tracing::debug!(base_tools = sets.base.len(), "Provided model context");
        Ok(())
    }

    /// Removes every base and dynamic tool. The call history is kept.
    pub fn clear_context(&self) {
        let mut sets = self.write_tools();
        sets.base.clear();
        sets.dynamic.clear();
        tracing::debug!("Cleared model context");
    }

    /// Adds a dynamic tool under a name unused by either set.
    pub fn register_tool(&self, tool: Tool) -> Result<(), RegistryError> {
        let mut sets = self.write_tools();
        if sets.contains(&tool.name) {
            return Err(RegistryError::AlreadyRegistered(tool.name));
        }

        tracing::debug!(tool = %tool.name, "Registered tool");
        sets.dynamic.insert(tool.name.clone(), tool);
        Ok(())
    }

    /// Removes the tool from whichever set holds it.
    pub fn unregister_tool(&self, name: &str) -> Result<(), RegistryError> {
        let mut sets = self.write_tools();
        let removed_base = sets.base.remove(name).is_some();
        let removed_dynamic = sets.dynamic.remove(name).is_some();
        if !removed_base && !removed_dynamic {
            return Err(RegistryError::NotRegistered(name.to_string()));
        }

        tracing::debug!(tool = name, "Unregistered tool");
        Ok(())
    }

    pub fn get_tool(&self, name: &str) -> Option<Tool> {
        self.read_tools().get(name).cloned()
    }

    /// Merged view: base tools, then dynamic tools, each ordered by name.
    pub fn tools(&self) -> Vec<RegisteredTool> {
        let sets = self.read_tools();
        let base = sets.base.values().map(|t| (t, ToolOrigin::Base));
        let dynamic = sets.dynamic.values().map(|t| (t, ToolOrigin::Dynamic));
        base.chain(dynamic)
            .map(|(tool, origin)| RegisteredTool {
                descriptor: tool.descriptor(),
                origin,
            })
            .collect()
    }

    pub fn call_history(&self) -> Vec<CallRecord> {
        self.lock_history().clone()
    }

    pub fn debug(&self) -> WebMcpDebug {
        WebMcpDebug {
            tools: self.tools(),
            call_history: self.call_history(),
        }
    }

    fn record(&self, record: CallRecord) {
        self.lock_history().push(record);
    }

    /// Invokes a registered tool.
    ///
    /// The input is checked against the tool's schema first; a rejected input
    /// is logged and the handler never runs. Handler outcomes are logged and
    /// returned unchanged. Unknown names fail without a history entry.
    pub async fn execute(
        &self,
        name: &str,
        input: Value,
        client: &ModelContextClient,
    ) -> Result<ToolResponse, ToolError> {
        let tool = self
            .get_tool(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let timestamp = Utc::now();

        if let Some(schema) = &tool.input_schema {
            if let Err(err) = schema.validate(&input) {
                tracing::debug!(tool = name, error = %err, "Rejected tool input");
                self.record(CallRecord {
                    tool: tool.name.clone(),
                    input,
                    timestamp,
                    result: None,
                    error: Some(err.to_string()),
                });
                return Err(err.into());
            }
        }

        tracing::debug!(tool = name, session = client.session_id(), "Executing tool");
        let outcome = tool.handler().execute(input.clone(), client).await;

        let mut record = CallRecord {
            tool: tool.name.clone(),
            input,
            timestamp,
            result: None,
            error: None,
        };
        match &outcome {
            Ok(response) => record.result = Some(response.clone()),
            Err(err) => {
                tracing::warn!(tool = name, error = %err, "Tool execution failed");
                record.error = Some(err.to_string());
            }
        }
        self.record(record);

        outcome
    }
}
