//! Tool Adapters — each wraps one external capability behind a uniform
//! call/response contract: JSON arguments in, text out.
//!
//! Adapter failures that the workflow treats as data (a missing résumé file,
//! an unreachable page) come back as `Ok` failure strings; `ToolError` is
//! reserved for conditions the caller may want to type-match on.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::llm_client::ToolSpec;

pub mod job_search;
pub mod resume_extractor;
pub mod save_letter;
pub mod scrape;
pub mod web_search;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0} is not configured (missing API key)")]
    MissingApiKey(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),
}

/// A capability the model can invoke through function calling.
///
/// Implementations are stateless apart from configuration captured at
/// construction (API keys, staging directory).
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name advertised to the model; must be unique within a tool set.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON Schema of the argument object.
    fn parameter_schema(&self) -> Value;

    async fn execute(&self, arguments: Value) -> Result<String, ToolError>;
}

/// The tools bound to one agent invocation, keyed by name.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: HashMap<&'static str, Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        let mut map = HashMap::with_capacity(tools.len());
        for tool in tools {
            map.insert(tool.name(), tool);
        }
        Self { tools: map }
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Function definitions for the chat-completions request.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .values()
            .map(|tool| {
                ToolSpec::function(tool.name(), tool.description(), tool.parameter_schema())
            })
            .collect()
    }

    /// Executes one requested call. Every failure is rendered as text — the
    /// result always goes back to the model, never up the call stack.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> String {
        let Some(tool) = self.tools.get(name) else {
            tracing::warn!("tool not found: {name}");
            return format!("Unknown tool: {name}");
        };
        match tool.execute(arguments).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("tool {name} failed: {e}");
                format!("Tool {name} failed: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echoes the input back"
        }

        fn parameter_schema(&self) -> Value {
            json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }

        async fn execute(&self, arguments: Value) -> Result<String, ToolError> {
            Ok(arguments["text"].as_str().unwrap_or_default().to_string())
        }
    }

    #[tokio::test]
    async fn test_dispatch_runs_known_tool() {
        let set = ToolSet::new(vec![Arc::new(EchoTool)]);
        let out = set.dispatch("echo", json!({"text": "hi"})).await;
        assert_eq!(out, "hi");
    }

    #[tokio::test]
    async fn test_dispatch_reports_unknown_tool_as_text() {
        let set = ToolSet::new(vec![Arc::new(EchoTool)]);
        let out = set.dispatch("missing", json!({})).await;
        assert!(out.contains("Unknown tool"));
    }

    #[test]
    fn test_specs_cover_all_tools() {
        let set = ToolSet::new(vec![Arc::new(EchoTool)]);
        let specs = set.specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].function.name, "echo");
    }
}
