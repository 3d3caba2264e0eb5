//! Tool Contract
//!
//! A tool is a named, describable, asynchronously callable capability.
//! Tools are constructed once at setup time and shared (not owned) by the
//! toolboxes that reference them; any mutable state lives behind the
//! tool's own synchronization, since one batch may call the same tool
//! concurrently with different arguments.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::content::MultimodalContent;

/// Immutable description of a tool, consumed by the model invocation port
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolSpecification {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to the model)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON-Schema-like description of the arguments
    pub parameters: Value,
}

impl ToolSpecification {
    pub fn new(name: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Failure raised by a tool call
///
/// `Domain` failures are part of the tool's contract: they are formatted
/// into an error-flagged response and the model gets a chance to react.
/// `Internal` failures are undeclared defects and abort the whole turn.
#[derive(Debug, Error)]
pub enum ToolFailure {
    /// Declared, recoverable failure
    #[error("{0}")]
    Domain(String),

    /// Undeclared failure; propagates and aborts the enclosing turn
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ToolFailure {
    /// Create a recoverable domain failure
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    /// Create a fatal internal failure
    pub fn internal(error: impl Into<anyhow::Error>) -> Self {
        Self::Internal(error.into())
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's immutable specification
    fn specification(&self) -> ToolSpecification;

    /// Tool name (shorthand for `specification().name`)
    fn name(&self) -> String {
        self.specification().name
    }

    /// Whether the tool can currently be offered to the model
    ///
    /// Re-evaluated on every model round-trip; availability may change
    /// over time or across recursion levels.
    fn available(&self) -> bool {
        true
    }

    /// Whether a successful result ends the turn without another model call
    fn requires_direct_result(&self) -> bool {
        false
    }

    /// Execute the tool with the given arguments
    async fn call(&self, arguments: Value) -> Result<MultimodalContent, ToolFailure>;

    /// Format a recoverable failure into content shown to the model
    fn format_error(&self, failure: &ToolFailure) -> MultimodalContent {
        MultimodalContent::text(format!("ERROR: {failure}"))
    }
}

/// Boxed future returned by [`FnTool`] closures.
pub type ToolFuture = Pin<Box<dyn Future<Output = Result<MultimodalContent, ToolFailure>> + Send>>;

/// A closure-backed tool
///
/// Convenient for small capabilities and tests, where a full trait
/// implementation is overkill.
pub struct FnTool {
    specification: ToolSpecification,
    direct: bool,
    handler: Arc<dyn Fn(Value) -> ToolFuture + Send + Sync>,
}

impl FnTool {
    pub fn new<F>(specification: ToolSpecification, handler: F) -> Self
    where
        F: Fn(Value) -> ToolFuture + Send + Sync + 'static,
    {
        Self {
            specification,
            direct: false,
            handler: Arc::new(handler),
        }
    }

    /// Mark results of this tool as direct (turn-ending)
    pub fn with_direct_result(mut self) -> Self {
        self.direct = true;
        self
    }
}

#[async_trait]
impl Tool for FnTool {
    fn specification(&self) -> ToolSpecification {
        self.specification.clone()
    }

    fn requires_direct_result(&self) -> bool {
        self.direct
    }

    async fn call(&self, arguments: Value) -> Result<MultimodalContent, ToolFailure> {
        (self.handler)(arguments).await
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.specification.name)
            .field("direct", &self.direct)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_tool() {
        let tool = FnTool::new(
            ToolSpecification::new("upper", serde_json::json!({"type": "object"})),
            |arguments| {
                Box::pin(async move {
                    let text = arguments
                        .get("text")
                        .and_then(Value::as_str)
                        .ok_or_else(|| ToolFailure::domain("missing 'text' argument"))?;
                    Ok(MultimodalContent::text(text.to_uppercase()))
                })
            },
        );

        let ok = tool.call(serde_json::json!({"text": "hi"})).await.unwrap();
        assert_eq!(ok.as_text(), "HI");

        let err = tool.call(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolFailure::Domain(_)));
    }

    #[test]
    fn test_default_error_formatting() {
        struct Noop;

        #[async_trait]
        impl Tool for Noop {
            fn specification(&self) -> ToolSpecification {
                ToolSpecification::new("noop", serde_json::json!({"type": "object"}))
            }

            async fn call(&self, _arguments: Value) -> Result<MultimodalContent, ToolFailure> {
                Ok(MultimodalContent::empty())
            }
        }

        let formatted = Noop.format_error(&ToolFailure::domain("boom"));
        assert_eq!(formatted.as_text(), "ERROR: boom");
    }
}
