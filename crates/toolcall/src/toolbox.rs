//! Toolbox
//!
//! An immutable collection of tools bound to one turn, plus the
//! tool-selection policy and the model round-trip limit. A toolbox is
//! created per request and shared read-only; policy changes produce a
//! new toolbox rather than mutating one in flight.

use std::collections::HashMap;
use std::sync::Arc;

use toolcall_core::content::MultimodalContent;
use toolcall_core::context::{ToolRequest, ToolRequests, ToolResponse};
use toolcall_core::error::{Error, Result};
use toolcall_core::invocation::ToolSelection;
use toolcall_core::tool::{Tool, ToolFailure, ToolSpecification};

/// First-turn tool suggestion policy
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ToolSuggestion {
    /// No suggestion; tools are optional from the start
    #[default]
    None,

    /// Require that some tool is used on the first round-trip
    Any,

    /// Require a specific tool on the first round-trip, if available
    Tool(String),
}

/// The bound set of tools + policy available to one turn
pub struct Toolbox {
    /// Insertion order drives `available_tools` ordering
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
    suggestion: ToolSuggestion,
    repeated_calls_limit: u32,
}

impl Toolbox {
    /// Default number of model round-trips allowed before tools are cut off
    pub const DEFAULT_REPEATED_CALLS_LIMIT: u32 = 1;

    /// Create a toolbox from the given tools
    ///
    /// Duplicate tool names are rejected: silent shadowing turns a wiring
    /// mistake into wrong model behavior at runtime.
    pub fn of(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Result<Self> {
        let tools: Vec<Arc<dyn Tool>> = tools.into_iter().collect();
        let mut index = HashMap::with_capacity(tools.len());

        for (position, tool) in tools.iter().enumerate() {
            let name = tool.name();
            if index.insert(name.clone(), position).is_some() {
                return Err(Error::DuplicateTool(name));
            }
        }

        Ok(Self {
            tools,
            index,
            suggestion: ToolSuggestion::None,
            repeated_calls_limit: Self::DEFAULT_REPEATED_CALLS_LIMIT,
        })
    }

    /// Create an empty toolbox
    pub fn empty() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
            suggestion: ToolSuggestion::None,
            repeated_calls_limit: Self::DEFAULT_REPEATED_CALLS_LIMIT,
        }
    }

    /// Set the first-turn suggestion policy
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: ToolSuggestion) -> Self {
        self.suggestion = suggestion;
        self
    }

    /// Set the model round-trip limit (clamped to at least 1)
    ///
    /// The limit counts model round-trips, not tool calls; one round-trip
    /// may dispatch any number of tool calls concurrently.
    #[must_use]
    pub fn with_repeated_calls_limit(mut self, limit: u32) -> Self {
        self.repeated_calls_limit = limit.max(1);
        self
    }

    /// The configured round-trip limit
    pub fn repeated_calls_limit(&self) -> u32 {
        self.repeated_calls_limit
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&position| &self.tools[position])
    }

    /// Number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Specifications of the currently available tools, in insertion order
    ///
    /// Recomputed on every call: availability is a dynamic predicate and
    /// may change between round-trips.
    pub fn available_tools(&self) -> Vec<ToolSpecification> {
        self.tools
            .iter()
            .filter(|tool| tool.available())
            .map(|tool| tool.specification())
            .collect()
    }

    /// The tool selection to send on the given model round-trip
    pub fn tool_selection(&self, recursion_level: u32) -> ToolSelection {
        if recursion_level >= self.repeated_calls_limit {
            // Past the limit the model must produce a final textual answer
            return ToolSelection::None;
        }
        if recursion_level != 0 {
            return ToolSelection::Auto;
        }
        match &self.suggestion {
            ToolSuggestion::None => ToolSelection::Auto,
            ToolSuggestion::Any => ToolSelection::Required,
            ToolSuggestion::Tool(name) => match self.get(name) {
                Some(tool) if tool.available() => ToolSelection::Specific(tool.specification()),
                _ => ToolSelection::Auto,
            },
        }
    }

    /// Execute every request in the batch concurrently
    ///
    /// Responses come back in request order regardless of completion
    /// order. An undeclared tool failure aborts the whole batch.
    pub async fn respond_all(&self, requests: &ToolRequests) -> Result<Vec<ToolResponse>> {
        futures::future::try_join_all(requests.requests.iter().map(|request| self.respond(request)))
            .await
    }

    /// Execute a single tool request
    ///
    /// Unknown tools and declared domain failures produce error-flagged
    /// responses so the model can recover; only undeclared failures
    /// return `Err` and abort the turn.
    pub async fn respond(&self, request: &ToolRequest) -> Result<ToolResponse> {
        let Some(tool) = self.get(&request.tool) else {
            tracing::error!(tool = %request.tool, "requested tool is not registered");
            return Ok(ToolResponse {
                identifier: request.identifier.clone(),
                tool: request.tool.clone(),
                content: MultimodalContent::text("ERROR"),
                error: true,
                direct: false,
            });
        };

        tracing::debug!(tool = %request.tool, identifier = %request.identifier, "executing tool");

        match tool.call(request.arguments.clone()).await {
            Ok(content) => Ok(ToolResponse {
                identifier: request.identifier.clone(),
                tool: request.tool.clone(),
                content,
                error: false,
                direct: tool.requires_direct_result(),
            }),
            Err(failure @ ToolFailure::Domain(_)) => {
                tracing::error!(tool = %request.tool, error = %failure, "tool reported an error");
                Ok(ToolResponse {
                    identifier: request.identifier.clone(),
                    tool: request.tool.clone(),
                    content: tool.format_error(&failure),
                    error: true,
                    direct: false,
                })
            }
            Err(ToolFailure::Internal(source)) => Err(Error::ToolFailure {
                tool: request.tool.clone(),
                source,
            }),
        }
    }
}

impl std::fmt::Debug for Toolbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolbox")
            .field("tools", &self.index.keys().collect::<Vec<_>>())
            .field("suggestion", &self.suggestion)
            .field("repeated_calls_limit", &self.repeated_calls_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicBool, Ordering};
    use toolcall_core::tool::{FnTool, ToolSpecification};

    fn echo_tool(name: &str) -> Arc<dyn Tool> {
        let spec = ToolSpecification::new(name, json!({"type": "object"}));
        Arc::new(FnTool::new(spec, |arguments| {
            Box::pin(async move {
                let text = arguments.get("text").and_then(Value::as_str).unwrap_or("");
                Ok(MultimodalContent::text(text.to_string()))
            })
        }))
    }

    struct Flaky;

    #[async_trait]
    impl Tool for Flaky {
        fn specification(&self) -> ToolSpecification {
            ToolSpecification::new("flaky", json!({"type": "object"}))
        }

        async fn call(
            &self,
            _arguments: Value,
        ) -> std::result::Result<MultimodalContent, ToolFailure> {
            Err(ToolFailure::internal(anyhow::anyhow!("disk on fire")))
        }
    }

    struct Gated {
        open: AtomicBool,
    }

    #[async_trait]
    impl Tool for Gated {
        fn specification(&self) -> ToolSpecification {
            ToolSpecification::new("gated", json!({"type": "object"}))
        }

        fn available(&self) -> bool {
            self.open.load(Ordering::SeqCst)
        }

        async fn call(
            &self,
            _arguments: Value,
        ) -> std::result::Result<MultimodalContent, ToolFailure> {
            Ok(MultimodalContent::text("open"))
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Toolbox::of(vec![echo_tool("echo"), echo_tool("echo")]);
        assert!(matches!(result, Err(Error::DuplicateTool(name)) if name == "echo"));
    }

    #[test]
    fn test_selection_policy_table() {
        let toolbox = Toolbox::of(vec![echo_tool("echo")])
            .unwrap()
            .with_suggestion(ToolSuggestion::Any)
            .with_repeated_calls_limit(2);

        assert_eq!(toolbox.tool_selection(0), ToolSelection::Required);
        assert_eq!(toolbox.tool_selection(1), ToolSelection::Auto);
        assert_eq!(toolbox.tool_selection(2), ToolSelection::None);
        assert_eq!(toolbox.tool_selection(7), ToolSelection::None);
    }

    #[test]
    fn test_specific_suggestion_falls_back_when_unavailable() {
        let gated = Arc::new(Gated {
            open: AtomicBool::new(false),
        });
        let toolbox = Toolbox::of(vec![gated.clone() as Arc<dyn Tool>])
            .unwrap()
            .with_suggestion(ToolSuggestion::Tool("gated".into()));

        assert_eq!(toolbox.tool_selection(0), ToolSelection::Auto);
        assert!(toolbox.available_tools().is_empty());

        gated.open.store(true, Ordering::SeqCst);
        assert!(matches!(
            toolbox.tool_selection(0),
            ToolSelection::Specific(spec) if spec.name == "gated"
        ));
        assert_eq!(toolbox.available_tools().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_fatal() {
        let toolbox = Toolbox::of(vec![echo_tool("echo")]).unwrap();
        let request = ToolRequest::with_identifier("c1", "missing", json!({}));

        let response = toolbox.respond(&request).await.unwrap();
        assert!(response.error);
        assert!(!response.direct);
        assert_eq!(response.content.as_text(), "ERROR");
        assert_eq!(response.identifier, "c1");
    }

    #[tokio::test]
    async fn test_internal_failure_is_fatal() {
        let toolbox = Toolbox::of(vec![Arc::new(Flaky) as Arc<dyn Tool>]).unwrap();
        let batch = ToolRequests::new(vec![ToolRequest::with_identifier("c1", "flaky", json!({}))]);

        let error = toolbox.respond_all(&batch).await.unwrap_err();
        assert!(matches!(error, Error::ToolFailure { tool, .. } if tool == "flaky"));
    }

    #[tokio::test]
    async fn test_respond_all_preserves_request_order() {
        let slow: Arc<dyn Tool> = Arc::new(FnTool::new(
            ToolSpecification::new("slow", json!({"type": "object"})),
            |_| {
                Box::pin(async {
                    tokio::time::sleep(std::time::Duration::from_millis(30)).await;
                    Ok(MultimodalContent::text("slow"))
                })
            },
        ));
        let fast: Arc<dyn Tool> = Arc::new(FnTool::new(
            ToolSpecification::new("fast", json!({"type": "object"})),
            |_| Box::pin(async { Ok(MultimodalContent::text("fast")) }),
        ));

        let toolbox = Toolbox::of(vec![slow, fast]).unwrap();
        let batch = ToolRequests::new(vec![
            ToolRequest::with_identifier("c1", "slow", json!({})),
            ToolRequest::with_identifier("c2", "fast", json!({})),
        ]);

        let responses = toolbox.respond_all(&batch).await.unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].identifier, "c1");
        assert_eq!(responses[1].identifier, "c2");
        assert_eq!(responses[0].content.as_text(), "slow");
    }
}
