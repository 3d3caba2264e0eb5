//! Conversation Context
//!
//! The ordered sequence of elements accumulated over one turn: caller
//! input, model completions, tool-call requests and their responses.
//! Elements live only for the duration of one loop invocation; anything
//! that should outlive the turn is persisted by an external memory layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::MultimodalContent;

/// Caller-provided input opening a turn
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Input {
    /// Input payload
    pub content: MultimodalContent,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Input {
    pub fn new(content: impl Into<MultimodalContent>) -> Self {
        Self {
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// A terminal model output: content only, no further tool requests
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Generated payload
    pub content: MultimodalContent,
}

impl Completion {
    pub fn new(content: impl Into<MultimodalContent>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// A single tool call requested by the model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Unique within one batch; correlates with exactly one response
    pub identifier: String,

    /// Name of the requested tool
    pub tool: String,

    /// Arguments as JSON
    pub arguments: serde_json::Value,
}

impl ToolRequest {
    /// Create a request with a freshly generated identifier
    pub fn new(tool: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            identifier: Uuid::new_v4().to_string(),
            tool: tool.into(),
            arguments,
        }
    }

    /// Create a request with an explicit identifier
    pub fn with_identifier(
        identifier: impl Into<String>,
        tool: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            tool: tool.into(),
            arguments,
        }
    }
}

/// A non-empty batch of tool calls, optionally accompanied by partial content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolRequests {
    /// Partial content the model produced alongside the calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<MultimodalContent>,

    /// The requested calls (non-empty when produced by a well-behaved adapter)
    pub requests: Vec<ToolRequest>,
}

impl ToolRequests {
    pub fn new(requests: Vec<ToolRequest>) -> Self {
        Self {
            completion: None,
            requests,
        }
    }

    pub fn with_completion(mut self, completion: impl Into<MultimodalContent>) -> Self {
        self.completion = Some(completion.into());
        self
    }
}

/// The outcome of executing one tool request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Matches the identifier of the originating request
    pub identifier: String,

    /// Name of the tool that produced this response
    pub tool: String,

    /// Result payload (or formatted error text when `error` is set)
    pub content: MultimodalContent,

    /// Whether the tool failed recoverably
    pub error: bool,

    /// Whether this response ends the turn without another model call
    pub direct: bool,
}

/// One element of the conversation context
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContextElement {
    Input(Input),
    Completion(Completion),
    ToolRequests(ToolRequests),
    ToolResponse(ToolResponse),
}

impl ContextElement {
    /// Create an input element from content
    pub fn input(content: impl Into<MultimodalContent>) -> Self {
        Self::Input(Input::new(content))
    }

    /// Create a completion element from content
    pub fn completion(content: impl Into<MultimodalContent>) -> Self {
        Self::Completion(Completion::new(content))
    }
}
