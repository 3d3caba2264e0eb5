//! Model Invocation Port
//!
//! The single abstract operation every vendor adapter implements: send an
//! instruction, context, and the available tools to a model, and get back
//! either a terminal completion or a batch of tool-call requests. Vendor
//! wire formats stay behind this trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::context::{Completion, ContextElement, ToolRequests};
use crate::error::Result;
use crate::tool::ToolSpecification;

/// Per-call instruction to the model about whether/which tool to use
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ToolSelection {
    /// Model decides whether to use tools
    #[default]
    Auto,

    /// Model must use some tool this round
    Required,

    /// Model may not use tools; forces a final textual answer
    None,

    /// Model must use this specific tool
    Specific(ToolSpecification),
}

/// Desired shape of the final result
#[derive(Clone, Debug, Default, PartialEq)]
pub enum OutputSelection {
    /// Free text
    #[default]
    Text,

    /// Any well-formed JSON
    Json,

    /// JSON conforming to a specific schema
    Schema(Value),
}

/// Exactly one of a terminal completion or a batch of tool requests
///
/// Any other shape returned by an adapter is a contract violation.
#[derive(Clone, Debug, PartialEq)]
pub enum InvocationResult {
    Completion(Completion),
    ToolRequests(ToolRequests),
}

/// Strategy trait for model invocation
///
/// Implemented by out-of-scope vendor adapters; the loop works
/// exclusively through this interface. Any error returned here is
/// treated as fatal for the enclosing turn.
#[async_trait]
pub trait ModelInvocation: Send + Sync {
    async fn invoke(
        &self,
        instruction: Option<&str>,
        context: &[ContextElement],
        tools: &[ToolSpecification],
        tool_selection: &ToolSelection,
        output: &OutputSelection,
    ) -> Result<InvocationResult>;
}
