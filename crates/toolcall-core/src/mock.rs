//! Mock model for testing
//!
//! [`MockModel`] is a queue-based fake that lets tests control exactly
//! what the invocation port returns, without touching the network. Push
//! results with [`queue_completion`](MockModel::queue_completion) /
//! [`queue_tool_requests`](MockModel::queue_tool_requests); each `invoke`
//! pops from the front of the script and records its arguments for later
//! assertion via [`recorded`](MockModel::recorded).
//!
//! # Panics
//!
//! `invoke` panics if the script is empty — a test that under-scripts its
//! model is a broken test.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::content::MultimodalContent;
use crate::context::{Completion, ContextElement, ToolRequest, ToolRequests};
use crate::error::{Error, Result};
use crate::invocation::{InvocationResult, ModelInvocation, OutputSelection, ToolSelection};
use crate::tool::ToolSpecification;

/// One recorded `invoke` call
#[derive(Clone, Debug)]
pub struct RecordedInvocation {
    pub instruction: Option<String>,
    pub context: Vec<ContextElement>,
    pub tools: Vec<String>,
    pub tool_selection: ToolSelection,
    pub output: OutputSelection,
}

/// Cloneable failure for scripting; converted to [`Error`] at dequeue time
#[derive(Clone, Debug)]
pub struct MockFailure(pub String);

/// A queue-based mock invocation port for unit and integration tests
#[derive(Default)]
pub struct MockModel {
    script: Mutex<VecDeque<std::result::Result<InvocationResult, MockFailure>>>,
    calls: Mutex<Vec<RecordedInvocation>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a terminal completion with the given content
    pub fn queue_completion(&self, content: impl Into<MultimodalContent>) {
        self.queue_result(InvocationResult::Completion(Completion::new(content)));
    }

    /// Queue a batch of tool requests
    pub fn queue_tool_requests(&self, requests: Vec<ToolRequest>) {
        self.queue_result(InvocationResult::ToolRequests(ToolRequests::new(requests)));
    }

    /// Queue an arbitrary invocation result
    pub fn queue_result(&self, result: InvocationResult) {
        self.script.lock().unwrap().push_back(Ok(result));
    }

    /// Queue a fatal adapter failure
    pub fn queue_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(MockFailure(message.into())));
    }

    /// All recorded invocations, in call order
    pub fn recorded(&self) -> Vec<RecordedInvocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of invocations performed so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelInvocation for MockModel {
    async fn invoke(
        &self,
        instruction: Option<&str>,
        context: &[ContextElement],
        tools: &[ToolSpecification],
        tool_selection: &ToolSelection,
        output: &OutputSelection,
    ) -> Result<InvocationResult> {
        self.calls.lock().unwrap().push(RecordedInvocation {
            instruction: instruction.map(str::to_string),
            context: context.to_vec(),
            tools: tools.iter().map(|t| t.name.clone()).collect(),
            tool_selection: tool_selection.clone(),
            output: output.clone(),
        });

        let scripted = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("MockModel script exhausted");

        match scripted {
            Ok(result) => Ok(result),
            Err(MockFailure(message)) => Err(Error::Invocation(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_order_and_recording() {
        let mock = MockModel::new();
        mock.queue_completion("first");
        mock.queue_failure("adapter down");

        let result = mock
            .invoke(
                Some("be brief"),
                &[ContextElement::input("hi")],
                &[],
                &ToolSelection::Auto,
                &OutputSelection::Text,
            )
            .await
            .unwrap();
        assert!(matches!(result, InvocationResult::Completion(_)));

        let err = mock
            .invoke(None, &[], &[], &ToolSelection::None, &OutputSelection::Text)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Invocation(_)));

        let recorded = mock.recorded();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].instruction.as_deref(), Some("be brief"));
        assert_eq!(recorded[1].tool_selection, ToolSelection::None);
    }
}
