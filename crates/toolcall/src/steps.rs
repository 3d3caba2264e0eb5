//! Multi-Stage Completion
//!
//! Runs a sequence of steps over one growing context. Each step appends
//! its input, drives the shared loop to completion (tools included), and
//! leaves its completion in the context for the following steps. The
//! last step's content is the overall result.

use toolcall_core::content::MultimodalContent;
use toolcall_core::context::ContextElement;
use toolcall_core::error::{Error, Result};
use toolcall_core::invocation::{ModelInvocation, OutputSelection};

use crate::conversation::ConversationTurn;
use crate::driver::drive;
use crate::toolbox::Toolbox;

/// One stage of a multi-stage completion
#[derive(Clone, Debug)]
pub struct Step {
    /// Per-step instruction; `None` inherits the overall instruction
    pub instruction: Option<String>,

    /// Input appended to the context before this step runs
    pub input: MultimodalContent,
}

impl Step {
    pub fn new(input: impl Into<MultimodalContent>) -> Self {
        Self {
            instruction: None,
            input: input.into(),
        }
    }

    #[must_use]
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }
}

/// Complete every step in order, sharing one context
pub async fn complete_steps(
    model: &dyn ModelInvocation,
    instruction: Option<&str>,
    mut context: Vec<ContextElement>,
    steps: Vec<Step>,
    toolbox: &Toolbox,
) -> Result<ConversationTurn> {
    if steps.is_empty() {
        return Err(Error::Config("at least one step is required".into()));
    }

    let mut content = MultimodalContent::empty();

    for step in steps {
        context.push(ContextElement::input(step.input));
        let step_instruction = step.instruction.as_deref().or(instruction);
        content = drive(
            model,
            step_instruction,
            &mut context,
            toolbox,
            &OutputSelection::Text,
        )
        .await?;
    }

    Ok(ConversationTurn { content, context })
}
