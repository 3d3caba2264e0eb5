//! Shared Loop Driver
//!
//! One iteration shape, four call sites: conversation completion,
//! structured generation, choice selection, and multi-stage completion
//! all drive the same invoke → dispatch → continue/stop machine.

use toolcall_core::content::MultimodalContent;
use toolcall_core::context::ContextElement;
use toolcall_core::error::{Error, Result};
use toolcall_core::invocation::{InvocationResult, ModelInvocation, OutputSelection};

use crate::toolbox::Toolbox;

/// Drive repeated model invocation + tool dispatch until termination
///
/// Appends every produced element to `context` and returns the final
/// content. Terminates on a completion, on a direct tool result (the
/// concatenation of all direct-flagged responses in batch order), or
/// with [`Error::LimitExceeded`] once the model has kept requesting
/// tools past the toolbox's round-trip limit. Adapters are expected to
/// honor a `None` tool selection on the final round-trip, but this loop
/// does not rely on it.
pub(crate) async fn drive(
    model: &dyn ModelInvocation,
    instruction: Option<&str>,
    context: &mut Vec<ContextElement>,
    toolbox: &Toolbox,
    output: &OutputSelection,
) -> Result<MultimodalContent> {
    let mut recursion_level: u32 = 0;

    while recursion_level <= toolbox.repeated_calls_limit() {
        let tools = toolbox.available_tools();
        let selection = toolbox.tool_selection(recursion_level);

        match model
            .invoke(instruction, context, &tools, &selection, output)
            .await?
        {
            InvocationResult::Completion(completion) => {
                tracing::debug!(level = recursion_level, "turn completed");
                let content = completion.content.clone();
                context.push(ContextElement::Completion(completion));
                return Ok(content);
            }
            InvocationResult::ToolRequests(requests) => {
                tracing::debug!(
                    level = recursion_level,
                    count = requests.requests.len(),
                    "dispatching tool requests"
                );
                context.push(ContextElement::ToolRequests(requests.clone()));

                let responses = toolbox.respond_all(&requests).await?;

                if responses.iter().any(|response| response.direct) {
                    // A direct result ends the turn even if the same batch
                    // also produced ordinary responses.
                    let content = MultimodalContent::joined(
                        responses
                            .iter()
                            .filter(|response| response.direct)
                            .map(|response| response.content.clone()),
                    );
                    context.extend(responses.into_iter().map(ContextElement::ToolResponse));
                    return Ok(content);
                }

                context.extend(responses.into_iter().map(ContextElement::ToolResponse));
                recursion_level += 1;
            }
        }
    }

    Err(Error::LimitExceeded(toolbox.repeated_calls_limit()))
}
