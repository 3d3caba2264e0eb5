//! Conversation Completion
//!
//! The plain-text call site over the shared loop: one input turn in,
//! one completed turn out, with the updated context handed back so an
//! external memory layer can persist whichever elements it wants.

use toolcall_core::content::MultimodalContent;
use toolcall_core::context::ContextElement;
use toolcall_core::error::Result;
use toolcall_core::invocation::{ModelInvocation, OutputSelection};

use crate::driver::drive;
use crate::toolbox::Toolbox;

/// A finished conversation turn
#[derive(Clone, Debug)]
pub struct ConversationTurn {
    /// The final content of the turn
    pub content: MultimodalContent,

    /// The full context after the turn, including every tool exchange
    pub context: Vec<ContextElement>,
}

/// Complete a conversation turn, possibly using tools
///
/// `context` holds prior memory plus the new input element; the caller
/// owns persistence of the returned context.
pub async fn converse(
    model: &dyn ModelInvocation,
    instruction: Option<&str>,
    mut context: Vec<ContextElement>,
    toolbox: &Toolbox,
) -> Result<ConversationTurn> {
    let content = drive(
        model,
        instruction,
        &mut context,
        toolbox,
        &OutputSelection::Text,
    )
    .await?;

    Ok(ConversationTurn { content, context })
}
