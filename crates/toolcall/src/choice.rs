//! Multiple-Choice Selection
//!
//! Asks the model to pick exactly one of the given options, optionally
//! after tool use. Built on the shared loop with an enum-constrained
//! schema; the decoded label is validated against the options so a
//! misbehaving adapter cannot smuggle in an unknown answer.

use serde::Deserialize;
use serde_json::json;

use toolcall_core::context::ContextElement;
use toolcall_core::error::{Error, Result};
use toolcall_core::invocation::{ModelInvocation, OutputSelection};

use crate::driver::drive;
use crate::toolbox::Toolbox;

/// The chosen option plus the context that produced it
#[derive(Clone, Debug)]
pub struct Selection {
    /// Index into the options passed to [`select`]
    pub index: usize,

    /// The chosen label
    pub label: String,

    /// The full context after the turn
    pub context: Vec<ContextElement>,
}

#[derive(Deserialize)]
struct ChoiceOutput {
    choice: String,
}

/// Select exactly one of `options`
pub async fn select(
    model: &dyn ModelInvocation,
    instruction: Option<&str>,
    mut context: Vec<ContextElement>,
    options: &[String],
    toolbox: &Toolbox,
) -> Result<Selection> {
    if options.is_empty() {
        return Err(Error::Config("at least one option is required".into()));
    }

    let schema = json!({
        "type": "object",
        "properties": {
            "choice": {"type": "string", "enum": options}
        },
        "required": ["choice"]
    });

    let content = drive(
        model,
        instruction,
        &mut context,
        toolbox,
        &OutputSelection::Schema(schema),
    )
    .await?;

    let decoded: ChoiceOutput = serde_json::from_str(&content.as_text())
        .map_err(|e| Error::Decode(format!("choice output did not match schema: {e}")))?;

    let index = options
        .iter()
        .position(|option| option == &decoded.choice)
        .ok_or_else(|| Error::Decode(format!("'{}' is not one of the options", decoded.choice)))?;

    Ok(Selection {
        index,
        label: decoded.choice,
        context,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolcall_core::mock::MockModel;

    fn options() -> Vec<String> {
        vec!["red".into(), "green".into(), "blue".into()]
    }

    #[tokio::test]
    async fn test_selects_by_label() {
        let mock = MockModel::new();
        mock.queue_completion(r#"{"choice": "green"}"#);

        let selection = select(
            &mock,
            Some("pick the calmest color"),
            Vec::new(),
            &options(),
            &Toolbox::empty(),
        )
        .await
        .unwrap();

        assert_eq!(selection.index, 1);
        assert_eq!(selection.label, "green");
    }

    #[tokio::test]
    async fn test_unknown_label_rejected() {
        let mock = MockModel::new();
        mock.queue_completion(r#"{"choice": "magenta"}"#);

        let result = select(&mock, None, Vec::new(), &options(), &Toolbox::empty()).await;
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn test_empty_options_rejected() {
        let mock = MockModel::new();
        let result = select(&mock, None, Vec::new(), &[], &Toolbox::empty()).await;
        assert!(matches!(result, Err(Error::Config(_))));
        assert_eq!(mock.call_count(), 0);
    }
}
