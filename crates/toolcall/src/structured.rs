//! Structured Generation
//!
//! Drives the shared loop with a schema-constrained output selection and
//! decodes the final content into a typed value. Decoding happens only
//! once all recursion has finished; tool-call turns are never decoded.

use serde::de::DeserializeOwned;
use serde_json::Value;

use toolcall_core::context::ContextElement;
use toolcall_core::error::{Error, Result};
use toolcall_core::invocation::{ModelInvocation, OutputSelection};

use crate::driver::drive;
use crate::toolbox::Toolbox;

/// A decoded structured result plus the context that produced it
#[derive(Clone, Debug)]
pub struct Generated<T> {
    pub value: T,
    pub context: Vec<ContextElement>,
}

/// Generate a typed value conforming to `schema`
pub async fn generate<T: DeserializeOwned>(
    model: &dyn ModelInvocation,
    instruction: Option<&str>,
    mut context: Vec<ContextElement>,
    toolbox: &Toolbox,
    schema: Value,
) -> Result<Generated<T>> {
    let content = drive(
        model,
        instruction,
        &mut context,
        toolbox,
        &OutputSelection::Schema(schema),
    )
    .await?;

    let value = serde_json::from_str(&content.as_text())
        .map_err(|e| Error::Decode(format!("structured output did not match schema: {e}")))?;

    Ok(Generated { value, context })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use toolcall_core::mock::MockModel;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        name: String,
        age: u32,
    }

    fn person_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"}
            },
            "required": ["name", "age"]
        })
    }

    #[tokio::test]
    async fn test_decodes_final_completion() {
        let mock = MockModel::new();
        mock.queue_completion(r#"{"name": "Alice", "age": 30}"#);

        let generated: Generated<Person> = generate(
            &mock,
            Some("produce a person"),
            vec![ContextElement::input("alice, thirty")],
            &Toolbox::empty(),
            person_schema(),
        )
        .await
        .unwrap();

        assert_eq!(
            generated.value,
            Person {
                name: "Alice".into(),
                age: 30
            }
        );

        let recorded = mock.recorded();
        assert!(matches!(recorded[0].output, OutputSelection::Schema(_)));
    }

    #[tokio::test]
    async fn test_malformed_output_is_a_decode_error() {
        let mock = MockModel::new();
        mock.queue_completion("not json at all");

        let result: Result<Generated<Person>> = generate(
            &mock,
            None,
            Vec::new(),
            &Toolbox::empty(),
            person_schema(),
        )
        .await;

        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
