use serde::Serialize;
use serde_json::Value;

use super::LlmError;

/// A named JSON Schema the service must constrain its output to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSchema {
    pub name: &'static str,
    pub schema: Value,
}

/// Schema-constrained generation capability.
///
/// `Ok(None)` is the service answering with no value at all, which callers
/// must keep distinct from a value that violates the schema.
pub trait StructuredGenerator {
    fn generate(
        &self,
        system: &str,
        user: &str,
        schema: &OutputSchema,
    ) -> Result<Option<Value>, LlmError>;
}
