//! Tool schema conversion between MCP's `inputSchema` form and the
//! OpenAI-compatible `function` form completion endpoints expect.

pub mod openai;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreErrorKind};

/// A tool as advertised by an MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl McpToolSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// `properties` object from the input schema, empty object when absent.
    pub fn properties(&self) -> Value {
        self.input_schema
            .get("properties")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()))
    }

    /// `required` array from the input schema, empty array when absent.
    pub fn required(&self) -> Vec<String> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check the shape `properties`/`required` above assume: `input_schema`
    /// must be a JSON object, `properties` (if present) an object, and
    /// `required` (if present) an array of strings. A server advertising
    /// anything else is reporting a malformed tool, not a usable one.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.input_schema.is_object() {
            return Err(CoreError::new(CoreErrorKind::InvalidSchema(format!(
                "{}: inputSchema must be a JSON object",
                self.name
            ))));
        }
        if let Some(properties) = self.input_schema.get("properties") {
            if !properties.is_object() {
                return Err(CoreError::new(CoreErrorKind::InvalidSchema(format!(
                    "{}: properties must be an object",
                    self.name
                ))));
            }
        }
        if let Some(required) = self.input_schema.get("required") {
            let valid = required
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string));
            if !valid {
                return Err(CoreError::new(CoreErrorKind::InvalidSchema(format!(
                    "{}: required must be an array of strings",
                    self.name
                ))));
            }
        }
        Ok(())
    }
}

/// Converts an [`McpToolSchema`] into a provider-specific external form.
pub trait ToolSchemaConverter {
    type Output;

    fn convert(schema: &McpToolSchema) -> Self::Output;
}

/// A tool in the provider-agnostic external (OpenAI-compatible) form.
pub type ExternalToolSchema = openai::OpenAiToolSchema;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> McpToolSchema {
        McpToolSchema::new(
            "read_file",
            "Read a file from disk",
            json!({
                "type": "object",
                "properties": {"path": {"type": "string"}},
                "required": ["path"],
            }),
        )
    }

    #[test]
    fn required_defaults_to_empty_when_absent() {
        let schema = McpToolSchema::new("t", "d", json!({"type": "object"}));
        assert!(schema.required().is_empty());
    }

    #[test]
    fn required_is_read_from_input_schema() {
        assert_eq!(sample().required(), vec!["path".to_string()]);
    }

    #[test]
    fn validate_accepts_a_well_formed_schema() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_rejects_a_non_object_input_schema() {
        let schema = McpToolSchema::new("t", "d", json!("not an object"));
        assert!(matches!(
            schema.validate().unwrap_err().kind(),
            CoreErrorKind::InvalidSchema(_)
        ));
    }

    #[test]
    fn validate_rejects_non_string_required_entries() {
        let schema = McpToolSchema::new(
            "t",
            "d",
            json!({"type": "object", "required": ["path", 1]}),
        );
        assert!(matches!(
            schema.validate().unwrap_err().kind(),
            CoreErrorKind::InvalidSchema(_)
        ));
    }
}
