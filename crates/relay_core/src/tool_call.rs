use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreErrorKind};

/// One function invocation the model asked the agent to perform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub function: ToolCallFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    /// JSON-encoded arguments object. Serialized as `"{}"` rather than
    /// omitted: several completion endpoints reject a missing field here.
    #[serde(default = "empty_arguments")]
    pub arguments: String,
}

fn empty_arguments() -> String {
    "{}".to_string()
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        let arguments = arguments.into();
        Self {
            id: id.into(),
            function: ToolCallFunction {
                name: name.into(),
                arguments: if arguments.is_empty() {
                    empty_arguments()
                } else {
                    arguments
                },
            },
        }
    }
}

/// Parse a tool call's `arguments` string into a JSON object.
///
/// A missing or empty string parses to `{}`. Anything that isn't valid JSON
/// is reported as [`CoreErrorKind::InvalidArguments`] rather than panicking
/// so the caller can turn it into a tool-result error message instead of
/// aborting the turn.
pub fn parse_tool_arguments(raw: &str) -> Result<Value, CoreError> {
    if raw.is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(raw)
        .map_err(|e| CoreError::new(CoreErrorKind::InvalidArguments(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_missing_arguments_parse_to_empty_object() {
        assert_eq!(parse_tool_arguments("").unwrap(), serde_json::json!({}));
    }

    #[test]
    fn valid_json_parses() {
        let parsed = parse_tool_arguments(r#"{"path":"/a"}"#).unwrap();
        assert_eq!(parsed, serde_json::json!({"path": "/a"}));
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = parse_tool_arguments("{not json").unwrap_err();
        assert!(matches!(err.kind(), CoreErrorKind::InvalidArguments(_)));
    }

    #[test]
    fn constructor_defaults_empty_arguments_to_empty_object_literal() {
        let call = ToolCallRequest::new("c1", "read_file", "");
        assert_eq!(call.function.arguments, "{}");
    }
}
