use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{McpToolSchema, ToolSchemaConverter};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiToolSchema {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: OpenAiFunction,
}

pub struct OpenAi;

impl ToolSchemaConverter for OpenAi {
    type Output = OpenAiToolSchema;

    fn convert(schema: &McpToolSchema) -> Self::Output {
        OpenAiToolSchema {
            tool_type: "function".to_string(),
            function: OpenAiFunction {
                name: schema.name.clone(),
                description: schema.description.clone(),
                parameters: json!({
                    "type": "object",
                    "properties": schema.properties(),
                    "required": schema.required(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conversion_preserves_name_description_properties_and_required() {
        let mcp = McpToolSchema::new(
            "read_file",
            "Read a file",
            json!({
                "type": "object",
                "properties": {"path": {"type": "string"}},
                "required": ["path"],
            }),
        );
        let converted = OpenAi::convert(&mcp);
        assert_eq!(converted.tool_type, "function");
        assert_eq!(converted.function.name, "read_file");
        assert_eq!(converted.function.description, "Read a file");
        assert_eq!(converted.function.parameters["required"], json!(["path"]));
        assert_eq!(
            converted.function.parameters["properties"]["path"]["type"],
            json!("string")
        );
    }

    #[test]
    fn conversion_defaults_required_to_empty_array() {
        let mcp = McpToolSchema::new("noop", "", json!({"type": "object"}));
        let converted = OpenAi::convert(&mcp);
        assert_eq!(converted.function.parameters["required"], json!([]));
    }
}
