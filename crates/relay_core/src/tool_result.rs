use serde_json::Value;

use crate::Message;

/// Turn whatever shape an MCP server (or a custom tool) returned into the
/// `{role: "tool", tool_call_id, content}` message the completion endpoint
/// expects.
///
/// Three MCP-flavored shapes are recognized on input: a wrapped content
/// list (`{"content": [...]}`), a wrapped content string
/// (`{"content": "..."}`), and a bare content list (`[...]`) emitted by
/// servers that skip the wrapper. Anything else is preserved verbatim as a
/// JSON-encoded string so no information is silently dropped.
#[tracing::instrument(skip(raw))]
pub fn format_tool_result(tool_call_id: impl Into<String> + std::fmt::Debug, raw: &Value) -> Message {
    let content = extract_content(raw);
    tracing::debug!(content_len = content.len(), "formatted tool result");
    Message::tool(tool_call_id, content)
}

fn extract_content(raw: &Value) -> String {
    match raw {
        Value::Object(map) => match map.get("content") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => join_content_items(items),
            Some(other) => other.to_string(),
            None => raw.to_string(),
        },
        Value::Array(items) if items.iter().any(is_content_item) => join_content_items(items),
        other => other.to_string(),
    }
}

fn is_content_item(item: &Value) -> bool {
    matches!(item, Value::Object(map) if map.contains_key("type") || map.contains_key("text"))
}

fn join_content_items(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Object(map) => map
                .get("text")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| item.to_string()),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrapped_content_list_joins_text_items() {
        let raw = json!({"content": [{"type": "text", "text": "contents"}]});
        let msg = format_tool_result("c1", &raw);
        assert_eq!(msg.content, "contents");
        assert_eq!(msg.tool_call_id.as_deref(), Some("c1"));
    }

    #[test]
    fn wrapped_content_string_passes_through() {
        let raw = json!({"content": "plain text"});
        let msg = format_tool_result("c1", &raw);
        assert_eq!(msg.content, "plain text");
    }

    #[test]
    fn unwrapped_content_array_is_not_json_encoded() {
        let raw = json!([{"type": "text", "text": "L1"}, {"type": "text", "text": "L2"}]);
        let msg = format_tool_result("c1", &raw);
        assert_eq!(msg.content, "L1\nL2");
    }

    #[test]
    fn arbitrary_object_is_preserved_as_json_string() {
        let raw = json!({"status": "ok", "count": 3});
        let msg = format_tool_result("c1", &raw);
        assert!(msg.content.contains("\"status\""));
    }
}
