use crate::{Role, ToolCallRequest};
use serde::{Deserialize, Deserializer, Serialize};

/// Content accepted when building a [`Message`]: either a plain string, or a
/// sequence of strings to be concatenated in order with no separator.
/// Some callers (templating helpers, tool output assembled line-by-line)
/// produce the fragments rather than joining them first.
#[derive(Debug, Clone)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<String>),
}

impl MessageContent {
    fn normalize(self) -> String {
        match self {
            MessageContent::Text(s) => s,
            MessageContent::Parts(parts) => parts.concat(),
        }
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Text(s)
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}

impl From<Vec<String>> for MessageContent {
    fn from(parts: Vec<String>) -> Self {
        MessageContent::Parts(parts)
    }
}

fn deserialize_content<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Text(String),
        Parts(Vec<String>),
    }
    Ok(match Option::<Wire>::deserialize(deserializer)? {
        Some(Wire::Text(s)) => s,
        Some(Wire::Parts(parts)) => parts.concat(),
        None => String::new(),
    })
}

/// One entry in the transcript exchanged with the completion endpoint.
///
/// `tool_calls` is only ever populated on an `assistant` message; `tool_call_id`
/// is only ever populated on a `tool` message. Both default away on
/// serialization so plain user/assistant turns stay terse on the wire.
///
/// `content` deserializes from either a plain string or a sequence of
/// strings (concatenated with no separator) but always serializes back out
/// as a plain string, since every completion endpoint this talks to expects
/// that shape on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self {
            role: Role::User,
            content: content.into().normalize(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self {
            role: Role::System,
            content: content.into().normalize(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<MessageContent>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into().normalize(),
            tool_calls,
            tool_call_id: None,
        }
    }

    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<MessageContent>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into().normalize(),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_concatenate_string_parts_with_no_separator() {
        let msg = Message::user(vec!["Hello, ".to_string(), "world!".to_string()]);
        assert_eq!(msg.content, "Hello, world!");
    }

    #[test]
    fn deserializes_content_given_as_a_plain_string() {
        let msg: Message = serde_json::from_value(serde_json::json!({
            "role": "user",
            "content": "hi",
        }))
        .unwrap();
        assert_eq!(msg.content, "hi");
    }

    #[test]
    fn deserializes_content_given_as_a_sequence_of_strings() {
        let msg: Message = serde_json::from_value(serde_json::json!({
            "role": "user",
            "content": ["part one, ", "part two"],
        }))
        .unwrap();
        assert_eq!(msg.content, "part one, part two");
    }
}
