use serde_json::{Value, json};

pub const METHOD_INITIALIZE: &str = "initialize";
pub const METHOD_INITIALIZED: &str = "notifications/initialized";
pub const METHOD_LIST_TOOLS: &str = "tools/list";
pub const METHOD_CALL_TOOL: &str = "tools/call";

pub const CLIENT_NAME: &str = "relay";
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fresh 8-byte random hex request id, unique enough to correlate one
/// request with its reply on a single connection.
pub fn fresh_request_id() -> String {
    let bytes: [u8; 8] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn initialize_request(id: &str, protocol_version: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": METHOD_INITIALIZE,
        "params": {
            "protocolVersion": protocol_version,
            "capabilities": {"tools": {}},
            "clientInfo": {"name": CLIENT_NAME, "version": CLIENT_VERSION},
        }
    })
}

pub fn initialized_notification() -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": METHOD_INITIALIZED,
    })
}

pub fn list_tools_request(id: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": METHOD_LIST_TOOLS,
        "params": {},
    })
}

pub fn call_tool_request(id: &str, name: &str, arguments: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": METHOD_CALL_TOOL,
        "params": {"name": name, "arguments": arguments},
    })
}

/// Extract `result.isError == true` tool-call failures into a plain message.
///
/// Returns `Ok(result)` for a successful call, `Err(message)` when the
/// server reported `isError: true` on an otherwise well-formed response.
pub fn tool_call_outcome(result: &Value) -> Result<Value, String> {
    if result.get("isError").and_then(Value::as_bool) == Some(true) {
        let message = result
            .get("content")
            .and_then(Value::as_array)
            .and_then(|items| items.iter().find_map(|item| item.get("text")))
            .and_then(Value::as_str)
            .unwrap_or("Tool execution failed")
            .to_string();
        return Err(message);
    }
    Ok(result.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_unique() {
        let a = fresh_request_id();
        let b = fresh_request_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn is_error_true_becomes_message() {
        let result = json!({"isError": true, "content": [{"type": "text", "text": "boom"}]});
        assert_eq!(tool_call_outcome(&result), Err("boom".to_string()));
    }

    #[test]
    fn is_error_absent_passes_through() {
        let result = json!({"content": [{"type": "text", "text": "ok"}]});
        assert_eq!(tool_call_outcome(&result).unwrap(), result);
    }

    #[test]
    fn is_error_true_without_text_uses_default_message() {
        let result = json!({"isError": true, "content": []});
        assert_eq!(
            tool_call_outcome(&result),
            Err("Tool execution failed".to_string())
        );
    }
}
