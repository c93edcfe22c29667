use serde_json::Value;
use sha2::{Digest, Sha256};

/// Derive a deterministic session id from an MCP server config.
///
/// The config is normalized before hashing so that logically identical
/// configs produce the same id regardless of incidental representation
/// differences: object keys are sorted (via [`normalize`]) and any `env`
/// mapping is flattened into a sorted sequence of `[key, value]` pairs so a
/// map and an equivalent list of pairs hash identically.
pub fn derive_server_id(config: &Value) -> String {
    let normalized = normalize(config);
    let bytes = serde_json::to_vec(&normalized).expect("normalized value always serializes");
    let digest = Sha256::digest(&bytes);
    digest[..8].iter().map(|b| format!("{b:02x}")).collect()
}

fn normalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = Vec::with_capacity(map.len());
            for (k, v) in map {
                if k == "env" {
                    entries.push((k.clone(), normalize_env(v)));
                } else {
                    entries.push((k.clone(), normalize(v)));
                }
            }
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Array(
                entries
                    .into_iter()
                    .map(|(k, v)| Value::Array(vec![Value::String(k), v]))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        other => other.clone(),
    }
}

/// Flatten an `env` value (object or array-of-pairs) into a sorted sequence
/// of two-element `[key, value]` arrays.
fn normalize_env(value: &Value) -> Value {
    let mut pairs: Vec<(String, String)> = match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), v.as_str().unwrap_or_default().to_string()))
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|pair| {
                let pair = pair.as_array()?;
                let key = pair.first()?.as_str()?.to_string();
                let val = pair.get(1)?.as_str().unwrap_or_default().to_string();
                Some((key, val))
            })
            .collect(),
        _ => Vec::new(),
    };
    pairs.sort();
    Value::Array(
        pairs
            .into_iter()
            .map(|(k, v)| Value::Array(vec![Value::String(k), Value::String(v)]))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_match_regardless_of_env_representation() {
        let a = json!({
            "command": "npx",
            "args": ["server"],
            "env": {"FOO": "bar", "BAZ": "qux"},
        });
        let b = json!({
            "command": "npx",
            "args": ["server"],
            "env": [["BAZ", "qux"], ["FOO", "bar"]],
        });
        assert_eq!(derive_server_id(&a), derive_server_id(&b));
    }

    #[test]
    fn ids_differ_for_different_configs() {
        let a = json!({"command": "npx", "args": ["server"]});
        let b = json!({"command": "npx", "args": ["other"]});
        assert_ne!(derive_server_id(&a), derive_server_id(&b));
    }

    #[test]
    fn id_is_sixteen_hex_characters() {
        let id = derive_server_id(&json!({"url": "https://example.com/mcp"}));
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
