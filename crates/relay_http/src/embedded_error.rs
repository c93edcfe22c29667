use serde_json::Value;

/// An error payload found embedded in an otherwise-200 response body.
pub struct EmbeddedError {
    pub status: u16,
    pub message: String,
}

/// Scan a successful response body for an error the provider reported
/// in-band instead of via the HTTP status line.
///
/// Checks `choices[0].error` first, then a top-level `error`. A reported
/// code of 502 is remapped to 429: providers that proxy a rate-limited
/// upstream often mislabel it as a bad gateway.
pub fn find_embedded_error(body: &Value) -> Option<EmbeddedError> {
    let error = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("error"))
        .or_else(|| body.get("error"))?;

    let code = error
        .get("code")
        .and_then(Value::as_u64)
        .map(|c| c as u16)
        .unwrap_or(500);
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("embedded provider error")
        .to_string();

    Some(EmbeddedError {
        status: if code == 502 { 429 } else { code },
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_choice_level_error() {
        let body = json!({"choices": [{"error": {"code": 502, "message": "rate"}}]});
        let found = find_embedded_error(&body).unwrap();
        assert_eq!(found.status, 429);
        assert_eq!(found.message, "rate");
    }

    #[test]
    fn detects_top_level_error() {
        let body = json!({"error": {"code": 500, "message": "boom"}});
        let found = find_embedded_error(&body).unwrap();
        assert_eq!(found.status, 500);
    }

    #[test]
    fn returns_none_for_clean_response() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "hi"}}]});
        assert!(find_embedded_error(&body).is_none());
    }
}
