//! JSON Schema (draft 7) documents for the three wire shapes.

use serde_json::{json, Value};

use crate::models::PayloadKind;

const DRAFT_7: &str = "http://json-schema.org/draft-07/schema#";

fn message_properties(strict: bool) -> Value {
    json!({
        "type": "object",
        "required": ["role", "content", "timestamp"],
        "properties": {
            "role": { "type": "string" },
            "content": { "type": "string" },
            // representation depends on the configured timestamp format
            "timestamp": { "type": ["string", "number"] }
        },
        "additionalProperties": !strict
    })
}

fn envelope_properties(history_type: Value, required: &[&str], strict: bool) -> Value {
    json!({
        "type": "object",
        "required": required,
        "properties": {
            "message": { "type": "string" },
            "history": {
                "type": history_type,
                "items": message_properties(strict)
            },
            "thread_id": { "type": ["string", "null"] }
        },
        "additionalProperties": !strict
    })
}

pub fn schema_for(kind: PayloadKind, strict: bool) -> Value {
    let (title, mut schema) = match kind {
        PayloadKind::Message => ("ChatMessage", message_properties(strict)),
        // absent and null history both mean "no prior context"
        PayloadKind::Request => (
            "ChatRequest",
            envelope_properties(json!(["array", "null"]), &["message"], strict),
        ),
        PayloadKind::Response => (
            "ChatResponse",
            envelope_properties(json!("array"), &["message", "history"], strict),
        ),
    };

    if let Value::Object(map) = &mut schema {
        map.insert("$schema".to_string(), json!(DRAFT_7));
        map.insert("title".to_string(), json!(title));
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_requires_history() {
        let schema = schema_for(PayloadKind::Response, false);
        assert_eq!(schema["required"], json!(["message", "history"]));
        assert_eq!(schema["properties"]["history"]["type"], json!("array"));
    }

    #[test]
    fn test_request_history_nullable() {
        let schema = schema_for(PayloadKind::Request, true);
        assert_eq!(schema["required"], json!(["message"]));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(
            schema["properties"]["history"]["items"]["additionalProperties"],
            json!(false)
        );
    }
}
