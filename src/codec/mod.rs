//! Validating encoder/decoder for the chat wire contract.
//!
//! Decoding runs a document through, in order: JSON parsing, the draft 7
//! schema for its kind, timestamp conversion, role policy, thread id pattern
//! and the empty-message policy. Every problem found in a stage is reported
//! together in one [`ChatwireError::Malformed`].

pub mod schema;
pub mod timestamp;

use jsonschema::{Draft, JSONSchema};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ChatwireError, Result, Violation};
use crate::models::{ChatMessage, ChatRequest, ChatResponse, Payload, PayloadKind};

pub struct Codec {
    config: Config,
    message_schema: JSONSchema,
    request_schema: JSONSchema,
    response_schema: JSONSchema,
}

fn compile(kind: PayloadKind, strict: bool) -> Result<JSONSchema> {
    let document = schema::schema_for(kind, strict);
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&document)
        .map_err(|e| ChatwireError::Config(format!("invalid {} schema: {}", kind, e)))
}

impl Codec {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            message_schema: compile(PayloadKind::Message, config.strict)?,
            request_schema: compile(PayloadKind::Request, config.strict)?,
            response_schema: compile(PayloadKind::Response, config.strict)?,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The JSON Schema documents are checked against.
    pub fn schema(&self, kind: PayloadKind) -> Value {
        schema::schema_for(kind, self.config.strict)
    }

    pub fn decode_message(&self, text: &str) -> Result<ChatMessage> {
        self.decode(PayloadKind::Message, text)
    }

    pub fn decode_request(&self, text: &str) -> Result<ChatRequest> {
        self.decode(PayloadKind::Request, text)
    }

    pub fn decode_response(&self, text: &str) -> Result<ChatResponse> {
        self.decode(PayloadKind::Response, text)
    }

    pub fn decode_value(&self, kind: PayloadKind, text: &str) -> Result<Payload> {
        Ok(match kind {
            PayloadKind::Message => Payload::Message(self.decode_message(text)?),
            PayloadKind::Request => Payload::Request(self.decode_request(text)?),
            PayloadKind::Response => Payload::Response(self.decode_response(text)?),
        })
    }

    pub fn encode_message(&self, message: &ChatMessage) -> Result<String> {
        let mut value = serde_json::to_value(message)?;
        self.rewrite_timestamps(PayloadKind::Message, &mut value, std::slice::from_ref(message))?;
        self.render(PayloadKind::Message, &value)
    }

    pub fn encode_request(&self, request: &ChatRequest) -> Result<String> {
        let mut value = serde_json::to_value(request)?;
        if let Some(history) = &request.history {
            self.rewrite_history(PayloadKind::Request, &mut value, history)?;
        }
        self.render(PayloadKind::Request, &value)
    }

    pub fn encode_response(&self, response: &ChatResponse) -> Result<String> {
        let mut value = serde_json::to_value(response)?;
        self.rewrite_history(PayloadKind::Response, &mut value, &response.history)?;
        self.render(PayloadKind::Response, &value)
    }

    pub fn encode_payload(&self, payload: &Payload) -> Result<String> {
        match payload {
            Payload::Message(m) => self.encode_message(m),
            Payload::Request(r) => self.encode_request(r),
            Payload::Response(r) => self.encode_response(r),
        }
    }

    /// Enforce the configured relationship between a request and its response.
    ///
    /// Without `require_echo` the two thread ids are unrelated.
    pub fn check_correlation(&self, request: &ChatRequest, response: &ChatResponse) -> Result<()> {
        if !self.config.thread.require_echo {
            return Ok(());
        }
        match &request.thread_id {
            Some(expected) if response.thread_id.as_ref() != Some(expected) => {
                warn!(expected = %expected, found = ?response.thread_id, "thread id not echoed");
                Err(ChatwireError::ThreadMismatch {
                    expected: expected.clone(),
                    found: response.thread_id.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    fn schema_of(&self, kind: PayloadKind) -> &JSONSchema {
        match kind {
            PayloadKind::Message => &self.message_schema,
            PayloadKind::Request => &self.request_schema,
            PayloadKind::Response => &self.response_schema,
        }
    }

    fn decode<T: DeserializeOwned>(&self, kind: PayloadKind, text: &str) -> Result<T> {
        let mut value: Value = serde_json::from_str(text).map_err(|e| {
            self.reject(kind, vec![Violation::root(format!("invalid JSON: {}", e))])
        })?;

        let violations = self.check_schema(kind, &value);
        if !violations.is_empty() {
            return Err(self.reject(kind, violations));
        }

        let violations = self.normalize(kind, &mut value);
        if !violations.is_empty() {
            return Err(self.reject(kind, violations));
        }

        let decoded = serde_json::from_value(value)
            .map_err(|e| self.reject(kind, vec![Violation::root(e.to_string())]))?;
        debug!(kind = %kind, bytes = text.len(), "decoded payload");
        Ok(decoded)
    }

    fn reject(&self, kind: PayloadKind, violations: Vec<Violation>) -> ChatwireError {
        warn!(kind = %kind, violations = violations.len(), "rejected payload");
        ChatwireError::malformed(kind, violations)
    }

    fn check_schema(&self, kind: PayloadKind, value: &Value) -> Vec<Violation> {
        match self.schema_of(kind).validate(value) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|e| Violation::new(e.instance_path.to_string(), e.to_string()))
                .collect(),
        }
    }

    /// Rewrites timestamps to their canonical form and applies the value policies.
    /// Assumes the document already passed its schema.
    fn normalize(&self, kind: PayloadKind, value: &mut Value) -> Vec<Violation> {
        let mut violations = Vec::new();
        let Value::Object(root) = value else {
            return vec![Violation::root("expected a JSON object")];
        };

        if kind == PayloadKind::Message {
            self.normalize_message(root, "", &mut violations);
            return violations;
        }

        if let Some(Value::Array(history)) = root.get_mut("history") {
            for (i, item) in history.iter_mut().enumerate() {
                if let Value::Object(message) = item {
                    self.normalize_message(message, &format!("/history/{}", i), &mut violations);
                }
            }
        }

        if let Some(Value::String(thread_id)) = root.get("thread_id") {
            if !self.config.thread.accepts(thread_id) {
                violations.push(Violation::new(
                    "/thread_id",
                    format!("thread id '{}' does not match the configured pattern", thread_id),
                ));
            }
        }

        if self.config.reject_empty_message {
            if let Some(Value::String(message)) = root.get("message") {
                if message.trim().is_empty() {
                    violations.push(Violation::new("/message", "message cannot be empty"));
                }
            }
        }

        violations
    }

    fn normalize_message(
        &self,
        message: &mut Map<String, Value>,
        path: &str,
        violations: &mut Vec<Violation>,
    ) {
        if let Some(raw) = message.get_mut("timestamp") {
            match timestamp::decode(raw, self.config.timestamp_format, self.config.naive_as_utc) {
                Ok(ts) => *raw = Value::String(timestamp::canonical(&ts)),
                Err(reason) => violations.push(Violation::new(format!("{}/timestamp", path), reason)),
            }
        }

        if let Some(Value::String(role)) = message.get("role") {
            if !self.config.roles.permits(role) {
                violations.push(Violation::new(
                    format!("{}/role", path),
                    format!("role '{}' is not allowed", role),
                ));
            }
        }
    }

    fn rewrite_history(
        &self,
        kind: PayloadKind,
        value: &mut Value,
        history: &[ChatMessage],
    ) -> Result<()> {
        if let Some(Value::Array(items)) = value.get_mut("history") {
            self.rewrite_timestamps_in(kind, items, history, "/history/")?;
        }
        Ok(())
    }

    fn rewrite_timestamps(
        &self,
        kind: PayloadKind,
        value: &mut Value,
        messages: &[ChatMessage],
    ) -> Result<()> {
        self.rewrite_timestamps_in(kind, std::slice::from_mut(value), messages, "")
    }

    /// `prefix` is the JSON pointer of the containing array, empty for a lone message.
    fn rewrite_timestamps_in(
        &self,
        kind: PayloadKind,
        items: &mut [Value],
        messages: &[ChatMessage],
        prefix: &str,
    ) -> Result<()> {
        let mut violations = Vec::new();
        for (i, (item, message)) in items.iter_mut().zip(messages).enumerate() {
            let Value::Object(map) = item else {
                continue;
            };
            match timestamp::encode(&message.timestamp, self.config.timestamp_format) {
                Ok(encoded) => {
                    map.insert("timestamp".to_string(), encoded);
                }
                Err(reason) => {
                    let path = if prefix.is_empty() {
                        "/timestamp".to_string()
                    } else {
                        format!("{}{}/timestamp", prefix, i)
                    };
                    violations.push(Violation::new(path, reason));
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            warn!(kind = %kind, violations = violations.len(), "cannot encode payload");
            Err(ChatwireError::Unencodable { kind, violations })
        }
    }

    fn render<T: Serialize>(&self, kind: PayloadKind, value: &T) -> Result<String> {
        let text = if self.config.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        debug!(kind = %kind, bytes = text.len(), "encoded payload");
        Ok(text)
    }
}
