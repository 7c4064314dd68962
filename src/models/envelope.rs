use serde::{Deserialize, Serialize};

use super::message::ChatMessage;
use crate::thread::new_thread_id;

/// Outbound call envelope.
///
/// `history` and `thread_id` stay `None` when the caller left them out; an
/// empty history or an empty-string thread id is a different value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<ChatMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            history: None,
            thread_id: None,
        }
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }
}

/// Inbound call result. `history` is always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub history: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl ChatResponse {
    pub fn new(message: impl Into<String>, history: Vec<ChatMessage>) -> Self {
        Self {
            message: message.into(),
            history,
            thread_id: None,
        }
    }

    /// A reply with an empty history and no thread.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(message, Vec::new())
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Copies the request's thread id, if it had one.
    pub fn echo_thread(mut self, request: &ChatRequest) -> Self {
        self.thread_id = request.thread_id.clone();
        self
    }

    /// Gives the response a fresh thread id unless it already carries one.
    pub fn assign_thread(mut self) -> Self {
        if self.thread_id.is_none() {
            self.thread_id = Some(new_thread_id());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_thread_copies_absence() {
        let request = ChatRequest::new("hello");
        let response = ChatResponse::empty("hi").with_thread_id("old").echo_thread(&request);
        assert_eq!(response.thread_id, None);
    }

    #[test]
    fn test_assign_thread_keeps_existing() {
        let response = ChatResponse::empty("hi").with_thread_id("t1").assign_thread();
        assert_eq!(response.thread_id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_assign_thread_fills_missing() {
        let response = ChatResponse::empty("hi").assign_thread();
        let id = response.thread_id.unwrap();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }
}
