use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const USER: &str = "user";
pub const ASSISTANT: &str = "assistant";
pub const SYSTEM: &str = "system";

/// One turn of a conversation.
///
/// `role` is an open tag. Closing it to a fixed set is a codec policy, see
/// [`crate::config::RolePolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(
        role: impl Into<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            timestamp,
        }
    }

    /// Builds a turn stamped with the current UTC time.
    pub fn now(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(role, content, Utc::now())
    }
}
