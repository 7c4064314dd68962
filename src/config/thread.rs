use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ThreadConfig {
    #[serde(default)]
    pub require_echo: Option<bool>,
    #[serde(default)]
    pub id_pattern: Option<String>,
}

/// Constraints on `thread_id` values and on how a response relates to its request.
#[derive(Debug, Clone, Default)]
pub struct ThreadPolicy {
    pub require_echo: bool,
    /// Anchored; a thread id must match as a whole.
    pub id_pattern: Option<Regex>,
}

impl ThreadPolicy {
    pub fn accepts(&self, thread_id: &str) -> bool {
        self.id_pattern
            .as_ref()
            .map_or(true, |re| re.is_match(thread_id))
    }
}
