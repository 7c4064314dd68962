use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PayloadConfig {
    #[serde(default)]
    pub strict: Option<bool>,
    #[serde(default)]
    pub reject_empty_message: Option<bool>,
    #[serde(default)]
    pub pretty: Option<bool>,
}
