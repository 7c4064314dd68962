use regex::Regex;
use std::env;
use std::sync::OnceLock;

use crate::error::{ChatwireError, Result};

fn env_reference() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern"))
}

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unset variables are left as written.
pub fn expand_env_var_in_string(value: &str) -> String {
    let mut result = value.to_string();

    for cap in env_reference().captures_iter(value) {
        let var_name = &cap[1];
        if let Ok(replacement) = env::var(var_name) {
            result = result.replace(&cap[0], &replacement);
        }
    }

    result
}

/// Parse the boolean spellings accepted in env vars.
pub fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Compile a thread id pattern so that it must match the whole id.
pub fn compile_thread_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
        ChatwireError::Config(format!("invalid thread id pattern '{}': {}", pattern, e))
    })
}
