use colored::*;

use crate::error::ChatwireError;

/// Print a rejection with one line per violation.
pub fn display_error(err: &ChatwireError) {
    let headline = match err {
        ChatwireError::Malformed { kind, .. } => format!("malformed {}", kind),
        ChatwireError::Unencodable { kind, .. } => format!("cannot encode {}", kind),
        other => other.to_string(),
    };
    eprintln!("{} {}", "Error:".red().bold(), headline);

    for violation in err.violations() {
        let path = if violation.path.is_empty() {
            "(root)".to_string()
        } else {
            violation.path.clone()
        };
        eprintln!("  {} {}", path.yellow(), violation.reason);
    }
}

pub fn display_failure(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

pub fn display_notice(message: &str) {
    eprintln!("{}", message.green());
}
