use std::fmt;
use thiserror::Error;

use crate::models::PayloadKind;

/// A single problem found in a decoded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending value, empty for the document root.
    pub path: String,
    pub reason: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn root(reason: impl Into<String>) -> Self {
        Self::new("", reason)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.reason)
        } else {
            write!(f, "{}: {}", self.path, self.reason)
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum ChatwireError {
    #[error("malformed {kind}: {}", join_violations(.violations))]
    Malformed {
        kind: PayloadKind,
        violations: Vec<Violation>,
    },

    #[error("cannot encode {kind}: {}", join_violations(.violations))]
    Unencodable {
        kind: PayloadKind,
        violations: Vec<Violation>,
    },

    #[error("thread mismatch: request carried {expected:?}, response carried {found:?}")]
    ThreadMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatwireError {
    pub fn malformed(kind: PayloadKind, violations: Vec<Violation>) -> Self {
        ChatwireError::Malformed { kind, violations }
    }

    /// Violations carried by a `Malformed` or `Unencodable` error.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ChatwireError::Malformed { violations, .. }
            | ChatwireError::Unencodable { violations, .. } => violations,
            _ => &[],
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ChatwireError::Malformed { .. })
    }
}

pub type Result<T> = std::result::Result<T, ChatwireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display_lists_every_violation() {
        let err = ChatwireError::malformed(
            PayloadKind::Response,
            vec![
                Violation::root("\"history\" is a required property"),
                Violation::new("/thread_id", "expected a string"),
            ],
        );
        assert_eq!(
            err.to_string(),
            "malformed chat response: \"history\" is a required property; /thread_id: expected a string"
        );
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_non_malformed_has_no_violations() {
        let err = ChatwireError::Config("bad".to_string());
        assert!(!err.is_malformed());
        assert!(err.violations().is_empty());
    }
}
