use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RolesConfig {
    #[serde(default)]
    pub allowed: Option<Vec<String>>,
}

/// Which `role` tags a codec accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RolePolicy {
    #[default]
    Open,
    Restricted(Vec<String>),
}

impl RolePolicy {
    /// An empty list leaves the role set open.
    pub fn from_allowed(allowed: Vec<String>) -> Self {
        let allowed: Vec<String> = allowed
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if allowed.is_empty() {
            RolePolicy::Open
        } else {
            RolePolicy::Restricted(allowed)
        }
    }

    pub fn permits(&self, role: &str) -> bool {
        match self {
            RolePolicy::Open => true,
            RolePolicy::Restricted(allowed) => allowed.iter().any(|r| r == role),
        }
    }
}
