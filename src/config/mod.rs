mod defaults;
mod payload;
mod roles;
mod thread;
mod timestamp;
mod validation;

use crate::cli::Args;
use crate::error::{ChatwireError, Result as ChatwireResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use defaults::{
    default_naive_as_utc, default_pretty, default_reject_empty_message, default_require_echo,
    default_strict, default_timestamp_format,
};

pub use payload::PayloadConfig;
pub use roles::{RolePolicy, RolesConfig};
pub use thread::{ThreadConfig, ThreadPolicy};
pub use timestamp::{TimestampConfig, TimestampFormat};
pub use validation::{compile_thread_pattern, expand_env_var_in_string, parse_bool_flag};

/// Example written by `--config-init`.
pub const EXAMPLE_CONFIG: &str = r#"# chatwire configuration
timestamp:
  # rfc3339 | http_date | unix_seconds | unix_millis
  format: rfc3339
  naive_as_utc: false

roles:
  # leave empty to accept any role
  allowed: []

thread:
  require_echo: false
  # id_pattern: "thread_[A-Za-z0-9]+"

payload:
  strict: false
  reject_empty_message: false
  pretty: false
"#;

/// Resolved codec settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub timestamp_format: TimestampFormat,
    pub naive_as_utc: bool,
    pub roles: RolePolicy,
    pub thread: ThreadPolicy,
    /// Reject fields the contract does not define.
    pub strict: bool,
    pub reject_empty_message: bool,
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            naive_as_utc: default_naive_as_utc(),
            roles: RolePolicy::Open,
            thread: ThreadPolicy::default(),
            strict: default_strict(),
            reject_empty_message: default_reject_empty_message(),
            pretty: default_pretty(),
        }
    }
}

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub timestamp: TimestampConfig,
    #[serde(default)]
    pub roles: RolesConfig,
    #[serde(default)]
    pub thread: ThreadConfig,
    #[serde(default)]
    pub payload: PayloadConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        Self::from_args_with_env(args, |name| env::var(name).ok())
    }

    /// Resolve CLI args > `lookup` (environment) > config file > defaults.
    pub fn from_args_with_env<F>(args: &Args, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Explicit --config replaces the search
        let mut file_config = match &args.config {
            Some(path) => FileConfig::load_from(path)?,
            None => FileConfig::load()?,
        };

        file_config.apply_env(lookup);

        // CLI args win over everything else
        if let Some(format) = &args.timestamp_format {
            file_config.timestamp.format = Some(format.clone());
        }
        if args.strict {
            file_config.payload.strict = Some(true);
        }
        if args.pretty {
            file_config.payload.pretty = Some(true);
        }

        Self::from_file_config(&file_config).map_err(Into::into)
    }

    pub fn from_file_config(file_config: &FileConfig) -> ChatwireResult<Self> {
        let timestamp_format = match &file_config.timestamp.format {
            Some(name) => name.parse::<TimestampFormat>().map_err(ChatwireError::Config)?,
            None => default_timestamp_format(),
        };

        let roles = file_config
            .roles
            .allowed
            .clone()
            .map(RolePolicy::from_allowed)
            .unwrap_or_default();

        let id_pattern = file_config
            .thread
            .id_pattern
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(compile_thread_pattern)
            .transpose()?;

        Ok(Config {
            timestamp_format,
            naive_as_utc: file_config
                .timestamp
                .naive_as_utc
                .unwrap_or_else(default_naive_as_utc),
            roles,
            thread: ThreadPolicy {
                require_echo: file_config
                    .thread
                    .require_echo
                    .unwrap_or_else(default_require_echo),
                id_pattern,
            },
            strict: file_config.payload.strict.unwrap_or_else(default_strict),
            reject_empty_message: file_config
                .payload
                .reject_empty_message
                .unwrap_or_else(default_reject_empty_message),
            pretty: file_config.payload.pretty.unwrap_or_else(default_pretty),
        })
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        let mut config: FileConfig = if extension == Some("yaml") || extension == Some("yml") {
            serde_yaml::from_str(&contents).with_context(|| {
                format!("Failed to parse YAML config file: {}", path.display())
            })?
        } else {
            serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse JSON config file: {}", path.display())
            })?
        };

        config.expand_env_vars();
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            // Current directory first (local override)
            PathBuf::from(".chatwire.yaml"),
            PathBuf::from(".chatwire.yml"),
            PathBuf::from(".chatwire.json"),
        ];

        if let Some(config_dir) = Self::user_config_dir() {
            paths.push(config_dir.join("chatwire.yaml"));
            paths.push(config_dir.join("chatwire.yml"));
            paths.push(config_dir.join("chatwire.json"));
        }

        paths
    }

    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("chatwire"))
    }

    /// Write [`EXAMPLE_CONFIG`] into the user config dir unless a file is already there.
    pub fn init_user_config() -> Result<PathBuf> {
        let dir = Self::user_config_dir().context("Could not determine home directory")?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = dir.join("chatwire.yaml");
        if path.exists() {
            anyhow::bail!("Config file already exists: {}", path.display());
        }
        fs::write(&path, EXAMPLE_CONFIG)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }

    /// Overlay `CHATWIRE_*` variables. Unparseable booleans are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| lookup(name).and_then(|v| parse_bool_flag(&v));

        if let Some(format) = lookup("CHATWIRE_TIMESTAMP_FORMAT") {
            self.timestamp.format = Some(format);
        }
        if let Some(naive) = flag("CHATWIRE_NAIVE_AS_UTC") {
            self.timestamp.naive_as_utc = Some(naive);
        }
        if let Some(roles) = lookup("CHATWIRE_ROLES") {
            self.roles.allowed = Some(roles.split(',').map(|r| r.trim().to_string()).collect());
        }
        if let Some(echo) = flag("CHATWIRE_REQUIRE_THREAD_ECHO") {
            self.thread.require_echo = Some(echo);
        }
        if let Some(pattern) = lookup("CHATWIRE_THREAD_ID_PATTERN") {
            self.thread.id_pattern = Some(pattern);
        }
        if let Some(strict) = flag("CHATWIRE_STRICT") {
            self.payload.strict = Some(strict);
        }
        if let Some(reject) = flag("CHATWIRE_REJECT_EMPTY_MESSAGE") {
            self.payload.reject_empty_message = Some(reject);
        }
    }

    fn expand_env_vars(&mut self) {
        if let Some(format) = &mut self.timestamp.format {
            *format = expand_env_var_in_string(format);
        }
        if let Some(pattern) = &mut self.thread.id_pattern {
            *pattern = expand_env_var_in_string(pattern);
        }
        if let Some(allowed) = &mut self.roles.allowed {
            for role in allowed.iter_mut() {
                *role = expand_env_var_in_string(role);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_file_config(&FileConfig::default()).unwrap();
        assert_eq!(config.timestamp_format, TimestampFormat::Rfc3339);
        assert_eq!(config.roles, RolePolicy::Open);
        assert!(!config.naive_as_utc);
        assert!(!config.thread.require_echo);
        assert!(config.thread.id_pattern.is_none());
        assert!(!config.strict);
    }

    #[test]
    fn test_example_config_parses() {
        let file_config: FileConfig = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        let config = Config::from_file_config(&file_config).unwrap();
        assert_eq!(config.roles, RolePolicy::Open);
        assert_eq!(config.timestamp_format, TimestampFormat::Rfc3339);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file_config: FileConfig = serde_yaml::from_str(
            "timestamp:\n  format: rfc3339\npayload:\n  strict: false\n",
        )
        .unwrap();

        let vars: HashMap<&str, &str> = HashMap::from([
            ("CHATWIRE_TIMESTAMP_FORMAT", "unix_millis"),
            ("CHATWIRE_STRICT", "yes"),
            ("CHATWIRE_ROLES", "user, assistant"),
            ("CHATWIRE_REQUIRE_THREAD_ECHO", "sometimes"),
        ]);
        file_config.apply_env(|name| vars.get(name).map(|v| v.to_string()));

        let config = Config::from_file_config(&file_config).unwrap();
        assert_eq!(config.timestamp_format, TimestampFormat::UnixMillis);
        assert!(config.strict);
        assert!(config.roles.permits("assistant"));
        assert!(!config.roles.permits("system"));
        // unparseable flag falls through to the default
        assert!(!config.thread.require_echo);
    }

    #[test]
    fn test_unknown_timestamp_format_is_config_error() {
        let mut file_config = FileConfig::default();
        file_config.timestamp.format = Some("julian".to_string());
        let err = Config::from_file_config(&file_config).unwrap_err();
        assert!(matches!(err, ChatwireError::Config(_)));
    }

    #[test]
    fn test_blank_pattern_is_ignored() {
        let mut file_config = FileConfig::default();
        file_config.thread.id_pattern = Some("  ".to_string());
        let config = Config::from_file_config(&file_config).unwrap();
        assert!(config.thread.id_pattern.is_none());
    }
}
