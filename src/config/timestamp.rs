use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimestampConfig {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub naive_as_utc: Option<bool>,
}

/// Wire encoding of `ChatMessage::timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    /// `2024-05-01T12:00:00.250Z`
    #[default]
    Rfc3339,
    /// `Wed, 01 May 2024 12:00:00 GMT`
    HttpDate,
    /// Seconds since the Unix epoch, fractional when sub-second.
    UnixSeconds,
    UnixMillis,
}

impl TimestampFormat {
    pub fn name(&self) -> &'static str {
        match self {
            TimestampFormat::Rfc3339 => "rfc3339",
            TimestampFormat::HttpDate => "http_date",
            TimestampFormat::UnixSeconds => "unix_seconds",
            TimestampFormat::UnixMillis => "unix_millis",
        }
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimestampFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "rfc3339" | "iso8601" => Ok(TimestampFormat::Rfc3339),
            "http_date" | "rfc2822" => Ok(TimestampFormat::HttpDate),
            "unix_seconds" | "unix" => Ok(TimestampFormat::UnixSeconds),
            "unix_millis" => Ok(TimestampFormat::UnixMillis),
            other => Err(format!(
                "unknown timestamp format '{}' (expected rfc3339, http_date, unix_seconds or unix_millis)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("ISO8601".parse::<TimestampFormat>(), Ok(TimestampFormat::Rfc3339));
        assert_eq!("http-date".parse::<TimestampFormat>(), Ok(TimestampFormat::HttpDate));
        assert_eq!("unix".parse::<TimestampFormat>(), Ok(TimestampFormat::UnixSeconds));
        assert_eq!("unix_millis".parse::<TimestampFormat>(), Ok(TimestampFormat::UnixMillis));
    }

    #[test]
    fn test_parse_unknown() {
        assert!("epoch-nanos".parse::<TimestampFormat>().is_err());
    }
}
