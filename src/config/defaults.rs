use super::timestamp::TimestampFormat;

pub fn default_timestamp_format() -> TimestampFormat {
    TimestampFormat::Rfc3339
}

pub fn default_naive_as_utc() -> bool {
    false // zone-less timestamps are ambiguous
}

pub fn default_require_echo() -> bool {
    false
}

pub fn default_strict() -> bool {
    false // unknown fields are ignored
}

pub fn default_reject_empty_message() -> bool {
    false
}

pub fn default_pretty() -> bool {
    false
}
