//! Conversion between the configured timestamp wire encodings and `DateTime<Utc>`.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{json, Value};

use crate::config::TimestampFormat;

const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// The form typed models serialize to.
pub fn canonical(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Fails when `ts` carries more precision than `format` can hold.
pub fn encode(ts: &DateTime<Utc>, format: TimestampFormat) -> Result<Value, String> {
    let nanos = ts.timestamp_subsec_nanos();
    match format {
        TimestampFormat::Rfc3339 => Ok(Value::String(canonical(ts))),
        TimestampFormat::HttpDate if nanos != 0 => Err(too_precise(ts, format)),
        TimestampFormat::HttpDate => Ok(Value::String(
            ts.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        )),
        TimestampFormat::UnixSeconds if nanos == 0 => Ok(json!(ts.timestamp())),
        TimestampFormat::UnixSeconds => {
            let value = json!(ts.timestamp() as f64 + f64::from(nanos) / 1e9);
            // an f64 near the current epoch keeps roughly microsecond precision
            match decode_unix_seconds(&value) {
                Ok(back) if back == *ts => Ok(value),
                _ => Err(too_precise(ts, format)),
            }
        }
        TimestampFormat::UnixMillis if nanos % 1_000_000 != 0 => Err(too_precise(ts, format)),
        TimestampFormat::UnixMillis => Ok(json!(ts.timestamp_millis())),
    }
}

fn too_precise(ts: &DateTime<Utc>, format: TimestampFormat) -> String {
    format!(
        "timestamp {} has more precision than {} can carry",
        canonical(ts),
        format
    )
}

pub fn decode(
    value: &Value,
    format: TimestampFormat,
    naive_as_utc: bool,
) -> Result<DateTime<Utc>, String> {
    match format {
        TimestampFormat::Rfc3339 => {
            let text = value
                .as_str()
                .ok_or("expected an RFC 3339 timestamp string")?;
            decode_rfc3339(text, naive_as_utc)
        }
        TimestampFormat::HttpDate => {
            let text = value.as_str().ok_or("expected an HTTP date string")?;
            DateTime::parse_from_rfc2822(text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| format!("invalid HTTP date '{}': {}", text, e))
        }
        TimestampFormat::UnixSeconds => decode_unix_seconds(value),
        TimestampFormat::UnixMillis => {
            let millis = value
                .as_i64()
                .ok_or("expected integer milliseconds since the Unix epoch")?;
            Utc.timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| format!("timestamp {} is out of range", millis))
        }
    }
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
}

fn decode_rfc3339(text: &str, naive_as_utc: bool) -> Result<DateTime<Utc>, String> {
    match DateTime::parse_from_rfc3339(text) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(e) => match parse_naive(text) {
            Some(naive) if naive_as_utc => Ok(Utc.from_utc_datetime(&naive)),
            Some(_) => Err(format!("timestamp '{}' has no timezone offset", text)),
            None => Err(format!("invalid RFC 3339 timestamp '{}': {}", text, e)),
        },
    }
}

fn decode_unix_seconds(value: &Value) -> Result<DateTime<Utc>, String> {
    if let Some(secs) = value.as_i64() {
        return Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| format!("timestamp {} is out of range", secs));
    }

    let float = value
        .as_f64()
        .ok_or("expected seconds since the Unix epoch")?;
    if !float.is_finite() {
        return Err("timestamp is not a finite number".to_string());
    }
    let mut secs = float.floor() as i64;
    let mut nanos = ((float - float.floor()) * 1e9).round() as u32;
    if nanos >= 1_000_000_000 {
        secs += 1;
        nanos -= 1_000_000_000;
    }
    Utc.timestamp_opt(secs, nanos)
        .single()
        .ok_or_else(|| format!("timestamp {} is out of range", float))
}
