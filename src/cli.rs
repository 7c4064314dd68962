use clap::Parser;
use std::path::PathBuf;

use crate::codec::Codec;
use crate::error::{ChatwireError, Result};
use crate::models::{Payload, PayloadKind};

#[derive(Parser, Debug)]
#[command(name = "chatwire")]
#[command(about = "Validate and normalize chat request/response payloads", long_about = None)]
pub struct Args {
    #[arg(
        short = 'k',
        long = "kind",
        value_enum,
        default_value_t = PayloadKind::Request,
        help = "Shape the input is expected to have"
    )]
    pub kind: PayloadKind,

    #[arg(long = "config", help = "Config file to use instead of the default search")]
    pub config: Option<PathBuf>,

    #[arg(
        long = "timestamp-format",
        help = "Timestamp wire format (rfc3339, http_date, unix_seconds, unix_millis)"
    )]
    pub timestamp_format: Option<String>,

    #[arg(long = "strict", help = "Reject fields the contract does not define")]
    pub strict: bool,

    #[arg(long = "pretty", help = "Pretty-print the normalized payload")]
    pub pretty: bool,

    #[arg(
        long = "against",
        help = "Request file the response must correlate with (response kind only)"
    )]
    pub against: Option<PathBuf>,

    #[arg(long = "schema", help = "Print the JSON Schema for --kind and exit")]
    pub schema: bool,

    #[arg(long = "config-init", help = "Write an example config file and exit")]
    pub config_init: bool,

    #[arg(short = 'v', long = "verbose", help = "Log decoding details to stderr")]
    pub verbose: bool,

    #[arg(help = "Payload file (reads stdin when omitted)")]
    pub file: Option<PathBuf>,
}

/// Decode `input` as `kind` and return its canonical encoding.
///
/// `against` is the text of the request a response must correlate with.
pub fn normalize_payload(
    codec: &Codec,
    kind: PayloadKind,
    input: &str,
    against: Option<&str>,
) -> Result<String> {
    let payload = codec.decode_value(kind, input)?;

    if let Some(request_text) = against {
        let Payload::Response(response) = &payload else {
            return Err(ChatwireError::Config(
                "--against only applies to --kind response".to_string(),
            ));
        };
        let request = codec.decode_request(request_text)?;
        codec.check_correlation(&request, response)?;
    }

    codec.encode_payload(&payload)
}
