use anyhow::{Context, Result};
use chatwire::cli::{normalize_payload, Args};
use chatwire::config::{Config, FileConfig};
use chatwire::ui::output::{display_error, display_failure, display_notice};
use chatwire::{ChatwireError, Codec};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(()) => {}
        Err(e) => {
            match e.downcast_ref::<ChatwireError>() {
                Some(err) => display_error(err),
                None => display_failure(&format!("{:#}", e)),
            }
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if args.config_init {
        let path = FileConfig::init_user_config()?;
        display_notice(&format!("Wrote example config to {}", path.display()));
        return Ok(());
    }

    let kind = args.kind;
    let config = Config::from_env_and_args(args)?;
    tracing::debug!(?config, "resolved configuration");
    let codec = Codec::new(config)?;

    if args.schema {
        println!("{}", serde_json::to_string_pretty(&codec.schema(kind))?);
        return Ok(());
    }

    let input = read_input(args.file.as_deref())?;
    let against = match &args.against {
        Some(path) => Some(read_input(Some(path))?),
        None => None,
    };

    println!("{}", normalize_payload(&codec, kind, &input, against.as_deref())?);
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file: {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read payload from stdin")?;
            Ok(buffer)
        }
    }
}
