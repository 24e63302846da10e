// src/main.rs
//! GPSU Decode - inspect captured GPS-acquired timestamp fields

use anyhow::{Context, Result};
use clap::Parser;
use gpsu_decode::{
    config::{DecoderConfig, InputEncoding, OutputFormat},
    stream::{self, DecodeSummary, DecodedField},
};
use log::{info, warn};
use std::{path::PathBuf, process::ExitCode};
use tokio::io::BufReader;

#[derive(Debug, Parser)]
#[command(name = "gpsu-decode", version, about = "Decode 16-byte GPSU timestamp fields")]
struct Args {
    /// Fields to decode; reads one field per line from --file or stdin when omitted
    fields: Vec<String>,

    /// Read fields from this file instead of stdin
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// How each field is written: the 16 bytes verbatim, or 32 hex digits
    #[arg(short, long, value_enum)]
    input: Option<InputEncoding>,

    /// Print a timestamp per line, or one JSON object per field
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Use this config file instead of the per-user default
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Persist the effective input/output settings to the config file
    #[arg(long)]
    save_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Command-line settings override the loaded config
    fn apply_to(&self, config: &mut DecoderConfig) {
        if let Some(input) = self.input {
            config.update_input(input);
        }
        if let Some(output) = self.output {
            config.update_output(output);
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => DecoderConfig::get_config_path()?,
    };
    let mut config = DecoderConfig::load_from(&config_path)?;

    let rust_log = std::env::var("RUST_LOG").ok();
    env_logger::Builder::new()
        .parse_filters(&log_filter(
            args.verbose,
            rust_log.as_deref(),
            config.log_level.as_deref(),
        ))
        .init();

    args.apply_to(&mut config);

    if args.save_config {
        config
            .save_to(&config_path)
            .with_context(|| format!("saving config to {}", config_path.display()))?;
        info!("Saved config to {}", config_path.display());
    }

    let summary = if !args.fields.is_empty() {
        decode_args(&args.fields, &config)
    } else if let Some(path) = &args.file {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("opening {}", path.display()))?;
        decode_reader(BufReader::new(file), &config).await?
    } else {
        decode_reader(BufReader::new(tokio::io::stdin()), &config).await?
    };

    if config.output == OutputFormat::Json {
        eprintln!("{}", serde_json::to_string(&summary)?);
    }

    Ok(exit_code(&summary))
}

/// `-v` flags win over RUST_LOG, which wins over the config file
fn log_filter(verbose: u8, rust_log: Option<&str>, config_level: Option<&str>) -> String {
    match verbose {
        0 => rust_log
            .filter(|filters| !filters.is_empty())
            .or(config_level)
            .unwrap_or("warn")
            .to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn exit_code(summary: &DecodeSummary) -> ExitCode {
    if summary.failures() > 0 {
        warn!(
            "{} of {} field(s) failed to decode",
            summary.failures(),
            summary.total()
        );
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn decode_args(fields: &[String], config: &DecoderConfig) -> DecodeSummary {
    let mut summary = DecodeSummary::default();

    for (i, raw) in fields.iter().enumerate() {
        let result = stream::decode_field(raw.as_bytes(), config.input);
        summary.record(&result);
        print_field(&DecodedField::from_result(i + 1, raw.clone(), result), config.output);
    }

    summary
}

async fn decode_reader<R>(reader: R, config: &DecoderConfig) -> Result<DecodeSummary>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let summary = stream::decode_lines(reader, config.input, |field| {
        print_field(&field, config.output)
    })
    .await?;
    Ok(summary)
}

fn print_field(field: &DecodedField, output: OutputFormat) {
    match field.render(output) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!("line {}: failed to render result: {}", field.line, e),
    }
}
