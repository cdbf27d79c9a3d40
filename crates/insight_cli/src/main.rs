//! Command-line front end for the capture engine.
//!
//! # Responsibility
//! - Parse a capture from an argument or stdin and print the JSON result.
//! - Supply "now" from the system clock unless `--now-ms` pins it.

use clap::Parser;
use insight_core::{CaptureConfig, CaptureService};
use std::io::Read;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Parser)]
#[command(version, about = "Parse a freeform capture into tasks and events", rename_all = "kebab")]
struct Args {
    /// Capture text; read from stdin when omitted.
    text: Option<String>,
    /// Epoch milliseconds treated as "now".
    #[arg(long, value_name = "MS")]
    now_ms: Option<i64>,
    /// Local offset from UTC in minutes, e.g. -300 for UTC-05:00.
    #[arg(long, value_name = "MINUTES", default_value_t = 0, allow_hyphen_values = true)]
    utc_offset_minutes: i32,
    /// Split on `---` dividers and print per-block results.
    #[arg(long)]
    blocks: bool,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("insight: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<String, String> {
    let service = CaptureService::new(CaptureConfig::with_utc_offset_minutes(
        args.utc_offset_minutes,
    ))
    .map_err(|err| err.to_string())?;
    let text = match args.text {
        Some(text) => text,
        None => read_stdin()?,
    };
    let now_ms = match args.now_ms {
        Some(now_ms) => now_ms,
        None => system_now_ms()?,
    };

    let output = if args.blocks {
        let result = service.parse_blocks(&text, now_ms).map_err(|err| err.to_string())?;
        to_json(&result, args.pretty)
    } else {
        let result = service.parse(&text, now_ms).map_err(|err| err.to_string())?;
        to_json(&result, args.pretty)
    };
    output.map_err(|err| format!("failed to serialize result: {err}"))
}

fn read_stdin() -> Result<String, String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|err| format!("failed to read stdin: {err}"))?;
    Ok(text)
}

fn system_now_ms() -> Result<i64, String> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| format!("system clock before unix epoch: {err}"))?;
    i64::try_from(elapsed.as_millis()).map_err(|err| format!("system clock out of range: {err}"))
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
