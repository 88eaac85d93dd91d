//! jsonframer: Turn a JSON document into typed frames
//!
//! Usage:
//!   # Whole document, schema inferred
//!   jsonframer data.json
//!
//!   # Rows under `data`, two projected columns
//!   cat users.json | jsonframer --root data --column username::user-name --column joined:timestamp
//!
//!   # Expression selector, one frame per inner array, long series pivoted to wide
//!   jsonframer --root '$map(result.data, function($d) { $d.points })' --multi --timeseries metrics.json
//!
//!   # Options from a JSON file, flags override it
//!   jsonframer --config framer.json --strict data.json

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use jsonframer::{ColumnSelector, Framer, FrameFormat, FramerOptions};
use std::fs;
use std::io::{self, Read, Write};

#[derive(Parser, Debug)]
#[command(name = "jsonframer")]
#[command(about = "Turn JSON documents into typed frames", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// JSON file holding framer options; flags below take precedence
    #[arg(long)]
    config: Option<String>,

    /// Frame name
    #[arg(long)]
    name: Option<String>,

    /// Root selector: literal path or expression
    #[arg(long)]
    root: Option<String>,

    /// Column to project, as selector[:type[:alias]] (repeatable)
    #[arg(long = "column", value_name = "COLUMN")]
    columns: Vec<ColumnSelector>,

    /// Column type override, as selector[:type[:alias]] (repeatable)
    #[arg(long = "override", value_name = "COLUMN")]
    overrides: Vec<ColumnSelector>,

    /// Pivot long time series frames to wide
    #[arg(long)]
    timeseries: bool,

    /// Fail on values that cannot be converted instead of using null
    #[arg(long)]
    strict: bool,

    /// Emit one frame per inner array when the root is an array of arrays
    #[arg(long)]
    multi: bool,

    /// Print compact instead of pretty JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_writer(io::stderr)
        .try_init()
        .ok();

    let args = Args::parse();
    let options = build_options(&args)?;
    let input = read_input(args.input.as_deref())?;

    let framer = Framer::new(options);
    let output = if args.multi {
        let frames = framer.to_frames(&input).context("Failed to convert JSON to frames")?;
        render(&frames, args.compact)?
    } else {
        let frame = framer.to_frame(&input).context("Failed to convert JSON to a frame")?;
        render(&frame, args.compact)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", output)?;
    stdout.flush()?;
    Ok(())
}

/// Options from `--config`, then overridden by flags
fn build_options(args: &Args) -> Result<FramerOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path))?;
            serde_json::from_str(&text).with_context(|| format!("Failed to parse config {}", path))?
        }
        None => FramerOptions::default(),
    };

    if let Some(name) = &args.name {
        options.frame_name = name.clone();
    }
    if let Some(root) = &args.root {
        options.root_selector = root.clone();
    }
    options.columns.extend(args.columns.iter().cloned());
    options.override_columns.extend(args.overrides.iter().cloned());
    if args.timeseries {
        options.frame_format = FrameFormat::TimeSeries;
    }
    if args.strict {
        options = options.strict();
    }
    Ok(options)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {}", path)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn render<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(text)
}
