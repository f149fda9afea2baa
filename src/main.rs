//! Redecard Splitter CLI
//!
//! Splits one or more Rede settlement files into per-merchant files and
//! prints a CSV manifest of everything written.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- -o outputs EEVC_20240101.txt EEVD_20240101.csv > manifest.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info` or `debug` to control logging verbosity

use clap::Parser;
use csv::WriterBuilder;
use log::{info, warn};
use redecard_splitter::{DecodePolicy, Result, SplitConfig, SplitError, SplitOutcome, Splitter};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "redecard-split",
    version,
    about = "Split Rede EEVC/EEVD/EEFI files by merchant establishment"
)]
struct Cli {
    /// Settlement files to split, processed in order
    inputs: Vec<PathBuf>,

    /// Directory receiving the per-merchant files (created if missing)
    #[arg(short = 'o', long = "output-dir", default_value = "outputs")]
    output_dir: PathBuf,

    /// JSON file overriding the built-in record layouts
    #[arg(long = "layout-file")]
    layout_file: Option<PathBuf>,

    /// Fail on invalid UTF-8 instead of replacing bad bytes
    #[arg(long = "strict-utf8")]
    strict_utf8: bool,
}

/// One manifest row.
#[derive(Serialize)]
struct ManifestRow<'a> {
    source: &'a Path,
    format: &'a str,
    merchant: &'a str,
    lines: usize,
    path: &'a Path,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.inputs.is_empty() {
        return Err(SplitError::MissingInput);
    }

    let mut config = match &cli.layout_file {
        Some(path) => SplitConfig::from_json_file(path)?,
        None => SplitConfig::default(),
    };
    if cli.strict_utf8 {
        config.decode = DecodePolicy::Strict;
    }
    let splitter = Splitter::with_config(config);

    let stdout = io::stdout();
    let mut manifest = WriterBuilder::new()
        .has_headers(false)
        .from_writer(stdout.lock());
    manifest.write_record(["source", "format", "merchant", "lines", "path"])?;
    let mut written = 0usize;

    for input in &cli.inputs {
        let outcome = splitter.split_file(input, &cli.output_dir)?;

        match &outcome {
            SplitOutcome::Empty => warn!("{}: empty file skipped", input.display()),
            SplitOutcome::Unrecognized => {
                eprintln!("{}: unrecognized file type, skipped", input.display())
            }
            SplitOutcome::Split { .. } => {}
        }

        for file in outcome.files() {
            manifest.serialize(ManifestRow {
                source: input,
                format: file.format.tag(),
                merchant: &file.merchant,
                lines: file.lines,
                path: &file.path,
            })?;
            written += 1;
        }
    }

    manifest.flush()?;
    info!("{} file(s) written to {}", written, cli.output_dir.display());

    Ok(())
}
