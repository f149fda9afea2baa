//! Splitting orchestration.
//!
//! Reads one input fully into memory, detects its report family, parses it
//! in a single pass, and only then writes one output file per merchant.
//! Each call is independent; a `Splitter` holds configuration only.

use crate::detect::{self, ReportFormat};
use crate::error::Result;
use crate::layout::SplitConfig;
use crate::parser::{self, ParsedReport};
use log::{debug, info, warn};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// One per-merchant output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub format: ReportFormat,
    pub merchant: String,

    /// Lines written, framing records included.
    pub lines: usize,

    pub path: PathBuf,
}

/// What happened to one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The input was parsed and split; `files` are in write order.
    Split {
        format: ReportFormat,
        files: Vec<GeneratedFile>,
    },

    /// The input had no content.
    Empty,

    /// Neither the file name nor the first line identified a report family.
    Unrecognized,
}

impl SplitOutcome {
    /// Files written, empty unless the input was split.
    pub fn files(&self) -> &[GeneratedFile] {
        match self {
            SplitOutcome::Split { files, .. } => files,
            _ => &[],
        }
    }

    /// Paths written, in write order.
    pub fn into_paths(self) -> Vec<PathBuf> {
        match self {
            SplitOutcome::Split { files, .. } => files.into_iter().map(|f| f.path).collect(),
            _ => Vec::new(),
        }
    }
}

/// Splits settlement files into per-merchant files.
///
/// # Output naming
///
/// Files are named `{merchant}_{EEVC|EEVD|EEFI}_{ddmmyy}_{nsa}.txt`, so running
/// the same input twice produces byte-identical files with the same names.
/// An existing file with the same name is overwritten.
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    config: SplitConfig,
}

impl Splitter {
    /// Creates a splitter with the built-in layouts.
    pub fn new() -> Self {
        Splitter {
            config: SplitConfig::default(),
        }
    }

    /// Creates a splitter with custom layouts.
    pub fn with_config(config: SplitConfig) -> Self {
        Splitter { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Splits the file at `input` into `output_dir`.
    pub fn split_file(&self, input: &Path, output_dir: &Path) -> Result<SplitOutcome> {
        let bytes = fs::read(input)?;
        self.split_bytes(input, &bytes, output_dir)
    }

    /// Splits content read from `reader`. `name` is only used for detection.
    pub fn split_reader<R: Read>(
        &self,
        name: &Path,
        mut reader: R,
        output_dir: &Path,
    ) -> Result<SplitOutcome> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.split_bytes(name, &bytes, output_dir)
    }

    /// Splits in-memory content. `name` is only used for detection.
    pub fn split_bytes(&self, name: &Path, bytes: &[u8], output_dir: &Path) -> Result<SplitOutcome> {
        fs::create_dir_all(output_dir)?;

        let text = self.config.decode.decode(bytes)?;
        if text.is_empty() {
            info!("{}: empty file, nothing to split", name.display());
            return Ok(SplitOutcome::Empty);
        }

        let first_line = text.lines().next().unwrap_or("");
        let format = match detect::detect(name, first_line) {
            Some(format) => format,
            None => {
                warn!("{}: unrecognized report format", name.display());
                return Ok(SplitOutcome::Unrecognized);
            }
        };
        info!("{}: detected {} report", name.display(), format);

        let report = parser::parse(format, &text, &self.config);
        let files = self.write_report(&report, output_dir)?;

        info!(
            "{}: {} {} file(s) written to {}",
            name.display(),
            files.len(),
            format,
            output_dir.display()
        );

        Ok(SplitOutcome::Split { format, files })
    }

    /// Writes every merchant group of `report` to its own file.
    fn write_report(&self, report: &ParsedReport, output_dir: &Path) -> Result<Vec<GeneratedFile>> {
        let mut files = Vec::with_capacity(report.groups.len());

        for group in &report.groups {
            let path = output_dir.join(report.file_name(group));
            let content = report.render(group);

            let mut writer = BufWriter::new(File::create(&path)?);
            writer.write_all(content.as_bytes())?;
            writer.flush()?;

            let framing = if group.framed {
                usize::from(report.metadata.header.is_some())
                    + usize::from(report.metadata.trailer.is_some())
            } else {
                0
            };
            debug!("Wrote {} ({} lines)", path.display(), group.lines.len() + framing);

            files.push(GeneratedFile {
                format: report.format,
                merchant: group.merchant.clone(),
                lines: group.lines.len() + framing,
                path,
            });
        }

        Ok(files)
    }
}

/// Splits the file at `input` into `output_dir` with the built-in layouts
/// and returns the paths written.
///
/// Empty and unrecognized inputs yield an empty list; only I/O failures are
/// errors.
pub fn process(input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    Splitter::new()
        .split_file(input, output_dir)
        .map(SplitOutcome::into_paths)
}
