//! Error types for the settlement splitter.
//!
//! Only filesystem-level problems surface as errors. Format ambiguity
//! (unknown layout, empty input, unreadable dates) is resolved locally and
//! reported through [`SplitOutcome`](crate::splitter::SplitOutcome).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for splitter operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Errors that can occur while splitting a settlement file.
#[derive(Error, Debug)]
pub enum SplitError {
    /// Failed to read the input or write an output file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error (manifest output)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Layout configuration file could not be parsed
    #[error("Invalid layout configuration in {}: {source}", path.display())]
    LayoutConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Input is not valid UTF-8 and strict decoding was requested
    #[error("Input is not valid UTF-8 at byte {offset}")]
    InvalidEncoding { offset: usize },

    /// No input file given on the command line
    #[error("Missing input file argument. Usage: redecard-split [OPTIONS] <INPUT>...")]
    MissingInput,
}
