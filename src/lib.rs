//! # Redecard Splitter
//!
//! Splits consolidated Rede settlement reports into one file per merchant
//! establishment (PV), keeping the file header and trailer around every
//! merchant's records.
//!
//! ## Supported reports
//!
//! - **EEVC**: credit sales, positional, merchant blocks opened by `004`
//!   and closed by `026`
//! - **EEVD**: debit sales, comma-delimited, merchant in the second field
//! - **EEFI**: financial settlement, positional, merchant on `04` records
//!
//! ## Design Principles
//!
//! - **Layouts as data**: header offsets live in [`SplitConfig`] and several
//!   layout revisions are probed in order
//! - **Permissive decoding**: invalid bytes are replaced, never fatal
//! - **Deterministic output**: `{merchant}_{TAG}_{ddmmyy}_{nsa}.txt`, line
//!   order preserved within each merchant
//!
//! ## Example
//!
//! ```no_run
//! use redecard_splitter::process;
//! use std::path::Path;
//!
//! let written = process(Path::new("uploads/EEVC_0101.txt"), Path::new("outputs")).unwrap();
//! for path in written {
//!     println!("{}", path.display());
//! }
//! ```

pub mod detect;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod parser;
pub mod sanitize;
pub mod splitter;
pub mod text;

pub use detect::ReportFormat;
pub use error::{Result, SplitError};
pub use layout::{CsvHeader, CsvLayout, PositionalHeader, PositionalLayout, Span, SplitConfig};
pub use metadata::{FileMetadata, MovementDate, SequenceNumber};
pub use sanitize::sanitize_filename;
pub use splitter::{process, GeneratedFile, SplitOutcome, Splitter};
pub use text::DecodePolicy;
