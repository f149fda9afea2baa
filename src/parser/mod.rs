//! Per-format parsers that regroup report lines by merchant establishment.
//!
//! Every parser makes a single forward pass over the decoded lines and
//! produces a [`ParsedReport`]: the file-level metadata plus one
//! [`MerchantGroup`] per merchant key, in first-seen order. Nothing is
//! written here; the splitter renders and writes the groups afterwards.

pub mod credit;
pub mod debit;
pub mod settlement;

use crate::detect::ReportFormat;
use crate::layout::SplitConfig;
use crate::metadata::FileMetadata;
use crate::sanitize::sanitize_filename;
use std::collections::HashMap;

/// Classification of a single record, derived from its type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    FileHeader,
    EstablishmentHeader,
    EstablishmentTrailer,
    FileTrailer,
    DetailLine,
    Unclassified,
}

/// How lines are stored, which decides how they are written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// Trailing `\n` removed on read, added back on write.
    Stripped,

    /// Line terminators kept verbatim.
    Preserved,
}

/// Lines of one merchant, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantGroup {
    pub merchant: String,
    pub lines: Vec<String>,

    /// Whether the file header/trailer wrap this group on output. Only the
    /// catch-all group of a settlement file, which already holds them, is
    /// written unframed.
    pub framed: bool,
}

/// Merchant groups keyed by merchant, iterated in first-seen order.
#[derive(Debug, Default)]
pub struct MerchantGroups {
    index: HashMap<String, usize>,
    groups: Vec<MerchantGroup>,
}

impl MerchantGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `line` to the group of `merchant`, creating it if needed.
    pub fn push(&mut self, merchant: &str, line: &str) {
        let idx = match self.index.get(merchant) {
            Some(&idx) => idx,
            None => {
                self.groups.push(MerchantGroup {
                    merchant: merchant.to_string(),
                    lines: Vec::new(),
                    framed: true,
                });
                self.index.insert(merchant.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[idx].lines.push(line.to_string());
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_vec(self) -> Vec<MerchantGroup> {
        self.groups
    }
}

/// Result of parsing one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReport {
    pub format: ReportFormat,
    pub metadata: FileMetadata,
    pub groups: Vec<MerchantGroup>,
    pub line_ending: LineEnding,
}

impl ParsedReport {
    /// Output file name for `group`: `{merchant}_{TAG}_{ddmmyy}_{nsa}.txt`.
    pub fn file_name(&self, group: &MerchantGroup) -> String {
        sanitize_filename(&format!(
            "{}_{}_{}_{}.txt",
            group.merchant,
            self.format.tag(),
            self.metadata.movement_date,
            self.metadata.sequence
        ))
    }

    /// Renders the output content of `group`: header, the merchant's lines
    /// in input order, then trailer.
    pub fn render(&self, group: &MerchantGroup) -> String {
        let mut pieces: Vec<&str> = Vec::with_capacity(group.lines.len() + 2);

        if group.framed {
            pieces.extend(self.metadata.header.as_deref());
        }
        pieces.extend(group.lines.iter().map(String::as_str));
        if group.framed {
            pieces.extend(self.metadata.trailer.as_deref());
        }

        let mut out = String::new();
        let last = pieces.len().saturating_sub(1);
        for (i, piece) in pieces.into_iter().enumerate() {
            out.push_str(piece);
            match self.line_ending {
                LineEnding::Stripped => out.push('\n'),
                // An unterminated final input line must not run into the
                // next record when it lands mid-file.
                LineEnding::Preserved if i < last && !piece.ends_with('\n') => out.push('\n'),
                LineEnding::Preserved => {}
            }
        }

        out
    }
}

/// Parses decoded `text` as `format`.
pub fn parse(format: ReportFormat, text: &str, config: &SplitConfig) -> ParsedReport {
    match format {
        ReportFormat::CreditSales => credit::parse(text, &config.credit),
        ReportFormat::DebitSales => debit::parse(text, &config.debit),
        ReportFormat::FinancialSettlement => {
            settlement::parse(text, &config.settlement, &config.sentinel_key)
        }
    }
}
