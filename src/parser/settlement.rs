//! EEFI financial-settlement parser (positional, 2-character type codes).
//!
//! `03` records are the file header and `04` records are merchant details,
//! attached directly to the merchant at the configured offset. Any other
//! non-blank record replaces the file trailer, so the last one wins.
//!
//! A file without a single `04` record is still emitted whole, as one
//! catch-all group under the configured sentinel key.

use crate::detect::ReportFormat;
use crate::layout::PositionalLayout;
use crate::metadata::{self, FileMetadata, HeaderFields};
use crate::parser::{LineEnding, MerchantGroup, MerchantGroups, ParsedReport, RecordType};
use crate::text;
use log::{debug, info, warn};

const TYPE_WIDTH: usize = 2;

/// Maps an EEFI record to its record type.
pub fn classify(line: &str) -> RecordType {
    if line.trim().is_empty() {
        return RecordType::Unclassified;
    }

    match text::slice(line, 0, TYPE_WIDTH).trim() {
        "03" => RecordType::FileHeader,
        "04" => RecordType::DetailLine,
        _ => RecordType::FileTrailer,
    }
}

/// Parses an EEFI file.
pub fn parse(text: &str, layout: &PositionalLayout, sentinel_key: &str) -> ParsedReport {
    let lines = text::positional_lines(text);

    let mut header: Option<&str> = None;
    let mut trailer: Option<&str> = None;
    let mut groups = MerchantGroups::new();

    for (idx, &line) in lines.iter().enumerate() {
        match classify(line) {
            RecordType::FileHeader => header = Some(line),
            RecordType::DetailLine => {
                let merchant = layout.merchant_key.extract(line).trim();
                if merchant.is_empty() {
                    debug!("Line {}: detail without merchant number, dropped", idx + 1);
                } else {
                    groups.push(merchant, line);
                }
            }
            RecordType::FileTrailer => trailer = Some(line),
            _ => debug!("Line {}: blank, dropped", idx + 1),
        }
    }

    let candidates = header.into_iter().flat_map(move |line| {
        layout.headers.iter().map(move |rev| HeaderFields {
            revision: &rev.name,
            date: rev.date.extract(line),
            sequence: rev.sequence.extract(line),
        })
    });
    let (movement_date, sequence) = metadata::extract(candidates, &lines);

    let groups = if groups.is_empty() && !lines.is_empty() {
        warn!(
            "EEFI: no merchant detail records, emitting the whole file as '{}'",
            sentinel_key
        );
        vec![MerchantGroup {
            merchant: sentinel_key.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
            framed: false,
        }]
    } else {
        groups.into_vec()
    };

    info!(
        "EEFI: {} group(s), movement date {}, NSA {}",
        groups.len(),
        movement_date,
        sequence
    );

    ParsedReport {
        format: ReportFormat::FinancialSettlement,
        metadata: FileMetadata {
            header: header.map(str::to_string),
            trailer: trailer.map(str::to_string),
            movement_date,
            sequence,
        },
        groups,
        line_ending: LineEnding::Stripped,
    }
}
