//! EEVD debit-sales parser (comma-delimited).
//!
//! The first field is the record type: `00` is the file header, `04` the
//! file trailer. Every other record carrying at least two fields belongs to
//! the merchant named in its second field; there is no open/close block.
//!
//! Lines are kept byte-for-byte, terminators included.

use crate::detect::ReportFormat;
use crate::layout::CsvLayout;
use crate::metadata::{self, FileMetadata, HeaderFields};
use crate::parser::{LineEnding, MerchantGroups, ParsedReport, RecordType};
use crate::text;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};

/// Splits one raw line into trimmed fields.
///
/// Blank lines yield no fields; quoting follows the `csv` crate rules.
pub fn fields(line: &str) -> Vec<String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => record.iter().map(str::to_string).collect(),
        Ok(false) => Vec::new(),
        Err(e) => {
            debug!("Unreadable CSV record {:?}: {}", line.trim_end(), e);
            Vec::new()
        }
    }
}

/// Maps a split EEVD record to its record type.
pub fn classify(fields: &[String]) -> RecordType {
    match fields.first().map(String::as_str) {
        Some("00") => RecordType::FileHeader,
        Some("04") => RecordType::FileTrailer,
        Some(_) if fields.len() >= 2 => RecordType::DetailLine,
        _ => RecordType::Unclassified,
    }
}

/// Parses an EEVD file.
pub fn parse(text: &str, layout: &CsvLayout) -> ParsedReport {
    let lines = text::raw_lines(text);

    let mut header: Option<(&str, Vec<String>)> = None;
    let mut trailer: Option<&str> = None;
    let mut groups = MerchantGroups::new();

    for (idx, &line) in lines.iter().enumerate() {
        let record = fields(line);

        match classify(&record) {
            RecordType::FileHeader => header = Some((line, record)),
            RecordType::FileTrailer => trailer = Some(line),
            RecordType::DetailLine if record[1].is_empty() => {
                debug!("Line {}: empty merchant field, dropped", idx + 1);
            }
            RecordType::DetailLine => groups.push(&record[1], line),
            _ => debug!("Line {}: unclassified, dropped", idx + 1),
        }
    }

    let candidates = header.iter().flat_map(move |(_, fields)| {
        layout.headers.iter().map(move |rev| HeaderFields {
            revision: &rev.name,
            date: field(fields, rev.date_field),
            sequence: field(fields, rev.sequence_field),
        })
    });
    let (movement_date, sequence) = metadata::extract(candidates, &lines);

    info!(
        "EEVD: {} merchant(s), movement date {}, NSA {}",
        groups.len(),
        movement_date,
        sequence
    );

    ParsedReport {
        format: ReportFormat::DebitSales,
        metadata: FileMetadata {
            header: header.map(|(line, _)| line.to_string()),
            trailer: trailer.map(str::to_string),
            movement_date,
            sequence,
        },
        groups: groups.into_vec(),
        line_ending: LineEnding::Preserved,
    }
}

fn field(fields: &[String], idx: usize) -> &str {
    fields.get(idx).map(String::as_str).unwrap_or("")
}
