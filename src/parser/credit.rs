//! EEVC credit-sales parser (positional, 3-character type codes).
//!
//! | Code  | Record                  | Effect                              |
//! |-------|-------------------------|-------------------------------------|
//! | `002` | file header             | kept for framing, source of date/NSA |
//! | `004` | establishment header    | opens the merchant block            |
//! | `026` | establishment trailer   | appended, then closes the block     |
//! | `028` | file trailer            | kept for framing                    |
//! | other | sale / summary details  | appended to the open block          |
//!
//! Lines outside any merchant block that are not file framing are dropped.

use crate::detect::ReportFormat;
use crate::layout::PositionalLayout;
use crate::metadata::{self, FileMetadata, HeaderFields};
use crate::parser::{LineEnding, MerchantGroups, ParsedReport, RecordType};
use crate::text;
use log::{debug, info};

const TYPE_WIDTH: usize = 3;

/// Maps an EEVC type code to its record type.
pub fn classify(code: &str) -> RecordType {
    match code {
        "002" => RecordType::FileHeader,
        "004" => RecordType::EstablishmentHeader,
        "026" => RecordType::EstablishmentTrailer,
        "028" => RecordType::FileTrailer,
        _ => RecordType::DetailLine,
    }
}

/// Whether a merchant block is currently open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Idle,
    InMerchantBlock(String),
}

/// What to do with the line that caused a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetHeader,
    SetTrailer,
    Append(String),
    Drop,
}

impl BlockState {
    /// Transition for one record. `merchant` is the trimmed merchant key of
    /// the record, only meaningful for establishment headers.
    pub fn step(self, record: RecordType, merchant: &str) -> (BlockState, Action) {
        match (record, self) {
            (RecordType::FileHeader, state) => (state, Action::SetHeader),
            (RecordType::FileTrailer, state) => (state, Action::SetTrailer),
            (RecordType::EstablishmentHeader, _) if merchant.is_empty() => {
                (BlockState::Idle, Action::Drop)
            }
            (RecordType::EstablishmentHeader, _) => (
                BlockState::InMerchantBlock(merchant.to_string()),
                Action::Append(merchant.to_string()),
            ),
            (RecordType::EstablishmentTrailer, BlockState::InMerchantBlock(key)) => {
                (BlockState::Idle, Action::Append(key))
            }
            (_, BlockState::InMerchantBlock(key)) => {
                let action = Action::Append(key.clone());
                (BlockState::InMerchantBlock(key), action)
            }
            (_, BlockState::Idle) => (BlockState::Idle, Action::Drop),
        }
    }
}

/// Parses an EEVC file.
pub fn parse(text: &str, layout: &PositionalLayout) -> ParsedReport {
    let lines = text::positional_lines(text);

    let mut header: Option<&str> = None;
    let mut trailer: Option<&str> = None;
    let mut groups = MerchantGroups::new();
    let mut state = BlockState::Idle;

    for (idx, &line) in lines.iter().enumerate() {
        let record = classify(text::slice(line, 0, TYPE_WIDTH).trim());
        let merchant = layout.merchant_key.extract(line).trim();

        let (next, action) = state.step(record, merchant);
        state = next;

        match action {
            Action::SetHeader => header = Some(line),
            Action::SetTrailer => trailer = Some(line),
            Action::Append(key) => groups.push(&key, line),
            Action::Drop => debug!("Line {}: outside any merchant block, dropped", idx + 1),
        }
    }

    if let BlockState::InMerchantBlock(key) = &state {
        debug!("Merchant block {} not closed before end of file", key);
    }

    let candidates = header.into_iter().flat_map(move |line| {
        layout.headers.iter().map(move |rev| HeaderFields {
            revision: &rev.name,
            date: rev.date.extract(line),
            sequence: rev.sequence.extract(line),
        })
    });
    let (movement_date, sequence) = metadata::extract(candidates, &lines);

    info!(
        "EEVC: {} merchant block(s), movement date {}, NSA {}",
        groups.len(),
        movement_date,
        sequence
    );

    ParsedReport {
        format: ReportFormat::CreditSales,
        metadata: FileMetadata {
            header: header.map(str::to_string),
            trailer: trailer.map(str::to_string),
            movement_date,
            sequence,
        },
        groups: groups.into_vec(),
        line_ending: LineEnding::Stripped,
    }
}
