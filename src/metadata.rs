//! Movement date and sequence number (NSA) extraction.
//!
//! The header record is tried first, through every configured layout
//! revision. When none of them yields a valid date, every line of the file
//! is scanned for date-like substrings and the most frequent calendar date
//! wins, ties going to the most recent one.
//!
//! Extraction never fails: unknown values fall back to `000000` / `000`.

use chrono::{Datelike, NaiveDate};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// Years outside this range are treated as noise, not dates.
const MIN_YEAR: i32 = 1970;
const MAX_YEAR: i32 = 2099;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)/([0-9]+)/([0-9]+)").expect("valid regex"));

/// Movement date rendered as `ddmmyy`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovementDate(String);

impl MovementDate {
    /// Placeholder used when no date could be determined.
    pub const UNKNOWN: &'static str = "000000";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NaiveDate> for MovementDate {
    fn from(date: NaiveDate) -> Self {
        MovementDate(date.format("%d%m%y").to_string())
    }
}

impl Default for MovementDate {
    fn default() -> Self {
        MovementDate(Self::UNKNOWN.to_string())
    }
}

impl fmt::Display for MovementDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Three-digit, zero-padded NSA.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceNumber(String);

impl SequenceNumber {
    /// Placeholder used when no sequence number could be determined.
    pub const UNKNOWN: &'static str = "000";

    /// Parses an all-digit run, keeping its rightmost three digits.
    ///
    /// Returns `None` for empty input or anything that is not purely ASCII
    /// digits.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let tail = &raw[raw.len().saturating_sub(3)..];
        Some(SequenceNumber(format!("{:0>3}", tail)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SequenceNumber {
    fn default() -> Self {
        SequenceNumber(Self::UNKNOWN.to_string())
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw date and sequence text pulled from a header by one layout revision.
#[derive(Debug, Clone, Copy)]
pub struct HeaderFields<'a> {
    pub revision: &'a str,
    pub date: &'a str,
    pub sequence: &'a str,
}

/// File-level framing and naming metadata of one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadata {
    /// Last file header seen.
    pub header: Option<String>,

    /// Last file trailer seen.
    pub trailer: Option<String>,

    pub movement_date: MovementDate,
    pub sequence: SequenceNumber,
}

/// Resolves the movement date and NSA of a file.
///
/// `candidates` are the header fields as read by each layout revision, in
/// probing order. `lines` is the whole file, used by the fallback scan.
pub fn extract<'a, I, S>(candidates: I, lines: &[S]) -> (MovementDate, SequenceNumber)
where
    I: IntoIterator<Item = HeaderFields<'a>>,
    S: AsRef<str>,
{
    let candidates: Vec<HeaderFields<'a>> = candidates.into_iter().collect();

    for fields in &candidates {
        if let Some(date) = parse_date(fields.date) {
            let sequence = SequenceNumber::parse(fields.sequence).unwrap_or_default();
            debug!(
                "Header matched revision '{}': date {}, NSA {}",
                fields.revision,
                date.format("%d/%m/%Y"),
                sequence
            );
            return (MovementDate::from(date), sequence);
        }
    }

    let sequence = candidates
        .iter()
        .find_map(|fields| SequenceNumber::parse(fields.sequence))
        .unwrap_or_default();

    let date = match scan_dates(lines) {
        Some(date) => {
            debug!(
                "No header revision matched, scanned date {}",
                date.format("%d/%m/%Y")
            );
            MovementDate::from(date)
        }
        None => {
            debug!("No date found in file, using {}", MovementDate::UNKNOWN);
            MovementDate::default()
        }
    };

    (date, sequence)
}

/// Parses a header date field.
///
/// Accepts `ddmmyyyy`, `ddmmyy`, `dd/mm/yyyy` and `dd/mm/yy` (2-digit years
/// are 20xx). The field must not carry padding; an impossible calendar date
/// is rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return match raw.len() {
            8 => ymd(&raw[4..8], &raw[2..4], &raw[0..2]),
            6 => ymd(&raw[4..6], &raw[2..4], &raw[0..2]),
            _ => None,
        };
    }

    let caps = SLASH_DATE.captures(raw)?;
    if caps.get(0)?.as_str() != raw {
        return None;
    }
    slash_date(&caps[1], &caps[2], &caps[3])
}

/// Finds the most frequent valid date across all lines.
///
/// Recognizes exact 8-digit runs (`ddmmyyyy`) and slash-delimited
/// `dd/mm/yy(yy)`. Ties go to the most recent date.
pub fn scan_dates<S: AsRef<str>>(lines: &[S]) -> Option<NaiveDate> {
    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();

    for line in lines {
        let line = line.as_ref();

        for run in DIGIT_RUN.find_iter(line) {
            let run = run.as_str();
            if run.len() == 8 {
                if let Some(date) = ymd(&run[4..8], &run[2..4], &run[0..2]) {
                    *counts.entry(date).or_insert(0) += 1;
                }
            }
        }

        for caps in SLASH_DATE.captures_iter(line) {
            if let Some(date) = slash_date(&caps[1], &caps[2], &caps[3]) {
                *counts.entry(date).or_insert(0) += 1;
            }
        }
    }

    counts
        .into_iter()
        .max_by_key(|&(date, count)| (count, date))
        .map(|(date, _)| date)
}

fn slash_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    if day.len() != 2 || month.len() != 2 || !matches!(year.len(), 2 | 4) {
        return None;
    }
    ymd(year, month, day)
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let mut year_num: i32 = year.parse().ok()?;
    if year.len() == 2 {
        year_num += 2000;
    }
    let date = NaiveDate::from_ymd_opt(year_num, month.parse().ok()?, day.parse().ok()?)?;

    (MIN_YEAR..=MAX_YEAR).contains(&date.year()).then_some(date)
}
