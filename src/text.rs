//! Decoding and slicing helpers shared by the format parsers.
//!
//! Acquirer files are not guaranteed to be valid UTF-8, so the default
//! policy replaces invalid sequences with U+FFFD instead of failing.
//! All offsets are counted in characters, so a replacement character in the
//! middle of a record never shifts or panics a slice.

use crate::error::{Result, SplitError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How raw input bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Replace invalid byte sequences with U+FFFD.
    #[default]
    Lossy,

    /// Reject input that is not valid UTF-8.
    Strict,
}

impl DecodePolicy {
    /// Decodes `bytes` according to this policy.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Cow<'a, str>> {
        match self {
            DecodePolicy::Lossy => Ok(String::from_utf8_lossy(bytes)),
            DecodePolicy::Strict => std::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|e| SplitError::InvalidEncoding {
                    offset: e.valid_up_to(),
                }),
        }
    }
}

/// Splits text into lines with the trailing `\n` removed.
///
/// A `\r` before the newline is kept, so re-joining with `\n` reproduces
/// the original record bytes.
pub fn positional_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
        .collect()
}

/// Splits text into lines keeping each line terminator.
pub fn raw_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Returns the characters of `line` in `[start, end)`.
///
/// Out-of-range bounds are clamped: a short line yields a partial or empty
/// slice, never a panic.
pub fn slice(line: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }

    let byte_at = |n: usize| {
        line.char_indices()
            .nth(n)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    };

    let from = byte_at(start);
    let to = byte_at(end);
    &line[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_within_bounds() {
        assert_eq!(slice("004000000123", 3, 12), "000000123");
        assert_eq!(slice("abc", 0, 3), "abc");
    }

    #[test]
    fn test_slice_short_line_is_partial() {
        assert_eq!(slice("00401", 3, 12), "01");
        assert_eq!(slice("00", 3, 12), "");
        assert_eq!(slice("", 0, 3), "");
    }

    #[test]
    fn test_slice_inverted_range_is_empty() {
        assert_eq!(slice("abcdef", 4, 2), "");
    }

    #[test]
    fn test_slice_counts_characters() {
        let line = "0\u{fffd}2345";
        assert_eq!(slice(line, 1, 3), "\u{fffd}2");
        assert_eq!(slice(line, 2, 6), "2345");
    }

    #[test]
    fn test_positional_lines_strip_newline_only() {
        let lines = positional_lines("002abc\r\n004def\n028");
        assert_eq!(lines, vec!["002abc\r", "004def", "028"]);
    }

    #[test]
    fn test_raw_lines_keep_terminators() {
        let lines = raw_lines("00,H\n01,1,x\r\n04,T");
        assert_eq!(lines, vec!["00,H\n", "01,1,x\r\n", "04,T"]);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(positional_lines("").is_empty());
        assert!(raw_lines("").is_empty());
    }

    #[test]
    fn test_lossy_decode_replaces_invalid_bytes() {
        let decoded = DecodePolicy::Lossy.decode(b"00\xff1").unwrap();
        assert_eq!(decoded, "00\u{fffd}1");
    }

    #[test]
    fn test_strict_decode_rejects_invalid_bytes() {
        let err = DecodePolicy::Strict.decode(b"00\xff1").unwrap_err();
        assert!(matches!(err, SplitError::InvalidEncoding { offset: 2 }));
    }
}
