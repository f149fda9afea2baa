//! Report family detection.
//!
//! The file name is trusted first: an `EEVC`, `EEVD` or `EEFI` tag anywhere in
//! it (case-insensitive) selects the parser even if the content disagrees.
//! Only untagged files are sniffed by the prefix of their first line.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// The three record families of the acquirer feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReportFormat {
    /// Positional credit-sales report.
    #[serde(rename = "EEVC")]
    CreditSales,

    /// Comma-delimited debit-sales report.
    #[serde(rename = "EEVD")]
    DebitSales,

    /// Positional financial-settlement report.
    #[serde(rename = "EEFI")]
    FinancialSettlement,
}

impl ReportFormat {
    /// Detection order for file name tags.
    pub const ALL: [ReportFormat; 3] = [
        ReportFormat::CreditSales,
        ReportFormat::DebitSales,
        ReportFormat::FinancialSettlement,
    ];

    /// Tag used in file names, both incoming and generated.
    pub fn tag(&self) -> &'static str {
        match self {
            ReportFormat::CreditSales => "EEVC",
            ReportFormat::DebitSales => "EEVD",
            ReportFormat::FinancialSettlement => "EEFI",
        }
    }

    /// Looks for a format tag in the file name of `path`.
    pub fn from_file_name(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_uppercase();
        Self::ALL.into_iter().find(|format| name.contains(format.tag()))
    }

    /// Sniffs the format from the first line of content.
    ///
    /// `002` must be checked before `00`: every credit-sales header would
    /// otherwise look like a debit-sales one.
    pub fn from_first_line(line: &str) -> Option<Self> {
        if line.starts_with("002") {
            Some(ReportFormat::CreditSales)
        } else if line.starts_with("00") {
            Some(ReportFormat::DebitSales)
        } else if line.starts_with("03") {
            Some(ReportFormat::FinancialSettlement)
        } else {
            None
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Picks the parser for an input: file name tag first, then content.
pub fn detect(path: &Path, first_line: &str) -> Option<ReportFormat> {
    ReportFormat::from_file_name(path).or_else(|| ReportFormat::from_first_line(first_line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_tag_is_case_insensitive() {
        assert_eq!(
            ReportFormat::from_file_name(Path::new("uploads/rede_eevc_20240101.txt")),
            Some(ReportFormat::CreditSales)
        );
        assert_eq!(
            ReportFormat::from_file_name(Path::new("EEVD.csv")),
            Some(ReportFormat::DebitSales)
        );
        assert_eq!(
            ReportFormat::from_file_name(Path::new("x-Eefi-y")),
            Some(ReportFormat::FinancialSettlement)
        );
    }

    #[test]
    fn test_directory_names_are_not_tags() {
        assert_eq!(ReportFormat::from_file_name(Path::new("eevc/input.txt")), None);
    }

    #[test]
    fn test_first_line_prefixes() {
        assert_eq!(
            ReportFormat::from_first_line("00201012024REDECARD"),
            Some(ReportFormat::CreditSales)
        );
        assert_eq!(
            ReportFormat::from_first_line("00,1234,01012024"),
            Some(ReportFormat::DebitSales)
        );
        assert_eq!(
            ReportFormat::from_first_line("03001012024"),
            Some(ReportFormat::FinancialSettlement)
        );
        assert_eq!(ReportFormat::from_first_line("99 something"), None);
        assert_eq!(ReportFormat::from_first_line(""), None);
    }

    #[test]
    fn test_file_name_overrides_content() {
        let format = detect(Path::new("batch_EEFI.txt"), "002 credit header");
        assert_eq!(format, Some(ReportFormat::FinancialSettlement));
    }

    #[test]
    fn test_content_used_without_tag() {
        let format = detect(Path::new("upload.txt"), "002 credit header");
        assert_eq!(format, Some(ReportFormat::CreditSales));
        assert_eq!(detect(Path::new("upload.txt"), "hello"), None);
    }

    #[test]
    fn test_tag_and_display() {
        assert_eq!(ReportFormat::DebitSales.tag(), "EEVD");
        assert_eq!(ReportFormat::FinancialSettlement.to_string(), "EEFI");
    }
}
