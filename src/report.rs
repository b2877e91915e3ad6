use std::cmp::Reverse;
use std::fmt;
use std::io::Write;

use hashbrown::HashMap;
use tabwriter::TabWriter;

use crate::encoding::Encoding;
use crate::schema::EXPECTED_HEADER;

/// Default number of issues printed verbatim before the remainder is summarized.
pub const DEFAULT_ISSUE_LIMIT: usize = 10;

/// Outcome of a full validation run over a capture file.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub encoding: Encoding,
    pub header: HeaderCheck,
    /// Number of data rows (header excluded).
    pub total_rows: usize,
    /// Number of data rows that passed every check.
    pub valid_rows: usize,
    /// Row issues, in scan order.
    pub issues: Vec<ValidationIssue>,
    /// Rows whose source or destination mentions `127.0.0.1` or `localhost`.
    pub localhost_packets: usize,
    pub protocols: ProtocolTally,
}
impl Report {
    /// `true` iff the header matched and no row issues were recorded.
    pub fn is_success(&self) -> bool {
        self.header.is_match() && self.issues.is_empty()
    }
    pub fn invalid_rows(&self) -> usize {
        self.total_rows - self.valid_rows
    }
    /// Renders the report, listing at most `issue_limit` issues before summarizing the rest.
    /// `Display` on `Report` uses `DEFAULT_ISSUE_LIMIT`.
    pub fn display(&self, issue_limit: usize) -> ReportDisplay<'_> {
        ReportDisplay { report: self, issue_limit }
    }
}

/// Text rendering of a [`Report`], returned by [`Report::display`].
#[derive(Debug, Clone, Copy)]
pub struct ReportDisplay<'a> {
    report: &'a Report,
    issue_limit: usize,
}

/// Result of comparing the first record against `EXPECTED_HEADER`.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderCheck {
    Match(Vec<String>),
    Mismatch { found: Vec<String> },
}
impl HeaderCheck {
    pub fn is_match(&self) -> bool {
        matches!(*self, HeaderCheck::Match(_))
    }
}

/// A failed check on a single data row.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// 1-based record number; the header is row 1.
    pub row: usize,
    pub kind: IssueKind,
}
impl ValidationIssue {
    pub fn description(&self) -> String {
        self.kind.to_string()
    }
}
impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    ColumnCount { found: usize, expected: usize },
    Timestamp(String),
    SourceIp(String),
    DestinationIp(String),
    SourcePort(String),
    DestinationPort(String),
    PacketLength(String),
}
impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            IssueKind::ColumnCount { found, expected } => {
                write!(f, "Column count mismatch ({} vs {})", found, expected)
            }
            IssueKind::Timestamp(ref s) => write!(f, "Invalid timestamp format: {}", s),
            IssueKind::SourceIp(ref s) => write!(f, "Invalid source IP: {}", s),
            IssueKind::DestinationIp(ref s) => write!(f, "Invalid destination IP: {}", s),
            IssueKind::SourcePort(ref s) => write!(f, "Invalid source port: {}", s),
            IssueKind::DestinationPort(ref s) => write!(f, "Invalid destination port: {}", s),
            IssueKind::PacketLength(ref s) => write!(f, "Invalid packet length: {}", s),
        }
    }
}

/// Occurrences of each protocol name across the data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProtocolTally {
    counts: HashMap<String, usize>,
}
impl ProtocolTally {
    pub fn add(&mut self, protocol: &str) {
        match self.counts.get_mut(protocol) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(protocol.to_string(), 1);
            }
        }
    }
    pub fn get(&self, protocol: &str) -> usize {
        self.counts.get(protocol).copied().unwrap_or(0)
    }
    pub fn len(&self) -> usize {
        self.counts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
    /// Protocols by descending count, ties in alphabetical order.
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> =
            self.counts.iter().map(|(name, &count)| (name.as_str(), count)).collect();
        entries.sort_by_key(|&(name, count)| (Reverse(count), name));
        entries
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.display(DEFAULT_ISSUE_LIMIT), f)
    }
}

impl<'a> fmt::Display for ReportDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let report = self.report;
        if report.encoding.has_bom {
            writeln!(f, "✅ UTF-8 BOM detected")?;
        } else {
            writeln!(f, "⚠️  No UTF-8 BOM detected (may cause encoding issues)")?;
        }

        let columns = match report.header {
            HeaderCheck::Match(ref columns) => columns,
            HeaderCheck::Mismatch { ref found } => {
                writeln!(f, "❌ Header does not match expected format")?;
                writeln!(f, "   Expected: {}", EXPECTED_HEADER.join(", "))?;
                return writeln!(f, "   Found:    {}", found.join(", "));
            }
        };
        writeln!(f, "✅ Header row found with {} columns", columns.len())?;
        writeln!(f, "   Columns: {}", columns.join(", "))?;
        writeln!(f, "✅ Header matches expected format")?;

        writeln!(f, "✅ Data validation complete")?;
        writeln!(f, "   Total rows: {}", report.total_rows)?;
        writeln!(f, "   Valid rows: {}", report.valid_rows)?;
        writeln!(f, "   Invalid rows: {}", report.invalid_rows())?;

        if report.issues.is_empty() {
            writeln!(f, "✅ No data validation issues found")?;
        } else {
            writeln!(f, "\n⚠️  Issues found:")?;
            for issue in report.issues.iter().take(self.issue_limit) {
                writeln!(f, "   {}", issue)?;
            }
            if report.issues.len() > self.issue_limit {
                writeln!(f, "   ... and {} more issues", report.issues.len() - self.issue_limit)?;
            }
        }

        writeln!(f, "\n=== Compatibility Check ===")?;
        writeln!(f, "✅ Localhost traffic detected: {} packets", report.localhost_packets)?;
        writeln!(f, "✅ Protocol distribution:")?;
        write!(f, "{}", render_protocols(&report.protocols)?)
    }
}

fn render_protocols(tally: &ProtocolTally) -> ::std::result::Result<String, fmt::Error> {
    let mut tw = TabWriter::new(vec![]).minwidth(4).padding(1);
    for (name, count) in tally.sorted() {
        writeln!(tw, "   {}:\t{}", name, count).map_err(|_| fmt::Error)?;
    }
    let bytes = tw.into_inner().map_err(|_| fmt::Error)?;
    String::from_utf8(bytes).map_err(|_| fmt::Error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_sorts_by_count_then_name() {
        let mut tally = ProtocolTally::default();
        for p in ["UDP", "TCP", "ARP", "TCP", "ICMP"] {
            tally.add(p);
        }
        assert_eq!(tally.sorted(), vec![("TCP", 2), ("ARP", 1), ("ICMP", 1), ("UDP", 1)]);
        assert_eq!(tally.get("TCP"), 2);
        assert_eq!(tally.get("DNS"), 0);
        assert_eq!(tally.len(), 4);
    }

    #[test]
    fn issue_text() {
        let issue = ValidationIssue {
            row: 7,
            kind: IssueKind::ColumnCount { found: 9, expected: 10 },
        };
        assert_eq!(issue.to_string(), "Row 7: Column count mismatch (9 vs 10)");
        assert_eq!(issue.description(), "Column count mismatch (9 vs 10)");
    }

    #[test]
    fn render_truncates_issues() {
        let issues = (2..15)
            .map(|row| ValidationIssue { row, kind: IssueKind::PacketLength("x".into()) })
            .collect::<Vec<_>>();
        let mut protocols = ProtocolTally::default();
        protocols.add("TCP");
        let report = Report {
            encoding: Encoding { has_bom: true },
            header: HeaderCheck::Match(EXPECTED_HEADER.iter().map(|s| s.to_string()).collect()),
            total_rows: 13,
            valid_rows: 0,
            issues,
            localhost_packets: 0,
            protocols,
        };
        let text = report.to_string();
        assert!(text.contains("Row 11: Invalid packet length: x"));
        assert!(!text.contains("Row 12:"));
        assert!(text.contains("... and 3 more issues"));
        assert!(text.contains("   Invalid rows: 13"));
        assert!(text.contains("TCP:"));

        let text = report.display(2).to_string();
        assert!(text.contains("Row 3: Invalid packet length: x"));
        assert!(!text.contains("Row 4:"));
        assert!(text.contains("... and 11 more issues"));
    }

    #[test]
    fn render_header_mismatch_stops_early() {
        let report = Report {
            encoding: Encoding { has_bom: false },
            header: HeaderCheck::Mismatch { found: vec!["Time".into()] },
            total_rows: 0,
            valid_rows: 0,
            issues: vec![],
            localhost_packets: 0,
            protocols: ProtocolTally::default(),
        };
        let text = report.to_string();
        assert!(text.contains("   Found:    Time"));
        assert!(!text.contains("Total rows"));
        assert!(!report.is_success());
    }
}
