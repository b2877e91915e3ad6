use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::encoding;
use crate::error::*;
use crate::field::*;
use crate::report::*;
use crate::schema::*;

#[derive(Debug, Clone, Default)]
pub struct Validator {}
impl Validator {
    /// Create a new capture-file validator.
    pub fn new() -> Validator {
        Validator {}
    }

    pub fn validate_path<P: AsRef<Path>>(&self, path: P) -> Result<Report> {
        let path = path.as_ref();
        info!(path = %path.display(), "validating capture file");
        let file = File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ValidateError::NotFound(path.to_path_buf()),
            _ => ValidateError::Io(err),
        })?;
        self.validate_reader(file)
    }

    pub fn validate_reader<R: Read>(&self, mut reader: R) -> Result<Report> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes)?;
        let (encoding, text) = encoding::decode(&bytes)?;
        debug!(has_bom = encoding.has_bom, n_bytes = bytes.len(), "encoding probed");

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut report = Report {
            encoding,
            header: HeaderCheck::Mismatch { found: vec![] },
            total_rows: 0,
            valid_rows: 0,
            issues: vec![],
            localhost_packets: 0,
            protocols: ProtocolTally::default(),
        };

        let mut record = StringRecord::new();
        if blank_lines_at(text.as_bytes(), 0) > 0 {
            warn!("file starts with a blank line");
            return Ok(report);
        }
        if !csv_reader.read_record(&mut record)? {
            warn!("file has no header row");
            return Ok(report);
        }
        let header: Vec<String> = record.iter().map(String::from).collect();
        if !header_matches(&header) {
            warn!(found = ?header, "header does not match expected columns");
            report.header = HeaderCheck::Mismatch { found: header };
            return Ok(report);
        }
        let n_columns = header.len();
        report.header = HeaderCheck::Match(header);

        // the header is row 1
        let mut row_num = 1;
        loop {
            // csv skips empty lines; each one is still a row without fields
            let pos = csv_reader.position().byte() as usize;
            for _ in 0..blank_lines_at(text.as_bytes(), pos) {
                row_num += 1;
                report.total_rows += 1;
                let kind = IssueKind::ColumnCount { found: 0, expected: n_columns };
                debug!(row = row_num, issue = %kind, "blank row");
                report.issues.push(ValidationIssue { row: row_num, kind });
            }

            if !csv_reader.read_record(&mut record)? {
                break;
            }
            row_num += 1;
            report.total_rows += 1;
            tally_row(&mut report, &record);

            match check_row(&record, n_columns) {
                Ok(()) => report.valid_rows += 1,
                Err(kind) => {
                    debug!(row = row_num, issue = %kind, "row failed validation");
                    report.issues.push(ValidationIssue { row: row_num, kind });
                }
            }
        }

        info!(
            total = report.total_rows,
            valid = report.valid_rows,
            issues = report.issues.len(),
            localhost = report.localhost_packets,
            protocols = report.protocols.len(),
            "validation complete"
        );
        Ok(report)
    }
}

/// Number of empty lines starting at byte `pos`. A record ending in `\r\n` is handed back after
/// the `\r`, so a `\n` directly following it still belongs to that record.
fn blank_lines_at(text: &[u8], mut pos: usize) -> usize {
    if pos > 0 && text[pos - 1] == b'\r' && text.get(pos) == Some(&b'\n') {
        pos += 1;
    }
    let mut n_blank = 0;
    while let Some(&b) = text.get(pos) {
        match b {
            b'\r' => {
                pos += 1;
                if text.get(pos) == Some(&b'\n') {
                    pos += 1;
                }
            }
            b'\n' => pos += 1,
            _ => break,
        }
        n_blank += 1;
    }
    n_blank
}

// Localhost and protocol counts cover every data row, valid or not.
fn tally_row(report: &mut Report, record: &StringRecord) {
    let is_local = [Column::SourceIp, Column::DestinationIp]
        .iter()
        .filter_map(|col| record.get(col.index()))
        .any(is_localhost);
    if is_local {
        report.localhost_packets += 1;
    }
    if let Some(protocol) = record.get(Column::Protocol.index()) {
        report.protocols.add(strip_quotes(protocol));
    }
}

/// Applies the field checks in order, stopping at the first failure.
fn check_row(record: &StringRecord, n_columns: usize) -> ::std::result::Result<(), IssueKind> {
    let row = match PacketRow::from_record(record) {
        Some(row) => row,
        None => return Err(IssueKind::ColumnCount { found: record.len(), expected: n_columns }),
    };

    if !is_valid_timestamp(strip_quotes(row.timestamp)) {
        return Err(IssueKind::Timestamp(row.timestamp.to_string()));
    }

    let source_ip = strip_quotes(row.source_ip);
    if !is_valid_ip(source_ip) {
        return Err(IssueKind::SourceIp(source_ip.to_string()));
    }
    let destination_ip = strip_quotes(row.destination_ip);
    if !is_valid_ip(destination_ip) {
        return Err(IssueKind::DestinationIp(destination_ip.to_string()));
    }

    if !is_valid_port(row.source_port) {
        return Err(IssueKind::SourcePort(row.source_port.to_string()));
    }
    if !is_valid_port(row.destination_port) {
        return Err(IssueKind::DestinationPort(row.destination_port.to_string()));
    }

    if !is_valid_packet_length(row.packet_length) {
        return Err(IssueKind::PacketLength(row.packet_length.to_string()));
    }
    Ok(())
}

/// Validates the capture file at `path`, prints the report (or the reason validation could not
/// run) to stdout, and returns whether the file passed.
pub fn validate<P: AsRef<Path>>(path: P) -> bool {
    validate_with(path, DEFAULT_ISSUE_LIMIT)
}

/// Like [`validate`], listing at most `issue_limit` row issues verbatim.
pub fn validate_with<P: AsRef<Path>>(path: P, issue_limit: usize) -> bool {
    let path = path.as_ref();
    println!("=== Validating CSV File: {} ===", path.display());
    match Validator::new().validate_path(path) {
        Ok(report) => {
            print!("{}", report.display(issue_limit));
            report.is_success()
        }
        Err(err) => {
            if err.is_unreadable() {
                println!("❌ ERROR reading file: {}", err);
            } else {
                println!("❌ ERROR: {}", err);
            }
            false
        }
    }
}
