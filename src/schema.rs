use std::fmt;

use csv::StringRecord;

/// The exact header row the analytics import expects, in order.
pub const EXPECTED_HEADER: [&str; 10] = [
    "Timestamp",
    "SourceIP",
    "DestinationIP",
    "SourcePort",
    "DestinationPort",
    "Protocol",
    "PacketLength",
    "Direction",
    "TCPFlags",
    "ApplicationGuess",
];

/// Columns of a capture row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Timestamp,
    SourceIp,
    DestinationIp,
    SourcePort,
    DestinationPort,
    Protocol,
    PacketLength,
    Direction,
    TcpFlags,
    ApplicationGuess,
}
impl Column {
    /// Position of this column within a row.
    pub fn index(self) -> usize {
        self as usize
    }
    pub fn name(self) -> &'static str {
        EXPECTED_HEADER[self.index()]
    }
}
impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returns `true` if `header` names exactly the expected columns, in the expected order.
pub fn header_matches(header: &[String]) -> bool {
    header.len() == EXPECTED_HEADER.len()
        && header.iter().zip(EXPECTED_HEADER.iter()).all(|(found, expected)| found == expected)
}

/// One data row, borrowed from the underlying `StringRecord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketRow<'a> {
    pub timestamp: &'a str,
    pub source_ip: &'a str,
    pub destination_ip: &'a str,
    pub source_port: &'a str,
    pub destination_port: &'a str,
    pub protocol: &'a str,
    pub packet_length: &'a str,
    pub direction: &'a str,
    pub tcp_flags: &'a str,
    pub application_guess: &'a str,
}
impl<'a> PacketRow<'a> {
    /// Builds a row from a record. Returns `None` unless the record has exactly as many fields
    /// as the expected header.
    pub fn from_record(record: &'a StringRecord) -> Option<PacketRow<'a>> {
        if record.len() != EXPECTED_HEADER.len() {
            return None;
        }
        let field = |col: Column| &record[col.index()];
        Some(PacketRow {
            timestamp: field(Column::Timestamp),
            source_ip: field(Column::SourceIp),
            destination_ip: field(Column::DestinationIp),
            source_port: field(Column::SourcePort),
            destination_port: field(Column::DestinationPort),
            protocol: field(Column::Protocol),
            packet_length: field(Column::PacketLength),
            direction: field(Column::Direction),
            tcp_flags: field(Column::TcpFlags),
            application_guess: field(Column::ApplicationGuess),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_follow_header() {
        assert_eq!(Column::Timestamp.name(), "Timestamp");
        assert_eq!(Column::Protocol.index(), 5);
        assert_eq!(Column::PacketLength.index(), 6);
        assert_eq!(Column::ApplicationGuess.to_string(), "ApplicationGuess");
    }

    #[test]
    fn header_must_match_exactly() {
        let mut header: Vec<String> = EXPECTED_HEADER.iter().map(|s| s.to_string()).collect();
        assert!(header_matches(&header));
        header.swap(1, 2);
        assert!(!header_matches(&header));
        header.swap(1, 2);
        header.pop();
        assert!(!header_matches(&header));
    }

    #[test]
    fn row_needs_ten_fields() {
        let short = StringRecord::from(vec!["a"; 9]);
        assert!(PacketRow::from_record(&short).is_none());
        let full = StringRecord::from(vec![
            "2024-01-01 12:00:00", "10.0.0.1", "10.0.0.2", "443", "51000", "TCP", "60",
            "Outgoing", "ACK", "HTTPS",
        ]);
        let row = PacketRow::from_record(&full).unwrap();
        assert_eq!(row.protocol, "TCP");
        assert_eq!(row.application_guess, "HTTPS");
    }
}
