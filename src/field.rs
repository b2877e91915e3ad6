use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

/// Literal accepted in place of an IP address when the capture could not resolve one.
pub const UNKNOWN_IP: &str = "Unknown";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIMESTAMP_FRACTIONAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

// shape only; calendar validity is left to chrono
static TIMESTAMP_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2} [0-9]{1,2}:[0-9]{1,2}:[0-9]{1,2}(\.[0-9]{1,6})?$")
        .expect("timestamp pattern compiles")
});

/// Removes any leading or trailing double-quote characters.
pub fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

/// Returns `true` if `s` is `YYYY-MM-DD HH:MM:SS`, optionally followed by up to six fractional
/// digits, and names a real date and time.
pub fn is_valid_timestamp(s: &str) -> bool {
    let Some(caps) = TIMESTAMP_SHAPE.captures(s) else {
        return false;
    };
    let format = if caps.get(1).is_some() { TIMESTAMP_FRACTIONAL_FORMAT } else { TIMESTAMP_FORMAT };
    NaiveDateTime::parse_from_str(s, format).is_ok()
}

/// Returns `true` for the literal `Unknown` or a dotted-quad IPv4 address. The empty string is
/// not valid.
pub fn is_valid_ip(s: &str) -> bool {
    if s == UNKNOWN_IP {
        return true;
    }
    let mut n_parts = 0;
    for part in s.split('.') {
        n_parts += 1;
        if n_parts > 4 || !is_digits(part) {
            return false;
        }
        match part.parse::<u16>() {
            Ok(octet) if octet <= 255 => {}
            _ => return false,
        }
    }
    n_parts == 4
}

/// Ports may be empty (non-TCP/UDP packets); otherwise they must be plain decimal digits.
pub fn is_valid_port(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || is_digits(s)
}

/// Returns `true` if the packet length is an integer: optional sign, then decimal digits. The
/// value is not bounded.
pub fn is_valid_packet_length(s: &str) -> bool {
    let s = s.trim();
    is_digits(s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s))
}

/// Returns `true` if the field mentions the loopback address or the `localhost` name.
pub fn is_localhost(s: &str) -> bool {
    s.contains("127.0.0.1") || s.contains("localhost")
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps() {
        assert!(is_valid_timestamp("2024-01-01 12:00:00"));
        assert!(is_valid_timestamp("2024-01-01 12:00:00.123456"));
        assert!(is_valid_timestamp("2024-01-01 12:00:00.123"));
        assert!(!is_valid_timestamp("2024/01/01 12:00:00"));
        assert!(!is_valid_timestamp("2024-01-01T12:00:00"));
        assert!(!is_valid_timestamp("2024-01-01 12:00:00.1234567"));
        assert!(!is_valid_timestamp("2024-01-01 12:00:00."));
        assert!(!is_valid_timestamp("2024-13-01 12:00:00"));
        assert!(!is_valid_timestamp("2023-02-30 12:00:00"));
        assert!(!is_valid_timestamp(""));
    }

    #[test]
    fn ips() {
        assert!(is_valid_ip("192.168.1.1"));
        assert!(is_valid_ip("0.0.0.0"));
        assert!(is_valid_ip("010.001.000.255"));
        assert!(is_valid_ip("Unknown"));
        assert!(!is_valid_ip("999.1.1.1"));
        assert!(!is_valid_ip("1.2.3"));
        assert!(!is_valid_ip("1.2.3.4.5"));
        assert!(!is_valid_ip("1.2..4"));
        assert!(!is_valid_ip("-1.2.3.4"));
        assert!(!is_valid_ip(" 1.2.3.4"));
        assert!(!is_valid_ip("unknown"));
        assert!(!is_valid_ip(""));
    }

    #[test]
    fn ports() {
        assert!(is_valid_port("443"));
        assert!(is_valid_port(" 80 "));
        assert!(is_valid_port(""));
        assert!(is_valid_port("   "));
        assert!(!is_valid_port("-1"));
        assert!(!is_valid_port("+80"));
        assert!(!is_valid_port("8 0"));
        assert!(!is_valid_port("http"));
    }

    #[test]
    fn packet_lengths() {
        assert!(is_valid_packet_length("60"));
        assert!(is_valid_packet_length(" -4 "));
        assert!(is_valid_packet_length("+12"));
        assert!(is_valid_packet_length("99999999999999999999"));
        assert!(!is_valid_packet_length("1.5"));
        assert!(!is_valid_packet_length("+"));
        assert!(!is_valid_packet_length("--4"));
        assert!(!is_valid_packet_length("- 4"));
        assert!(!is_valid_packet_length(""));
    }

    #[test]
    fn quotes() {
        assert_eq!(strip_quotes("\"TCP\""), "TCP");
        assert_eq!(strip_quotes("\"\"UDP"), "UDP");
        assert_eq!(strip_quotes("ICMP"), "ICMP");
    }

    #[test]
    fn localhost() {
        assert!(is_localhost("127.0.0.1"));
        assert!(is_localhost("host-localhost"));
        assert!(!is_localhost("LOCALHOST"));
        assert!(!is_localhost("10.0.0.1"));
    }
}
