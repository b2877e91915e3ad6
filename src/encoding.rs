use crate::error::*;

/// The UTF-8 byte-order mark.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Result of probing the raw bytes of a capture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
    /// Whether the file starts with a UTF-8 byte-order mark.
    pub has_bom: bool,
}

/// Strips a leading byte-order mark (if any) and checks that the remainder is valid UTF-8.
pub(crate) fn decode(bytes: &[u8]) -> Result<(Encoding, &str)> {
    let (has_bom, body) = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (true, rest),
        None => (false, bytes),
    };
    let text = simdutf8::compat::from_utf8(body)?;
    Ok((Encoding { has_bom }, text))
}
