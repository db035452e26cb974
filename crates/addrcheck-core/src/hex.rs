//! Character-level helpers for the `0x` + 40-hex-digit address shape.
//!
//! Syntax checking is a plain byte scan rather than a regex: verify the
//! length, the prefix, and that every remaining byte is a hex digit. This
//! keeps the validity predicate portable and allocation-free.

use std::fmt::Write;

/// Total length of a hex address: `0x` prefix plus 40 digits.
pub const ADDRESS_LEN: usize = 42;

/// Length of the address body (hex digits after the prefix).
pub const BODY_LEN: usize = 40;

/// Converts a single ASCII hex digit to its numeric value.
#[must_use]
pub fn hex_digit_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Returns true iff `candidate` is exactly 42 bytes: `0`, `x` (either case),
/// then 40 hex digits. Case of the digits is not constrained here.
#[must_use]
pub fn is_well_formed(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    bytes.len() == ADDRESS_LEN
        && bytes[0] == b'0'
        && (bytes[1] == b'x' || bytes[1] == b'X')
        && bytes[2..].iter().all(|&c| hex_digit_value(c).is_some())
}

/// Parses a well-formed address string into its 20 raw bytes.
///
/// Returns `None` if `candidate` is not well-formed.
#[must_use]
pub fn parse_address_array(candidate: &str) -> Option<[u8; 20]> {
    if !is_well_formed(candidate) {
        return None;
    }

    let body = &candidate.as_bytes()[2..];
    let mut array = [0u8; 20];
    for (i, chunk) in body.chunks(2).enumerate() {
        let high = hex_digit_value(chunk[0])?;
        let low = hex_digit_value(chunk[1])?;
        array[i] = (high << 4) | low;
    }

    Some(array)
}

/// Formats 20 raw bytes as a lower-case `0x`-prefixed address string.
///
/// The output is unchecksummed; pass it through the checksum engine for the
/// canonical mixed-case form.
#[must_use]
pub fn format_address(address: &[u8; 20]) -> String {
    let mut out = String::with_capacity(ADDRESS_LEN);
    out.push_str("0x");
    for byte in address {
        let _ = write!(&mut out, "{byte:02x}");
    }
    out
}
