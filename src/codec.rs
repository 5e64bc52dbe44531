use crate::util::Error;
use crate::ByteArray;

pub mod base64;
pub mod hex;

/// Strip invalid characters from the end of a line, working backward from
/// the last character. Leaves everything before the first trailing invalid
/// run untouched.
pub fn strip_trailing_non_hex(line: &str) -> &str {
    line.trim_end_matches(|c: char| !hex::is_valid_char(c, hex::Accept::Any))
}

/// Like [`strip_trailing_non_hex`], for base64 lines. Trailing `'='` padding
/// is stripped along with newlines and carriage returns; the decoder treats
/// missing characters as zero bits anyway.
pub fn strip_trailing_non_base64(line: &str) -> &str {
    line.trim_end_matches(|c: char| !base64::is_valid_char(c, base64::Accept::Any, false))
}

#[test]
fn test_strip_trailing() {
    assert_eq!(strip_trailing_non_hex("49276d\r\n"), "49276d");
    assert_eq!(strip_trailing_non_hex(""), "");
    assert_eq!(strip_trailing_non_base64("SSdtIQ==\n"), "SSdtIQ");
    assert_eq!(strip_trailing_non_base64("SSdtIQ"), "SSdtIQ");
}

/// Decode newline-delimited hex into one buffer per non-empty line.
pub fn decode_hex_lines(contents: &str) -> Result<Vec<ByteArray>, Error> {
    contents
        .lines()
        .map(strip_trailing_non_hex)
        .filter(|line| !line.is_empty())
        .map(|line| hex::decode(line, hex::Accept::Any))
        .collect()
}

#[test]
fn test_decode_hex_lines() {
    let contents = "0102\r\n\nfffe\n";
    let decoded = decode_hex_lines(contents).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].as_slice(), hex!("0102"));
    assert_eq!(decoded[1].as_slice(), hex!("fffe"));
}

/// Decode a multi-line base64 blob: each non-empty line is decoded, and the
/// results are concatenated into a single buffer in line order.
pub fn decode_base64_lines(contents: &str) -> Result<ByteArray, Error> {
    let mut decoded = ByteArray::zeroed(0);
    for line in contents.lines() {
        let line = strip_trailing_non_base64(line);
        if line.is_empty() {
            continue;
        }
        decoded = decoded.concat(&base64::decode(line)?)?;
    }
    Ok(decoded)
}

#[test]
fn test_decode_base64_lines() {
    // "ManMan" split over two lines; blank line skipped
    let contents = "TWFu\n\nTWFu\n";
    let decoded = decode_base64_lines(contents).unwrap();
    assert_eq!(decoded.as_slice(), b"ManMan");
}

#[test]
fn test_decode_base64_lines_rejects_inner_garbage() {
    assert!(decode_base64_lines("TW Fu\n").is_err());
}
