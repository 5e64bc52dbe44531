use crate::util::Error;
use crate::ByteArray;

/// One base64 block: 4 characters of 6 bits each, 3 bytes of 8 bits each.
pub const CHARS_PER_BLOCK: usize = 4;
pub const BYTES_PER_BLOCK: usize = 3;

const VALUE_MASK: u8 = 0x3f;
const PADDING_CHAR: char = '=';

/// Character sets accepted while decoding. The variant characters for 62
/// (`'+'`, `'-'`, `'.'`) and 63 (`'/'`, `'_'`) all decode to the same
/// values, so [`Accept::Any`] can take them simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    Any,
    PlusSlash,
    DashUnderscore,
    PeriodUnderscore,
}

impl Accept {
    fn plus(self) -> bool {
        matches!(self, Accept::Any | Accept::PlusSlash)
    }

    fn slash(self) -> bool {
        matches!(self, Accept::Any | Accept::PlusSlash)
    }

    fn dash(self) -> bool {
        matches!(self, Accept::Any | Accept::DashUnderscore)
    }

    fn period(self) -> bool {
        matches!(self, Accept::Any | Accept::PeriodUnderscore)
    }

    fn underscore(self) -> bool {
        matches!(
            self,
            Accept::Any | Accept::DashUnderscore | Accept::PeriodUnderscore
        )
    }
}

/// Alphabet produced when encoding. "Accept any" makes no sense on output,
/// because the variant characters are indistinguishable by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    PlusSlash,
    DashUnderscore,
    PeriodUnderscore,
}

pub fn is_valid_char(c: char, accept: Accept, accept_padding: bool) -> bool {
    if c.is_ascii_alphanumeric() {
        return true;
    }
    match c {
        '+' => accept.plus(),
        '/' => accept.slash(),
        '-' => accept.dash(),
        '.' => accept.period(),
        '_' => accept.underscore(),
        PADDING_CHAR => accept_padding,
        _ => false,
    }
}

#[test]
fn test_is_valid_char() {
    assert!(is_valid_char('A', Accept::PlusSlash, false));
    assert!(is_valid_char('z', Accept::DashUnderscore, false));
    assert!(is_valid_char('0', Accept::PeriodUnderscore, false));
    assert!(is_valid_char('+', Accept::Any, false));
    assert!(!is_valid_char('+', Accept::DashUnderscore, false));
    assert!(is_valid_char('_', Accept::PeriodUnderscore, false));
    assert!(!is_valid_char('_', Accept::PlusSlash, false));
    assert!(is_valid_char('=', Accept::Any, true));
    assert!(!is_valid_char('=', Accept::Any, false));
    assert!(!is_valid_char(' ', Accept::Any, true));
    assert!(!is_valid_char('\n', Accept::Any, true));
}

/// Convert a base64 character to its 6-bit value. `None` if the character
/// is outside the accepted set. Padding is not a value and is never
/// accepted here.
pub fn char_to_value(c: char, accept: Accept) -> Option<u8> {
    if !is_valid_char(c, accept, false) {
        return None;
    }

    let value = match c {
        'A'..='Z' => c as u8 - b'A',
        'a'..='z' => (c as u8 - b'a') + (b'Z' - b'A' + 1),
        '0'..='9' => (c as u8 - b'0') + (b'Z' - b'A' + 1) + (b'z' - b'a' + 1),
        '+' | '-' | '.' => 62,
        '/' | '_' => 63,
        _ => unreachable!(),
    };

    debug_assert!(value < 64);
    Some(value)
}

#[test]
fn test_char_to_value() {
    assert_eq!(char_to_value('A', Accept::Any), Some(0));
    assert_eq!(char_to_value('Z', Accept::Any), Some(25));
    assert_eq!(char_to_value('a', Accept::Any), Some(26));
    assert_eq!(char_to_value('z', Accept::Any), Some(51));
    assert_eq!(char_to_value('0', Accept::Any), Some(52));
    assert_eq!(char_to_value('9', Accept::Any), Some(61));
    // all three 62 variants, both 63 variants
    assert_eq!(char_to_value('+', Accept::Any), Some(62));
    assert_eq!(char_to_value('-', Accept::Any), Some(62));
    assert_eq!(char_to_value('.', Accept::Any), Some(62));
    assert_eq!(char_to_value('/', Accept::Any), Some(63));
    assert_eq!(char_to_value('_', Accept::Any), Some(63));
    assert_eq!(char_to_value('-', Accept::PlusSlash), None);
    assert_eq!(char_to_value('=', Accept::Any), None);
}

/// Convert a 6-bit value to a base64 character. `value < 64` is a contract.
pub fn value_to_char(value: u8, output: Output) -> char {
    assert!(value < 64);

    match value {
        0..=25 => (b'A' + value) as char,
        26..=51 => (b'a' + (value - 26)) as char,
        52..=61 => (b'0' + (value - 52)) as char,
        62 => match output {
            Output::PlusSlash => '+',
            Output::DashUnderscore => '-',
            Output::PeriodUnderscore => '.',
        },
        _ => match output {
            Output::PlusSlash => '/',
            Output::DashUnderscore | Output::PeriodUnderscore => '_',
        },
    }
}

#[test]
fn test_value_to_char() {
    assert_eq!(value_to_char(0, Output::PlusSlash), 'A');
    assert_eq!(value_to_char(51, Output::PlusSlash), 'z');
    assert_eq!(value_to_char(62, Output::PlusSlash), '+');
    assert_eq!(value_to_char(62, Output::DashUnderscore), '-');
    assert_eq!(value_to_char(62, Output::PeriodUnderscore), '.');
    assert_eq!(value_to_char(63, Output::PlusSlash), '/');
    assert_eq!(value_to_char(63, Output::DashUnderscore), '_');

    for value in 0..64 {
        let c = value_to_char(value, Output::PlusSlash);
        assert_eq!(char_to_value(c, Accept::PlusSlash), Some(value));
    }
}

fn pack(values: [u8; CHARS_PER_BLOCK]) -> [u8; BYTES_PER_BLOCK] {
    [
        (values[0] << 2) | (values[1] >> 4),
        (values[1] << 4) | (values[2] >> 2),
        (values[2] << 6) | values[3],
    ]
}

fn unpack(bytes: [u8; BYTES_PER_BLOCK]) -> [u8; CHARS_PER_BLOCK] {
    [
        bytes[0] >> 2,
        ((bytes[0] & (VALUE_MASK >> 4)) << 4) | (bytes[1] >> 4),
        ((bytes[1] & (VALUE_MASK >> 2)) << 2) | (bytes[2] >> 6),
        bytes[2] & VALUE_MASK,
    ]
}

/// Decode one 4-character block into 3 bytes. Accepts every character-set
/// variant at once; `'='` padding is skipped, leaving its bits zero.
pub fn block_to_bytes(chars: [char; CHARS_PER_BLOCK]) -> Option<[u8; BYTES_PER_BLOCK]> {
    let mut values = [0u8; CHARS_PER_BLOCK];
    for (value, &c) in values.iter_mut().zip(chars.iter()) {
        if c != PADDING_CHAR {
            *value = char_to_value(c, Accept::Any)?;
        }
    }
    Some(pack(values))
}

/// Encode 3 bytes as one 4-character block of the `+/` alphabet.
pub fn bytes_to_block(bytes: [u8; BYTES_PER_BLOCK]) -> [char; CHARS_PER_BLOCK] {
    unpack(bytes).map(|value| value_to_char(value, Output::PlusSlash))
}

#[test]
fn test_block_round_trip() {
    assert_eq!(block_to_bytes(['T', 'W', 'F', 'u']), Some(*b"Man"));
    assert_eq!(bytes_to_block(*b"Man"), ['T', 'W', 'F', 'u']);
    assert_eq!(block_to_bytes(['T', 'W', '*', 'u']), None);

    // padding decodes as zero bits
    assert_eq!(block_to_bytes(['Q', 'Q', '=', '=']), Some([0x41, 0, 0]));
}

/// Decode a base64 string into bytes. All character-set variants are
/// accepted simultaneously; `'='` padding is tolerated but never required.
/// The input is rounded up to a whole number of 4-character blocks, with
/// missing trailing characters treated as `'A'`, so the output length is
/// always `ceil(chars / 4) * 3`. Exact byte counts are not recoverable from
/// base64 without external metadata; the trailing zero bytes on
/// non-block-aligned input are accepted imprecision.
pub fn decode(base64str: &str) -> Result<ByteArray, Error> {
    let chars: Vec<char> = base64str.chars().collect();
    let block_count = chars.len().div_ceil(CHARS_PER_BLOCK);
    let mut bytes = Vec::with_capacity(block_count * BYTES_PER_BLOCK);

    for (block_index, block) in chars.chunks(CHARS_PER_BLOCK).enumerate() {
        let mut values = [0u8; CHARS_PER_BLOCK];
        for (j, &c) in block.iter().enumerate() {
            if c == PADDING_CHAR {
                continue;
            }
            values[j] = char_to_value(c, Accept::Any).ok_or(Error::InvalidBase64Char {
                char: c,
                offset: block_index * CHARS_PER_BLOCK + j,
            })?;
        }
        // a short final block reads as if completed with 'A' characters
        bytes.extend_from_slice(&pack(values));
    }

    Ok(ByteArray::from(bytes))
}

#[test]
fn test_decode() {
    assert_eq!(decode("TWFu").unwrap().as_slice(), b"Man");
    assert_eq!(decode("").unwrap(), ByteArray::zeroed(0));

    // every 62/63 variant accepted at once
    assert_eq!(
        decode("+/++").unwrap(),
        decode("-_.-").unwrap(),
    );
}

#[test]
fn test_decode_padding_optional() {
    let padded = decode("QQ==").unwrap();
    let unpadded = decode("QQ").unwrap();
    assert_eq!(padded, unpadded);
    assert_eq!(padded.as_slice(), [0x41, 0, 0]);
}

#[test]
fn test_decode_rounds_up_to_whole_blocks() {
    // 6 chars -> 2 blocks -> 6 bytes, missing chars read as 'A'
    let decoded = decode("TWFuTQ").unwrap();
    assert_eq!(decoded.len(), 6);
    assert_eq!(decoded.as_slice(), b"ManM\x00\x00");
}

#[test]
fn test_decode_rejects_whitespace() {
    assert_eq!(
        decode("TW\nFu"),
        Err(Error::InvalidBase64Char { char: '\n', offset: 2 })
    );
    assert_eq!(
        decode("TWFu TWFu"),
        Err(Error::InvalidBase64Char { char: ' ', offset: 4 })
    );
}

/// Encode bytes as base64 in the `+/` alphabet. No `'='` padding is ever
/// emitted; the output length is always `ceil(bytes / 3) * 4`, with missing
/// trailing bytes in the final block treated as zero.
pub fn encode(buf: &ByteArray) -> String {
    let block_count = buf.len().div_ceil(BYTES_PER_BLOCK);
    let mut base64str = String::with_capacity(block_count * CHARS_PER_BLOCK);

    for block in buf.as_slice().chunks(BYTES_PER_BLOCK) {
        let mut bytes = [0u8; BYTES_PER_BLOCK];
        bytes[..block.len()].copy_from_slice(block);
        for c in bytes_to_block(bytes) {
            base64str.push(c);
        }
    }

    base64str
}

#[test]
fn test_encode() {
    assert_eq!(encode(&ByteArray::from("Man")), "TWFu");
    assert_eq!(encode(&ByteArray::zeroed(0)), "");

    // final block zero-filled, never padded with '='
    assert_eq!(encode(&ByteArray::from(&[0x41][..])), "QQAA");
}

#[test]
fn test_hex_to_base64_challenge_vector() {
    let bytes = super::hex::decode(
        "49276d206b696c6c696e6720796f757220627261696e206c696b65206120706f69736f6e6f7573206d757368726f6f6d",
        super::hex::Accept::Any,
    )
    .unwrap();
    assert_eq!(
        encode(&bytes),
        "SSdtIGtpbGxpbmcgeW91ciBicmFpbiBsaWtlIGEgcG9pc29ub3VzIG11c2hyb29t"
    );
}

#[cfg(test)]
mod round_trip_tests {
    use super::*;
    use ::base64::engine::general_purpose::STANDARD_NO_PAD;
    use ::base64::Engine as _;
    use rand::RngCore;

    #[test]
    fn test_round_trip_random_block_aligned() {
        let mut bytes = vec![0u8; 48];
        rand::thread_rng().fill_bytes(&mut bytes);
        let buf = ByteArray::from(bytes.as_slice());

        let encoded = encode(&buf);
        assert_eq!(decode(&encoded).unwrap(), buf);

        // on block-aligned input our unpadded output matches the base64 crate
        assert_eq!(encoded, STANDARD_NO_PAD.encode(&bytes));
        assert_eq!(STANDARD_NO_PAD.decode(&encoded).unwrap(), bytes);
    }

    #[test]
    fn test_round_trip_pads_to_block_boundary() {
        let buf = ByteArray::from("blocks!");

        let decoded = decode(&encode(&buf)).unwrap();
        // round-trip output is the input zero-padded to the next 3-byte block
        assert_eq!(decoded.as_slice(), b"blocks!\x00\x00");
    }
}
