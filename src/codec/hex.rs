use crate::util::Error;
use crate::ByteArray;

pub const HEXCHARS_PER_BYTE: usize = 2;
pub const HEX_BIT: u32 = 4;

/// Character sets accepted while parsing. Multiple letter cases can be
/// simultaneously valid on input, so this is distinct from [`Output`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    Any,
    LowerOnly,
    UpperOnly,
}

impl Accept {
    fn lowercase(self) -> bool {
        matches!(self, Accept::Any | Accept::LowerOnly)
    }

    fn uppercase(self) -> bool {
        matches!(self, Accept::Any | Accept::UpperOnly)
    }
}

/// Letter case produced when encoding. Exactly one case is ever emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Lower,
    Upper,
}

pub fn is_valid_char(c: char, accept: Accept) -> bool {
    c.is_ascii_digit()
        || (accept.lowercase() && ('a'..='f').contains(&c))
        || (accept.uppercase() && ('A'..='F').contains(&c))
}

#[test]
fn test_is_valid_char() {
    assert!(is_valid_char('0', Accept::LowerOnly));
    assert!(is_valid_char('9', Accept::UpperOnly));
    assert!(is_valid_char('a', Accept::Any));
    assert!(is_valid_char('F', Accept::Any));
    assert!(!is_valid_char('A', Accept::LowerOnly));
    assert!(!is_valid_char('f', Accept::UpperOnly));
    assert!(!is_valid_char('g', Accept::Any));
    assert!(!is_valid_char(' ', Accept::Any));
}

/// Convert a hex character to its 4-bit value. `None` if the character is
/// outside the accepted set.
pub fn char_to_nybble(c: char, accept: Accept) -> Option<u8> {
    if !is_valid_char(c, accept) {
        return None;
    }

    let low = c.to_ascii_lowercase();
    let nybble = match low {
        '0'..='9' => low as u8 - b'0',
        // letters continue from where the digits leave off
        'a'..='f' => (low as u8 - b'a') + (b'9' - b'0' + 1),
        _ => unreachable!(),
    };

    debug_assert!(nybble < 16);
    Some(nybble)
}

#[test]
fn test_char_to_nybble() {
    assert_eq!(char_to_nybble('0', Accept::Any), Some(0));
    assert_eq!(char_to_nybble('9', Accept::Any), Some(9));
    assert_eq!(char_to_nybble('a', Accept::LowerOnly), Some(10));
    assert_eq!(char_to_nybble('f', Accept::Any), Some(15));
    assert_eq!(char_to_nybble('A', Accept::Any), Some(10));
    assert_eq!(char_to_nybble('F', Accept::UpperOnly), Some(15));
    assert_eq!(char_to_nybble('A', Accept::LowerOnly), None);
    assert_eq!(char_to_nybble('x', Accept::Any), None);
}

/// Convert a 4-bit value to a hex character. `nybble < 16` is a contract.
pub fn nybble_to_char(nybble: u8, output: Output) -> char {
    assert!(nybble < 16);

    let c = match nybble {
        0..=9 => (b'0' + nybble) as char,
        _ => (b'a' + (nybble - 10)) as char,
    };

    match output {
        Output::Lower => c,
        Output::Upper => c.to_ascii_uppercase(),
    }
}

#[test]
fn test_nybble_to_char() {
    assert_eq!(nybble_to_char(0, Output::Lower), '0');
    assert_eq!(nybble_to_char(10, Output::Lower), 'a');
    assert_eq!(nybble_to_char(15, Output::Upper), 'F');

    for nybble in 0..16 {
        let c = nybble_to_char(nybble, Output::Lower);
        assert_eq!(char_to_nybble(c, Accept::LowerOnly), Some(nybble));
    }
}

#[test]
#[should_panic]
fn test_nybble_to_char_rejects_wide_values() {
    nybble_to_char(16, Output::Lower);
}

/// Convert two hex characters into a byte, most-significant nybble first.
/// Accepts either letter case.
pub fn pair_to_byte(msb: char, lsb: char) -> Option<u8> {
    let hi = char_to_nybble(msb, Accept::Any)?;
    let lo = char_to_nybble(lsb, Accept::Any)?;
    Some((hi << HEX_BIT) | lo)
}

/// Convert a byte into two lowercase hex characters, most-significant
/// nybble first.
pub fn byte_to_pair(byte: u8) -> (char, char) {
    (
        nybble_to_char(byte >> HEX_BIT, Output::Lower),
        nybble_to_char(byte & 0x0f, Output::Lower),
    )
}

#[test]
fn test_pair_round_trip() {
    assert_eq!(pair_to_byte('4', '9'), Some(0x49));
    assert_eq!(pair_to_byte('f', 'E'), Some(0xfe));
    assert_eq!(pair_to_byte('g', '0'), None);
    assert_eq!(byte_to_pair(0x49), ('4', '9'));
    assert_eq!(byte_to_pair(0xfe), ('f', 'e'));
}

/// Decode a hex string into bytes, two characters per byte. An odd-length
/// input behaves as if padded with a trailing `'0'`, so the final byte's
/// low nybble is zero. The empty string decodes to an empty buffer.
pub fn decode(hexstr: &str, accept: Accept) -> Result<ByteArray, Error> {
    let chars: Vec<char> = hexstr.chars().collect();
    let mut bytes = Vec::with_capacity(chars.len().div_ceil(HEXCHARS_PER_BYTE));

    for (i, pair) in chars.chunks(HEXCHARS_PER_BYTE).enumerate() {
        let msb = pair[0];
        let lsb = if pair.len() > 1 { pair[1] } else { '0' };

        let offset = i * HEXCHARS_PER_BYTE;
        let hi = char_to_nybble(msb, accept)
            .ok_or(Error::InvalidHexChar { char: msb, offset })?;
        let lo = char_to_nybble(lsb, accept)
            .ok_or(Error::InvalidHexChar { char: lsb, offset: offset + 1 })?;

        bytes.push((hi << HEX_BIT) | lo);
    }

    Ok(ByteArray::from(bytes))
}

#[test]
fn test_decode() {
    let decoded = decode("49276d", Accept::Any).unwrap();
    assert_eq!(decoded.as_slice(), b"I'm");

    assert_eq!(decode("", Accept::Any).unwrap(), ByteArray::zeroed(0));
    assert_eq!(decode("FFfe", Accept::Any).unwrap().as_slice(), hex!("fffe"));
}

#[test]
fn test_decode_odd_length() {
    // trailing nybble is the high half of the final byte
    assert_eq!(decode("abc", Accept::Any).unwrap().as_slice(), hex!("abc0"));
    assert_eq!(decode("1", Accept::Any).unwrap().as_slice(), hex!("10"));
}

#[test]
fn test_decode_rejects_invalid_chars() {
    assert_eq!(
        decode("49z7", Accept::Any),
        Err(Error::InvalidHexChar { char: 'z', offset: 2 })
    );
    assert_eq!(
        decode("49 7", Accept::Any),
        Err(Error::InvalidHexChar { char: ' ', offset: 2 })
    );
    assert_eq!(
        decode("4A", Accept::LowerOnly),
        Err(Error::InvalidHexChar { char: 'A', offset: 1 })
    );
    assert_eq!(
        decode("4a", Accept::UpperOnly),
        Err(Error::InvalidHexChar { char: 'a', offset: 1 })
    );
}

/// Encode bytes as lowercase hex, two characters per byte, no prefix.
pub fn encode(buf: &ByteArray) -> String {
    let mut hexstr = String::with_capacity(buf.len() * HEXCHARS_PER_BYTE);
    for &byte in buf.as_slice() {
        let (msb, lsb) = byte_to_pair(byte);
        hexstr.push(msb);
        hexstr.push(lsb);
    }
    hexstr
}

#[test]
fn test_encode() {
    assert_eq!(encode(&ByteArray::from("I'm")), "49276d");
    assert_eq!(encode(&ByteArray::zeroed(0)), "");
    assert_eq!(encode(&ByteArray::from(&hex!("fffe"))), "fffe");
}

#[cfg(test)]
mod round_trip_tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_round_trip_random() {
        let mut bytes = vec![0u8; 64];
        rand::thread_rng().fill_bytes(&mut bytes);
        let buf = ByteArray::from(bytes.as_slice());

        let encoded = encode(&buf);
        assert_eq!(decode(&encoded, Accept::LowerOnly).unwrap(), buf);

        // cross-check against the hex crate
        assert_eq!(encoded, ::hex::encode(&bytes));
    }
}
