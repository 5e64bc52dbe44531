use crate::util::Error;
use crate::ByteArray;

/// XOR two buffers byte-wise. If the lengths differ, the shorter buffer
/// repeats cyclically; the result is as long as the longer input. This is
/// repeating-key XOR: `xor(plaintext, key)` regardless of which is longer.
/// If either buffer is empty the result is a copy of the other.
pub fn xor(b1: &ByteArray, b2: &ByteArray) -> ByteArray {
    if b1.is_empty() || b2.is_empty() {
        let src = if !b1.is_empty() { b1 } else { b2 };
        return src.clone();
    }

    let length = b1.len().max(b2.len());
    let (a, b) = (b1.as_slice(), b2.as_slice());
    let bytes: Vec<u8> = (0..length)
        .map(|i| a[i % a.len()] ^ b[i % b.len()])
        .collect();
    ByteArray::from(bytes)
}

#[test]
fn test_fixed_xor() {
    let case_buf1 = ByteArray::from(&hex!("1c0111001f010100061a024b53535009181c"));
    let case_buf2 = ByteArray::from(&hex!("686974207468652062756c6c277320657965"));
    let expected = hex!("746865206b696420646f6e277420706c6179");
    let result = xor(&case_buf1, &case_buf2);
    assert_eq!(result.as_slice(), expected);
}

#[test]
fn test_repeating_key_xor() {
    let case = ByteArray::from("Burning 'em, if you ain't quick and nimble\nI go crazy when I hear a cymbal");
    let key = ByteArray::from("ICE");
    let encoded = xor(&case, &key);
    let expected = hex!("0b3637272a2b2e63622c2e69692a23693a2a3c6324202d623d63343c2a26226324272765272a282b2f20430a652e2c652a3124333a653e2b2027630c692b20283165286326302e27282f");
    assert_eq!(encoded.as_slice(), expected);
}

#[test]
fn test_xor_involution() {
    let buf = ByteArray::from("attack at dawn");
    let key = ByteArray::from("ICE");
    assert_eq!(xor(&xor(&buf, &key), &key), buf);
}

#[test]
fn test_xor_empty_is_identity() {
    let buf = ByteArray::from("anything");
    let empty = ByteArray::zeroed(0);
    assert_eq!(xor(&buf, &empty), buf);
    assert_eq!(xor(&empty, &buf), buf);
    assert_eq!(xor(&empty, &empty), empty);
}

/// Like [`xor`], but takes a single byte for convenience.
pub fn xor_byte(buf: &ByteArray, byte: u8) -> ByteArray {
    xor(buf, &ByteArray::from(&[byte][..]))
}

#[test]
fn test_xor_byte() {
    let buf = ByteArray::from(&hex!("00ff2a"));
    assert_eq!(xor_byte(&buf, 0x2a).as_slice(), hex!("2ad500"));
}

/// Population count across every byte of the buffer.
pub fn bit_count(buf: &ByteArray) -> usize {
    buf.as_slice()
        .iter()
        .map(|byte| byte.count_ones() as usize)
        .sum()
}

#[test]
fn test_bit_count() {
    assert_eq!(bit_count(&ByteArray::zeroed(8)), 0);
    assert_eq!(bit_count(&ByteArray::from(&hex!("ff0f"))), 12);
}

/// Bit-level Hamming distance. The buffers must be the same length.
pub fn hamming_distance(b1: &ByteArray, b2: &ByteArray) -> Result<usize, Error> {
    if b1.len() != b2.len() {
        return Err(Error::LengthMismatch { left: b1.len(), right: b2.len() });
    }
    Ok(bit_count(&xor(b1, b2)))
}

#[test]
fn test_hamming_distance() {
    let s1 = ByteArray::from("this is a test");
    let s2 = ByteArray::from("wokka wokka!!!");
    assert_eq!(hamming_distance(&s1, &s2), Ok(37));

    // symmetric, and zero against itself
    assert_eq!(hamming_distance(&s2, &s1), Ok(37));
    assert_eq!(hamming_distance(&s1, &s1), Ok(0));
}

#[test]
fn test_hamming_distance_length_mismatch() {
    let s1 = ByteArray::from("short");
    let s2 = ByteArray::from("rather longer");
    assert_eq!(
        hamming_distance(&s1, &s2),
        Err(Error::LengthMismatch { left: 5, right: 13 })
    );
}
