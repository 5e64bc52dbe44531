use crate::codec::hex;
use crate::ByteArray;

/// Printable ASCII, 0x20 to 0x7e inclusive. Control characters count as
/// unprintable even though tabs and newlines occur in real text: printed
/// control characters wreck aligned terminal output.
pub fn is_printable(byte: u8) -> bool {
    byte >= 0x20 && byte <= 0x7e
}

/// ASCII letter, either case.
pub fn is_letter(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

/// Exactly the ASCII space, 0x20.
pub fn is_space(byte: u8) -> bool {
    byte == b' '
}

#[test]
fn test_predicates() {
    assert!(is_printable(b' '));
    assert!(is_printable(b'~'));
    assert!(!is_printable(0x1f));
    assert!(!is_printable(0x7f));
    assert!(!is_printable(b'\t'));

    assert!(is_letter(b'A'));
    assert!(is_letter(b'z'));
    assert!(!is_letter(b'0'));

    assert!(is_space(b' '));
    assert!(!is_space(b'\t'));
}

/// Count the bytes satisfying `test`.
pub fn count<F>(buf: &ByteArray, test: F) -> usize
where
    F: Fn(u8) -> bool,
{
    buf.as_slice().iter().filter(|&&byte| test(byte)).count()
}

pub fn count_printable(buf: &ByteArray) -> usize {
    count(buf, is_printable)
}

pub fn count_unprintable(buf: &ByteArray) -> usize {
    buf.len() - count_printable(buf)
}

pub fn count_space(buf: &ByteArray) -> usize {
    count(buf, is_space)
}

/// Count ASCII letters, optionally counting spaces along with them.
pub fn count_letter(buf: &ByteArray, include_space: bool) -> usize {
    let mut result = count(buf, is_letter);
    if include_space {
        result += count_space(buf);
    }
    result
}

/// Count the bytes that are neither letters nor, when `include_space` is
/// false, spaces. The complement of [`count_letter`] with the flag flipped.
pub fn count_nonletter(buf: &ByteArray, include_space: bool) -> usize {
    buf.len() - count_letter(buf, !include_space)
}

pub fn count_byte(buf: &ByteArray, byte: u8) -> usize {
    count(buf, |b| b == byte)
}

pub fn count_nonbyte(buf: &ByteArray, byte: u8) -> usize {
    buf.len() - count_byte(buf, byte)
}

#[test]
fn test_counts() {
    let buf = ByteArray::from("It's A-OK.\t");
    assert_eq!(count_printable(&buf), 10);
    assert_eq!(count_unprintable(&buf), 1);
    assert_eq!(count_space(&buf), 1);
    assert_eq!(count_letter(&buf, false), 6);
    assert_eq!(count_letter(&buf, true), 7);
    assert_eq!(count_nonletter(&buf, false), 4);
    assert_eq!(count_nonletter(&buf, true), 5);
    assert_eq!(count_byte(&buf, b'\''), 1);
    assert_eq!(count_nonbyte(&buf, b'\''), 10);
}

const LETTER_COUNT: usize = 26;

/// Average frequencies of the letters a-z in English.
/// https://en.wikipedia.org/wiki/Letter_frequency
pub const ENGLISH_LETTER_FREQUENCY: [f64; LETTER_COUNT] = [
    /* a */ 0.08167,
    /* b */ 0.01492,
    /* c */ 0.02782,
    /* d */ 0.04253,
    /* e */ 0.12702,
    /* f */ 0.02228,
    /* g */ 0.02015,
    /* h */ 0.06094,
    /* i */ 0.06966,
    /* j */ 0.00153,
    /* k */ 0.00772,
    /* l */ 0.04025,
    /* m */ 0.02406,
    /* n */ 0.06749,
    /* o */ 0.07507,
    /* p */ 0.01929,
    /* q */ 0.00095,
    /* r */ 0.05987,
    /* s */ 0.06327,
    /* t */ 0.09056,
    /* u */ 0.02758,
    /* v */ 0.00978,
    /* w */ 0.02361,
    /* x */ 0.00150,
    /* y */ 0.01974,
    /* z */ 0.00074,
];

/// Relative frequency of each letter among the letter bytes only,
/// case-insensitive. All zeros when the buffer contains no letters.
pub fn letter_frequencies(buf: &ByteArray) -> [f64; LETTER_COUNT] {
    let mut counts = [0usize; LETTER_COUNT];
    for &byte in buf.as_slice() {
        if is_letter(byte) {
            counts[((byte | 0x20) - b'a') as usize] += 1;
        }
    }

    let total: usize = counts.iter().sum();
    let mut frequencies = [0.0; LETTER_COUNT];
    if total > 0 {
        for (frequency, &count) in frequencies.iter_mut().zip(counts.iter()) {
            *frequency = count as f64 / total as f64;
        }
    }
    frequencies
}

#[test]
fn test_letter_frequencies() {
    let frequencies = letter_frequencies(&ByteArray::from("aAbb, bB?"));
    assert_eq!(frequencies[0], 1.0 / 3.0);
    assert_eq!(frequencies[1], 2.0 / 3.0);
    assert_eq!(frequencies[2], 0.0);

    let none = letter_frequencies(&ByteArray::from("123 !"));
    assert!(none.iter().all(|&f| f == 0.0));
}

/// Root-mean-square of each letter's absolute deviation from the English
/// reference frequencies. Lower is better; this is a deviation metric, not
/// bounded to [0, 1] by construction.
pub fn letter_frequency_score(buf: &ByteArray) -> f64 {
    let frequencies = letter_frequencies(buf);

    let sum_of_squares: f64 = frequencies
        .iter()
        .zip(ENGLISH_LETTER_FREQUENCY.iter())
        .map(|(actual, expected)| (actual - expected).abs().powi(2))
        .sum();

    (sum_of_squares / LETTER_COUNT as f64).sqrt()
}

#[test]
fn test_letter_frequency_score() {
    let english = letter_frequency_score(&ByteArray::from(
        "the quick brown fox jumps over the lazy dog and then some more sentences of it",
    ));
    let junk = letter_frequency_score(&ByteArray::from("zzzzqqqqjjjjxxxx"));
    assert!(english < junk);
    assert!(english < 0.055);
    assert!(junk > 0.055);
}

/* Scoring heuristics */

/// Estimate of the average English line length.
const ENGLISH_LINE_LENGTH: usize = 40;

/// The average English word is 5 letters, so a space about every 6th byte.
const ENGLISH_WORD_LENGTH: usize = 5;
const ENGLISH_SPACE_LENGTH: usize = ENGLISH_WORD_LENGTH + 1;

/// English punctuation runs 208.7 per 1000 words, about one every 28
/// characters.
const ENGLISH_PUNCTUATION_LENGTH: usize = (ENGLISH_SPACE_LENGTH * 1000) / 209;

const EXPECTED_SPACE_FREQUENCY: f64 = 1.0 / ENGLISH_SPACE_LENGTH as f64;

/// Space-frequency deviations at or below "good" score as zero; past "max"
/// the whole factor collapses to zero.
const GOOD_SPACE_DEVIATION: f64 = 0.008;
const MAX_SPACE_DEVIATION: f64 = 0.08;

/// Same thresholds for the RMS letter-frequency deviation. Good English
/// sits around 0.0045; candidates stop looking like English near 0.055.
const GOOD_ENGLISH_DEVIATION: f64 = 0.04;
const MAX_ENGLISH_DEVIATION: f64 = 0.055;

/// Allow a few unprintables, like tabs or newlines: a quarter of an
/// estimated 40-character line.
fn max_unprintable(length: usize) -> usize {
    length / (ENGLISH_LINE_LENGTH / 4)
}

/// Non-letters cover punctuation but not spaces: up to one every 4 bytes,
/// seven times the typical English punctuation frequency.
fn max_nonletter(length: usize) -> usize {
    length / (ENGLISH_PUNCTUATION_LENGTH / 7)
}

/// Deviations up to `good_deviation` count as no deviation at all; larger
/// ones are reduced by it.
fn scale_good_deviation(deviation: f64, good_deviation: f64) -> f64 {
    if deviation <= good_deviation {
        0.0
    } else {
        deviation - good_deviation
    }
}

/// Map a deviation onto a [0, 1] factor: zero past `max_deviation`, 1.0 at
/// zero deviation (including when `max_deviation` is itself zero), linear
/// in between.
fn score_max_deviation(deviation: f64, max_deviation: f64) -> f64 {
    debug_assert!(deviation >= 0.0);
    debug_assert!(max_deviation >= 0.0);

    if deviation > max_deviation {
        0.0
    } else if deviation <= f64::EPSILON && max_deviation <= f64::EPSILON {
        1.0
    } else {
        (max_deviation - deviation) / max_deviation
    }
}

fn score_max_count(count: usize, max_count: usize) -> f64 {
    score_max_deviation(count as f64, max_count as f64)
}

#[test]
fn test_score_max_deviation() {
    assert_eq!(score_max_deviation(0.2, 0.1), 0.0);
    assert_eq!(score_max_deviation(0.0, 0.0), 1.0);
    assert_eq!(score_max_deviation(0.0, 0.1), 1.0);
    assert!((score_max_deviation(0.05, 0.1) - 0.5).abs() < 1e-12);
    assert_eq!(score_max_count(3, 2), 0.0);
    assert_eq!(score_max_count(0, 0), 1.0);
}

/// How likely is it that `buf` is English text? Returns a value in
/// [0.0, 1.0], higher is better: the product of four independent factors
/// (unprintables, non-letters, space frequency, letter frequency).
///
/// An empty buffer scores 1.0: every factor is neutral and no ratio is
/// computed, so the scorer never errors.
pub fn score_english_text(buf: &ByteArray) -> f64 {
    let length = buf.len();
    if length == 0 {
        return 1.0;
    }

    /* English generally doesn't contain unprintables or non-letters.
     * On average, English text has certain letter and space frequencies. */

    let unprintable_factor = score_max_count(count_unprintable(buf), max_unprintable(length));

    let nonletter_factor = score_max_count(count_nonletter(buf, false), max_nonletter(length));

    let space_frequency = count_space(buf) as f64 / length as f64;
    let space_deviation = (space_frequency - EXPECTED_SPACE_FREQUENCY).abs();
    let space_factor = score_max_deviation(
        scale_good_deviation(space_deviation, GOOD_SPACE_DEVIATION),
        MAX_SPACE_DEVIATION,
    );

    let english_deviation = letter_frequency_score(buf);
    let english_factor = score_max_deviation(
        scale_good_deviation(english_deviation, GOOD_ENGLISH_DEVIATION),
        MAX_ENGLISH_DEVIATION,
    );

    let result = unprintable_factor * nonletter_factor * space_factor * english_factor;
    debug_assert!((0.0..=1.0).contains(&result));
    result
}

#[test]
fn test_score_english_text() {
    let english = score_english_text(&ByteArray::from("Cooking MC's like a pound of bacon"));
    assert!(english > 0.7);
    assert!(english <= 1.0);

    // unprintables collapse the score outright
    assert_eq!(score_english_text(&ByteArray::from(&hex!("000102030405"))), 0.0);

    // blocks of letters with no spaces fail the space-frequency factor
    assert_eq!(score_english_text(&ByteArray::from("abcdefghijabcdefghij")), 0.0);
}

#[test]
fn test_score_english_text_empty_is_neutral() {
    assert_eq!(score_english_text(&ByteArray::zeroed(0)), 1.0);
}

/// Render a buffer for display: printable ASCII verbatim, everything else
/// as a lowercase `\xHH` escape.
pub fn escape_string(buf: &ByteArray) -> String {
    let mut out = String::with_capacity(buf.len());
    for &byte in buf.as_slice() {
        if is_printable(byte) {
            out.push(byte as char);
        } else {
            let (msb, lsb) = hex::byte_to_pair(byte);
            out.push('\\');
            out.push('x');
            out.push(msb);
            out.push(lsb);
        }
    }
    out
}

#[test]
fn test_escape_string() {
    assert_eq!(escape_string(&ByteArray::from("plain text")), "plain text");
    assert_eq!(escape_string(&ByteArray::from("AB\nC")), "AB\\x0aC");
    assert_eq!(escape_string(&ByteArray::from(&hex!("ff"))), "\\xff");
    assert_eq!(escape_string(&ByteArray::zeroed(0)), "");
}
