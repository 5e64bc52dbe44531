use std::ops::RangeInclusive;

use itertools::Itertools;

use crate::bits;
use crate::score;
use crate::util::transpose;
use crate::ByteArray;

/// Acceptance threshold for single-byte brute force candidates.
pub const MIN_ENGLISH_TEXT_SCORE: f64 = 0.1;

/// Candidate key lengths tried by the repeating-key break.
pub const MAX_KEY_LENGTH: usize = 40;

/// How many of the best-ranked key lengths the full break decrypts with.
const KEY_LENGTH_ATTEMPTS: usize = 5;

/// One surviving key from the single-byte brute force.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub key: u8,
    pub score: f64,
    pub plaintext: ByteArray,
}

/// Try all 256 single-byte XOR keys against `ciphertext` and keep every
/// candidate whose decryption scores at least [`MIN_ENGLISH_TEXT_SCORE`].
/// Candidates are returned in key-byte order; ties are not broken.
pub fn break_single_byte_xor(ciphertext: &ByteArray) -> Vec<Candidate> {
    (0..=u8::MAX)
        .map(|key| {
            let plaintext = bits::xor_byte(ciphertext, key);
            let score = score::score_english_text(&plaintext);
            Candidate { key, score, plaintext }
        })
        .filter(|candidate| candidate.score >= MIN_ENGLISH_TEXT_SCORE)
        .collect()
}

#[test]
fn test_break_single_byte_xor() {
    let case = ByteArray::from(&hex!(
        "1b37373331363f78151b7f2b783431333d78397828372d363c78373e783a393b3736"
    ));
    let candidates = break_single_byte_xor(&case);

    // exactly one key clears the threshold
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].key, 0x58);
    assert!(candidates[0].score >= MIN_ENGLISH_TEXT_SCORE);
    assert_eq!(
        candidates[0].plaintext.as_slice(),
        b"Cooking MC's like a pound of bacon"
    );
}

#[test]
fn test_break_single_byte_xor_empty_ciphertext() {
    // XORing an empty buffer with a key byte yields a copy of the key
    // byte, and a lone byte never looks like English
    let candidates = break_single_byte_xor(&ByteArray::zeroed(0));
    assert!(candidates.is_empty());
}

/// The single-byte key whose decryption scores highest, threshold or not.
/// Ties resolve to the lower key byte.
pub fn best_single_byte_key(ciphertext: &ByteArray) -> (u8, f64) {
    (0..=u8::MAX)
        .map(|key| {
            (key, score::score_english_text(&bits::xor_byte(ciphertext, key)))
        })
        .fold((0, f64::MIN), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        })
}

#[test]
fn test_best_single_byte_key() {
    let case = ByteArray::from(&hex!(
        "1b37373331363f78151b7f2b783431333d78397828372d363c78373e783a393b3736"
    ));
    let (key, score) = best_single_byte_key(&case);
    assert_eq!(key, 0x58);
    assert!(score > 0.7);
}

/// A candidate repeating-key length and its average normalised Hamming
/// distance. Lower distances are better candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyLengthGuess {
    pub length: usize,
    pub distance: f64,
}

/// Rank candidate key lengths for a repeating-key XOR ciphertext. For each
/// length with at least two whole blocks, the distance is the Hamming
/// distance between consecutive blocks divided by the length, averaged over
/// every consecutive pair. The result is sorted by distance, then length.
///
/// This is a heuristic ranking, not a proof: multiples of the true key
/// length score equally well, and the caller may need to try several
/// guesses.
pub fn guess_key_lengths(
    ciphertext: &ByteArray,
    lengths: RangeInclusive<usize>,
) -> Vec<KeyLengthGuess> {
    let buf = ciphertext.as_slice();

    let mut guesses: Vec<KeyLengthGuess> = lengths
        .filter(|&length| length > 0 && buf.len() / length >= 2)
        .map(|length| {
            let distances: Vec<f64> = buf
                .chunks_exact(length)
                .tuple_windows()
                .map(|(block1, block2)| {
                    let distance = bits::hamming_distance(
                        &ByteArray::from(block1),
                        &ByteArray::from(block2),
                    )
                    .unwrap();
                    distance as f64 / length as f64
                })
                .collect();
            KeyLengthGuess {
                length,
                distance: distances.iter().sum::<f64>() / distances.len() as f64,
            }
        })
        .collect();

    guesses.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap()
            .then(a.length.cmp(&b.length))
    });
    guesses
}

#[test]
fn test_guess_key_lengths_needs_two_blocks() {
    let short = ByteArray::from("abcdef");
    let guesses = guess_key_lengths(&short, 1..=MAX_KEY_LENGTH);
    assert!(guesses.iter().all(|guess| guess.length <= 3));
    assert!(guess_key_lengths(&ByteArray::zeroed(0), 1..=MAX_KEY_LENGTH).is_empty());
}

#[test]
fn test_guess_key_lengths_identical_blocks() {
    // a two-byte pattern repeated: every even length has distance zero
    let buf = ByteArray::from("ababababababab");
    let guesses = guess_key_lengths(&buf, 1..=4);
    assert_eq!(guesses[0].length, 2);
    assert_eq!(guesses[0].distance, 0.0);
    assert_eq!(guesses[1].length, 4);
    assert_eq!(guesses[1].distance, 0.0);
}

/// Recover the repeating key for a known key length: transpose the
/// ciphertext blocks and solve each column as a single-byte XOR cipher.
pub fn break_repeating_key_xor_with_length(
    ciphertext: &ByteArray,
    key_length: usize,
) -> ByteArray {
    assert!(key_length > 0);
    if ciphertext.is_empty() {
        return ByteArray::zeroed(0);
    }

    let blocks: Vec<&[u8]> = ciphertext.as_slice().chunks(key_length).collect();
    let key: Vec<u8> = transpose(&blocks)
        .iter()
        .map(|column| best_single_byte_key(&ByteArray::from(column.as_slice())).0)
        .collect();
    ByteArray::from(key)
}

/// Break repeating-key XOR with an unknown key length: rank the lengths in
/// 1 to [`MAX_KEY_LENGTH`], recover a key for each of the best few, and
/// return the key whose decryption scores most like English. The returned
/// key may be a whole-number repetition of the true key; the decryption is
/// identical either way.
pub fn break_repeating_key_xor(ciphertext: &ByteArray) -> ByteArray {
    let mut best: Option<(ByteArray, f64)> = None;

    let guesses = guess_key_lengths(ciphertext, 1..=MAX_KEY_LENGTH);
    for guess in guesses.into_iter().take(KEY_LENGTH_ATTEMPTS) {
        let key = break_repeating_key_xor_with_length(ciphertext, guess.length);
        let score = score::score_english_text(&bits::xor(ciphertext, &key));
        // ties keep the better-ranked key length
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((key, score)),
        }
    }

    best.map(|(key, _)| key)
        .unwrap_or_else(|| ByteArray::zeroed(0))
}

#[cfg(test)]
mod repeating_key_tests {
    use super::*;

    // Long enough that block statistics and column letter frequencies
    // settle near their English averages.
    const PLAINTEXT: &str = "There are moments in life when the ordinary rhythm \
of the day gives way to something stranger and more vivid. The streets fill \
with a pale morning light and every sound seems to carry further than it \
should. People walk quickly past the shuttered shops, wrapped in long coats, \
thinking of warm rooms and strong coffee. Somewhere a door closes, a dog \
barks twice, and the city takes a slow breath before the business of the \
morning begins in earnest. It is in these quiet intervals that the mind \
drifts, turning over old plans and older regrets, weighing the small choices \
that shape a life as surely as any grand design. The clock above the station \
keeps its own counsel, and the trains arrive and depart with a patience that \
the travellers rarely share.";

    fn ciphertext() -> ByteArray {
        bits::xor(&ByteArray::from(PLAINTEXT), &ByteArray::from("ICE"))
    }

    #[test]
    fn test_guess_key_lengths_ranks_key_multiples() {
        let guesses = guess_key_lengths(&ciphertext(), 1..=MAX_KEY_LENGTH);
        assert_eq!(guesses.len(), MAX_KEY_LENGTH);
        // the best guess is the key length or a multiple of it
        assert_eq!(guesses[0].length % 3, 0);
        assert!(guesses[0].distance < guesses.last().unwrap().distance);
    }

    #[test]
    fn test_break_with_known_length() {
        let key = break_repeating_key_xor_with_length(&ciphertext(), 3);
        assert_eq!(key.as_slice(), b"ICE");
    }

    #[test]
    fn test_break_unknown_length() {
        let ct = ciphertext();
        let key = break_repeating_key_xor(&ct);
        // the key may come back as a repetition of "ICE"; the decryption
        // must match regardless
        assert_eq!(key.len() % 3, 0);
        assert_eq!(bits::xor(&ct, &key).as_slice(), PLAINTEXT.as_bytes());
    }
}
