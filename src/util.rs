use snafu::Snafu;

use crate::codec::{base64, hex};

#[derive(Debug, Snafu, Clone, PartialEq)]
pub enum Error {
    #[snafu(display("invalid hex character {char:?} at offset {offset}"))]
    InvalidHexChar { char: char, offset: usize },
    #[snafu(display("invalid base64 character {char:?} at offset {offset}"))]
    InvalidBase64Char { char: char, offset: usize },
    #[snafu(display("buffer lengths differ: {left} != {right}"))]
    LengthMismatch { left: usize, right: usize },
    #[snafu(display("buffer length sum overflows usize"))]
    LengthOverflow,
    #[snafu(display("range {index}+{range} out of bounds for length {length}"))]
    OutOfRange { index: usize, range: usize, length: usize },
}

pub(crate) fn transpose<T>(original: &[&[T]]) -> Vec<Vec<T>> where T: Clone {
    assert!(!original.is_empty());
    let mut transposed = (0..original[0].len()).map(|_| vec![]).collect::<Vec<_>>();

    for original_row in original {
        for (item, transposed_row) in original_row.into_iter().zip(&mut transposed) {
            transposed_row.push(item.clone());
        }
    }

    transposed
}

#[test]
fn test_transpose() {
    let v1 = vec![1, 2];
    let v2 = vec![3, 4];
    let v3 = vec![5, 6];
    let blocks = vec![v1.as_slice(), v2.as_slice(), v3.as_slice()];
    let transposed = transpose(blocks.as_slice());
    assert_eq!(transposed.len(), 2);
    assert_eq!(transposed[0], vec![1, 3, 5]);
    assert_eq!(transposed[1], vec![2, 4, 6]);
}

#[test]
fn test_transpose_ragged_final_row() {
    let v1 = vec![1, 2, 3];
    let v2 = vec![4];
    let blocks = vec![v1.as_slice(), v2.as_slice()];
    let transposed = transpose(blocks.as_slice());
    assert_eq!(transposed[0], vec![1, 4]);
    assert_eq!(transposed[1], vec![2]);
    assert_eq!(transposed[2], vec![3]);
}

pub fn hex_to_base64(input: &str) -> Result<String, Error> {
    let bytes = hex::decode(input, hex::Accept::Any)?;
    Ok(base64::encode(&bytes))
}

#[test]
fn test_hex_to_base64() {
    let case = "49276d206b696c6c696e6720796f757220627261696e206c696b65206120706f69736f6e6f7573206d757368726f6f6d";
    let expected = Ok(String::from("SSdtIGtpbGxpbmcgeW91ciBicmFpbiBsaWtlIGEgcG9pc29ub3VzIG11c2hyb29t"));
    let result = hex_to_base64(case);
    assert_eq!(result, expected);
}
