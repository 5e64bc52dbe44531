#[macro_use] extern crate hex_literal;

pub mod attack;
pub mod bits;
pub mod bytes;
pub mod codec;
pub mod score;
mod util;

pub use bytes::ByteArray;
pub use util::{hex_to_base64, Error};
