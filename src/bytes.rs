use crate::util::Error;

/// Owned, length-tracked byte buffer. Zero-length buffers are ordinary
/// values, not error states. The backing storage is overwritten with a
/// sentinel byte when the buffer is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteArray {
    bytes: Vec<u8>,
}

/// Written over the backing storage on drop.
const WIPE_BYTE: u8 = 0xfe;

impl ByteArray {
    /// A zero-filled buffer of the given length.
    pub fn zeroed(length: usize) -> ByteArray {
        ByteArray { bytes: vec![0; length] }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// `index < len()` is a contract, not a recoverable condition.
    pub fn get(&self, index: usize) -> u8 {
        assert!(index < self.bytes.len());
        self.bytes[index]
    }

    /// `index < len()` is a contract, not a recoverable condition.
    pub fn set(&mut self, index: usize, byte: u8) {
        assert!(index < self.bytes.len());
        self.bytes[index] = byte;
    }

    /// Writable view of `range` bytes starting at `index`. The bounds check
    /// uses checked addition, so `index + range` can never wrap.
    pub fn slice_mut(&mut self, index: usize, range: usize) -> Result<&mut [u8], Error> {
        let length = self.bytes.len();
        let end = index.checked_add(range).ok_or(Error::LengthOverflow)?;
        if end > length {
            return Err(Error::OutOfRange { index, range, length });
        }
        Ok(&mut self.bytes[index..end])
    }

    /// A new buffer holding the contents of `self` then `other`.
    /// Fails if the summed length cannot be represented.
    pub fn concat(&self, other: &ByteArray) -> Result<ByteArray, Error> {
        let length = self.len().checked_add(other.len()).ok_or(Error::LengthOverflow)?;
        let mut bytes = Vec::with_capacity(length);
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(&other.bytes);
        Ok(ByteArray { bytes })
    }
}

impl Drop for ByteArray {
    fn drop(&mut self) {
        // Stale plaintext and key material must not survive in freed memory
        for byte in self.bytes.iter_mut() {
            *byte = WIPE_BYTE;
        }
    }
}

impl From<Vec<u8>> for ByteArray {
    fn from(bytes: Vec<u8>) -> ByteArray {
        ByteArray { bytes }
    }
}

impl From<&[u8]> for ByteArray {
    fn from(bytes: &[u8]) -> ByteArray {
        ByteArray { bytes: bytes.to_vec() }
    }
}

impl<const N: usize> From<&[u8; N]> for ByteArray {
    fn from(bytes: &[u8; N]) -> ByteArray {
        ByteArray { bytes: bytes.to_vec() }
    }
}

// Raw bytes, no encoding assumed
impl From<&str> for ByteArray {
    fn from(s: &str) -> ByteArray {
        ByteArray { bytes: s.as_bytes().to_vec() }
    }
}

#[test]
fn test_zeroed() {
    let buf = ByteArray::zeroed(4);
    assert_eq!(buf.as_slice(), &[0, 0, 0, 0]);

    let empty = ByteArray::zeroed(0);
    assert!(empty.is_empty());
    assert_eq!(empty.len(), 0);
}

#[test]
fn test_get_set() {
    let mut buf = ByteArray::zeroed(2);
    buf.set(1, 0x2a);
    assert_eq!(buf.get(0), 0);
    assert_eq!(buf.get(1), 0x2a);
}

#[test]
#[should_panic]
fn test_get_out_of_bounds_panics() {
    let buf = ByteArray::zeroed(2);
    buf.get(2);
}

#[test]
fn test_slice_mut() {
    let mut buf = ByteArray::from(&b"abcdef"[..]);
    let view = buf.slice_mut(2, 3).unwrap();
    assert_eq!(view, b"cde");
    view[0] = b'C';
    assert_eq!(buf.as_slice(), b"abCdef");

    assert_eq!(
        buf.slice_mut(4, 3),
        Err(Error::OutOfRange { index: 4, range: 3, length: 6 })
    );
    assert_eq!(buf.slice_mut(1, usize::MAX), Err(Error::LengthOverflow));
}

#[test]
fn test_concat() {
    let a = ByteArray::from("foo");
    let b = ByteArray::from("bar");
    assert_eq!(a.concat(&b).unwrap().as_slice(), b"foobar");

    let empty = ByteArray::zeroed(0);
    assert_eq!(a.concat(&empty).unwrap(), a);
    assert_eq!(empty.concat(&empty).unwrap(), empty);
}

#[test]
fn test_dup_is_independent() {
    let a = ByteArray::from("original");
    let mut b = a.clone();
    b.set(0, b'O');
    assert_eq!(a.as_slice(), b"original");
    assert_eq!(b.as_slice(), b"Original");
}

#[test]
fn test_string_round_trip() {
    let buf = ByteArray::from("raw \x01 bytes");
    assert_eq!(std::str::from_utf8(buf.as_slice()).unwrap(), "raw \x01 bytes");
}
