//! Packed bit sequences with an explicit length.
//!
//! Bits are stored most significant bit first within each byte. Bits past `len()` in the last
//! byte are always zero, so two streams holding the same bits compare equal.

use std::fmt::{Display, Formatter};

use crate::error::{HuffmanError, Result};

/// An ordered, finite run of bits together with its exact bit count.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitstream {
    bytes: Vec<u8>,
    bit_count: usize,
}

impl Bitstream {
    /// Create an empty bitstream
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bitstream with room for `bits` bits
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity((bits + 7) / 8),
            bit_count: 0,
        }
    }

    /// Wrap packed bytes holding exactly `bit_count` bits. Fails with `TruncatedStream` when the
    /// bytes are too short to hold that many bits. Extra whole bytes are dropped and the unused
    /// low bits of the last byte are cleared.
    pub fn from_bytes(mut bytes: Vec<u8>, bit_count: usize) -> Result<Self> {
        let needed = (bit_count + 7) / 8;
        if bytes.len() < needed {
            return Err(HuffmanError::TruncatedStream {
                bit_count,
                available: bytes.len() * 8,
            });
        }
        bytes.truncate(needed);
        let spare = needed * 8 - bit_count;
        if spare > 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xff << spare;
            }
        }
        Ok(Self { bytes, bit_count })
    }

    /// Wrap bytes that already hold exactly `bit_count` bits with zero padding, as a BitPacker
    /// leaves them.
    pub(crate) fn from_packed(bytes: Vec<u8>, bit_count: usize) -> Self {
        debug_assert_eq!(bytes.len(), (bit_count + 7) / 8);
        Self { bytes, bit_count }
    }

    /// Build a bitstream from `0`/`1` text. Any other character is skipped.
    pub fn from_text(text: &str) -> Self {
        let mut bits = Self::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                _ => {}
            }
        }
        bits
    }

    /// Number of valid bits
    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    /// The packed bytes, last byte zero padded
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Append one bit
    pub fn push(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8; // which byte is target?
        let bit_offset = self.bit_count % 8; // which bit position is target?

        // make a new byte if needed
        if byte_index >= self.bytes.len() {
            self.bytes.push(0);
        }
        if bit {
            self.bytes[byte_index] |= 0x80 >> bit_offset;
        }
        self.bit_count += 1;
    }

    /// Append every bit of `other`
    pub fn extend_from(&mut self, other: &Bitstream) {
        // Byte aligned appends can copy whole bytes.
        if self.bit_count % 8 == 0 {
            self.bytes.extend_from_slice(&other.bytes);
            self.bit_count += other.bit_count;
            return;
        }
        other.iter().for_each(|bit| self.push(bit));
    }

    /// Return the bit at `index`, or None past the end
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Shorten the stream to `bit_count` bits. Longer counts are ignored.
    pub fn truncate(&mut self, bit_count: usize) {
        if bit_count >= self.bit_count {
            return;
        }
        let needed = (bit_count + 7) / 8;
        self.bytes.truncate(needed);
        let spare = needed * 8 - bit_count;
        if spare > 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0xff << spare;
            }
        }
        self.bit_count = bit_count;
    }

    /// True if `self` is a prefix of `other`
    pub fn is_prefix_of(&self, other: &Bitstream) -> bool {
        self.bit_count <= other.bit_count && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }

    /// Iterate the bits in order
    pub fn iter(&self) -> Bits<'_> {
        Bits {
            stream: self,
            index: 0,
        }
    }
}

/// Iterator over the bits of a `Bitstream`
#[derive(Debug, Clone)]
pub struct Bits<'a> {
    stream: &'a Bitstream,
    index: usize,
}

impl Iterator for Bits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let bit = self.stream.get(self.index)?;
        self.index += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.stream.bit_count - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Bits<'_> {}

impl<'a> IntoIterator for &'a Bitstream {
    type Item = bool;
    type IntoIter = Bits<'a>;

    fn into_iter(self) -> Bits<'a> {
        self.iter()
    }
}

impl FromIterator<bool> for Bitstream {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = Bitstream::new();
        iter.into_iter().for_each(|bit| bits.push(bit));
        bits
    }
}

impl Display for Bitstream {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for bit in self.iter() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Bitstream;
    use crate::error::HuffmanError;

    #[test]
    fn push_and_get_test() {
        let mut bits = Bitstream::new();
        for bit in [true, false, true, true, false, false, false, false, true] {
            bits.push(bit);
        }
        assert_eq!(bits.len(), 9);
        assert_eq!(bits.as_bytes(), &[0b1011_0000, 0b1000_0000]);
        assert_eq!(bits.get(0), Some(true));
        assert_eq!(bits.get(8), Some(true));
        assert_eq!(bits.get(9), None);
        assert_eq!(bits.to_string(), "101100001");
    }

    #[test]
    fn from_bytes_masks_padding_test() {
        let bits = Bitstream::from_bytes(vec![0xff, 0xff, 0xff], 12).unwrap();
        assert_eq!(bits.as_bytes(), &[0xff, 0xf0]);
        assert_eq!(bits, Bitstream::from_text("111111111111"));
    }

    #[test]
    fn from_bytes_too_short_test() {
        let err = Bitstream::from_bytes(vec![0xff], 9).unwrap_err();
        assert!(matches!(
            err,
            HuffmanError::TruncatedStream {
                bit_count: 9,
                available: 8
            }
        ));
    }

    #[test]
    fn extend_unaligned_test() {
        let mut bits = Bitstream::from_text("101");
        bits.extend_from(&Bitstream::from_text("0110_1"));
        assert_eq!(bits.to_string(), "10101101");
        bits.extend_from(&Bitstream::from_text("11"));
        assert_eq!(bits.as_bytes(), &[0b1010_1101, 0b1100_0000]);
    }

    #[test]
    fn truncate_test() {
        let mut bits = Bitstream::from_text("1111111111");
        bits.truncate(3);
        assert_eq!(bits.as_bytes(), &[0b1110_0000]);
        assert_eq!(bits.len(), 3);
        bits.truncate(30);
        assert_eq!(bits.len(), 3);
    }

    #[test]
    fn prefix_test() {
        let a = Bitstream::from_text("01");
        let b = Bitstream::from_text("011");
        assert!(a.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
        assert!(!Bitstream::from_text("1").is_prefix_of(&b));
    }
}
