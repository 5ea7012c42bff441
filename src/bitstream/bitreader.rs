//! BitReader: reads a packed bitstream back from any I/O source that supports the read() call.
//!
//! Running out of data is reported as `io::ErrorKind::UnexpectedEof`, so callers can use `?`
//! the same way for a short file and for a failed read.

use std::io::{self, ErrorKind, Read};

const BUFFER_SIZE: usize = 64 * 1024;

/// Reads bits, most significant bit first, from a byte source.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    source: R,
}

fn eof() -> io::Error {
    io::Error::new(ErrorKind::UnexpectedEof, "Unexpected End Of File")
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader (with a 64k buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: Vec::with_capacity(BUFFER_SIZE),
            cursor: 0,
            bit_index: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> io::Result<bool> {
        // Only try to read more data when the buffer cursor has reached the end of the buffer
        if self.cursor == self.buffer.len() {
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = loop {
                match self.source.read(&mut self.buffer) {
                    Ok(size) => break size,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            // Adjust the buffer if we read less than the buffer size
            self.buffer.truncate(size);
            self.cursor = 0;
            self.bit_index = 0;
            // If nothing came back from our read attempt, then we have no more data.
            if size == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Return the next bit, *true* for 1 and *false* for 0.
    pub fn bit(&mut self) -> io::Result<bool> {
        // A fresh byte is needed whenever bit_index is 0
        if self.bit_index == 0 && !self.have_data()? {
            return Err(eof());
        }
        let bit = (self.buffer[self.cursor] >> (7 - self.bit_index)) & 1;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.cursor += 1;
        }
        Ok(bit == 1)
    }

    /// Return the next n bits (n <= 64) as an unsigned integer.
    pub fn bint(&mut self, mut n: usize) -> io::Result<u64> {
        debug_assert!(n <= 64, "bint reads at most 64 bits");
        let mut result = 0_u64;
        while n > 0 {
            // Byte aligned reads take a whole byte at a time
            if self.bit_index == 0 && n >= 8 {
                if !self.have_data()? {
                    return Err(eof());
                }
                result = result << 8 | self.buffer[self.cursor] as u64;
                self.cursor += 1;
                n -= 8;
            } else {
                result = result << 1 | self.bit()? as u64;
                n -= 1;
            }
        }
        Ok(result)
    }

    /// Returns the next 8 bits as a byte. Convenience function, calls bint(8).
    pub fn byte(&mut self) -> io::Result<u8> {
        self.bint(8).map(|byte| byte as u8)
    }

    /// Returns the next n bytes.
    pub fn bytes(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut result: Vec<u8> = Vec::with_capacity(n);
        for _ in 0..n {
            result.push(self.byte()?);
        }
        Ok(result)
    }

    /// Skip the rest of a partially read byte.
    pub fn align(&mut self) {
        if self.bit_index > 0 {
            self.bit_index = 0;
            self.cursor += 1;
        }
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}
