use log::error;

use super::bits::Bitstream;

/// Creates a bitstream for output.
pub struct BitPacker {
    output: Vec<u8>,
    queue: u64,
    q_bits: u8,
    bit_count: usize,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of size specified (in bytes). Call finish()
    /// to flush the bit queue and get the packed bits.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            queue: 0,
            q_bits: 0,
            bit_count: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /// Writes the `depth` least significant bits of `data`, most significant first.
    /// At most 56 bits can be written per call.
    pub fn out_bits(&mut self, data: u64, depth: u8) {
        debug_assert!(depth <= 56, "out_bits takes at most 56 bits");
        if depth == 0 {
            return;
        }
        self.queue <<= depth; //shift queue by bit length
        self.queue |= data & (u64::MAX >> (64 - depth)); //add data portion to queue
        self.q_bits += depth; //update depth of queue bits
        self.bit_count += depth as usize;
        self.write_stream();
    }

    /// Puts a single bit on the stream.
    pub fn out_bit(&mut self, bit: bool) {
        self.out_bits(bit as u64, 1);
    }

    /// Puts an 8 bit word on the stream.
    pub fn out8(&mut self, data: u8) {
        self.out_bits(data as u64, 8);
    }

    /// Puts a 16 bit word of pre-packed binary encoded data on the stream.
    pub fn out16(&mut self, data: u16) {
        self.out_bits(data as u64, 16);
    }

    /// Puts a 32 bit word of pre-packed binary encoded data on the stream.
    pub fn out32(&mut self, data: u32) {
        self.out_bits(data as u64, 32);
    }

    /// Puts a 64 bit word on the stream, high half first.
    pub fn out64(&mut self, data: u64) {
        self.out32((data >> 32) as u32);
        self.out32(data as u32);
    }

    /// Appends every bit of a packed bitstream, such as a Huffman code.
    pub fn append(&mut self, bits: &Bitstream) {
        let full = bits.len() / 8;
        let bytes = bits.as_bytes();
        // Whole bytes first
        bytes[..full].iter().for_each(|&byte| self.out8(byte));
        // Then the leftover high bits of the last byte
        let rest = (bits.len() % 8) as u8;
        if rest > 0 {
            self.out_bits((bytes[full] >> (8 - rest)) as u64, rest);
        }
    }

    /// Pads the stream with zeros up to the next byte boundary. Padding counts as written bits.
    pub fn align(&mut self) {
        if self.q_bits > 0 {
            self.out_bits(0, 8 - self.q_bits);
        }
    }

    /// Number of bits written so far
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// signficant bits, and returns the packed bits with their exact count.
    pub fn finish(mut self) -> Bitstream {
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits = 8;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue.");
            }
        }
        // Every queued bit has been flushed, padded with zeros to a whole byte
        Bitstream::from_packed(self.output, self.bit_count)
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bit_count / 8, self.bit_count % 8)
    }
}

#[cfg(test)]
mod test {
    use super::BitPacker;
    use crate::bitstream::Bitstream;

    #[test]
    fn out16_test() {
        let mut bw = BitPacker::new(100);
        let data = 0b00100001_00100000;
        bw.out16(data);
        let out = bw.finish();
        assert_eq!(out.as_bytes(), "! ".as_bytes());
        assert_eq!(out.len(), 16);
    }

    #[test]
    fn out_bits_and_loc_test() {
        let mut bw = BitPacker::new(100);
        bw.out_bits(0b100001, 6);
        assert_eq!("[0.6]", &bw.loc());
        bw.out_bits(0b11, 2);
        assert_eq!("[1.0]", &bw.loc());
        bw.out_bits(0b101, 3);
        let out = bw.finish();
        assert_eq!(out.as_bytes(), &[0b1000_0111, 0b1010_0000]);
        assert_eq!(out.len(), 11);
    }

    #[test]
    fn out64_test() {
        let mut bw = BitPacker::new(100);
        bw.out_bit(true);
        bw.out64(0x0102_0304_0506_0708);
        let out = bw.finish();
        assert_eq!(out.len(), 65);
        assert_eq!(out.as_bytes()[0], 0b1000_0000);
        assert_eq!(out.as_bytes()[1], 0b1000_0001);
        assert_eq!(out.as_bytes()[8], 0b0000_0000);
    }

    #[test]
    fn append_and_align_test() {
        let mut bw = BitPacker::new(100);
        bw.append(&Bitstream::from_text("101"));
        bw.align();
        assert_eq!(bw.bit_count(), 8);
        bw.append(&Bitstream::from_text("1111_0000_11"));
        let out = bw.finish();
        assert_eq!(out.to_string(), "101000001111000011");
        assert_eq!(out.as_bytes(), &[0b1010_0000, 0b1111_0000, 0b1100_0000]);
    }

    #[test]
    fn finish_keeps_every_bit_test() {
        for n in 0..=20 {
            let mut bw = BitPacker::new(4);
            for _ in 0..n {
                bw.out_bit(true);
            }
            let out = bw.finish();
            assert_eq!(out.len(), n);
            assert_eq!(out.as_bytes().len(), (n + 7) / 8);
            assert_eq!(out, Bitstream::from_text(&"1".repeat(n)));
        }
    }
}
