//! The bitstream module forms the bit-level I/O subsystem of huffpress.
//!
//! Huffman codes are not byte aligned, so everything the coder produces is a sequence of bits
//! that carries its own exact length. Padding added to reach a whole byte never counts as data.
//!
//! - bits: The packed `Bitstream` type used for codes and encoded payloads.
//! - bitpacker: Queue based writer that packs bits (and whole words) into a `Bitstream`.
//! - bitreader: Buffered reader that pulls bits back off any `std::io::Read` source.
//!
pub mod bitpacker;
pub mod bitreader;
pub mod bits;

pub use bitpacker::BitPacker;
pub use bitreader::BitReader;
pub use bits::Bitstream;
