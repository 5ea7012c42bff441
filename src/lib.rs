//! Huffman coding library and file compressor.
//!
//! Version 0.1.0
//!
//! Builds an optimal prefix code from the symbol frequencies of the input (or from a table of
//! probabilities), and uses it for lossless encoding and decoding between symbols and a packed
//! bitstream. Trees and codes are built once per input; there is no adaptive coding.
//!
//! The coder works on any symbol type that can be hashed and compared for equality:
//!
//! ```
//! use huffpress::huffman_coding::{build_tree, decode, encode, generate_codes, Distribution};
//!
//! let data = "abracadabra".as_bytes();
//! let tree = build_tree(&Distribution::from_symbols(data))?;
//! let bits = encode(&generate_codes(&tree), data)?;
//! assert_eq!(decode(&tree, &bits, bits.len(), Some(data.len()))?, data);
//! # Ok::<(), huffpress::HuffmanError>(())
//! ```
//!
//! Basic usage of the command line tool to compress a file is as follows:
//!
//! `$> huffpress -z test.txt`
//!
//! This will compress the file and create the file test.txt.huff. `-d` restores it.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use error::{HuffmanError, Result};
