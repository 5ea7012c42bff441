//! The huffman_coding module is the prefix-code engine of huffpress.
//!
//! Coding a sequence happens in the following steps:
//! - Frequency model: Count the symbols (or take caller supplied weights) and check the weights.
//! - Tree building: Merge the two lightest nodes until a single tree remains.
//! - Code table: Walk the tree to give every symbol its prefix-free bit code.
//! - Encoding: Concatenate the codes of the input into one bitstream with an exact bit count.
//!
//! Decoding walks the same tree bit by bit, emitting a symbol at every leaf.
//!
//! Everything here is synchronous and owns its data. A tree, code table or bitstream belongs to
//! one compression session; concurrent sessions each build their own.
//!

pub mod code_table;
pub mod decode;
pub mod encode;
pub mod frequency;
pub mod tree;

pub use code_table::{generate_codes, CodeTable};
pub use decode::decode;
pub use encode::encode;
pub use frequency::{Distribution, WeightKind, DEFAULT_TOLERANCE};
pub use tree::{build_tree, HuffmanTree, Node};
