use log::debug;

use super::tree::{HuffmanTree, Node};
use crate::bitstream::Bitstream;
use crate::error::{HuffmanError, Result};

/// Decode the first `bit_count` bits of `bits` by walking `tree`: `0` goes left, `1` goes right,
/// and every leaf reached emits its symbol and restarts the walk at the root.
///
/// Fails with `TruncatedStream` if the stream holds fewer than `bit_count` bits or if the last
/// bit leaves the walk inside the tree. When `expected` is given, decoding any other number of
/// symbols fails with `LengthMismatch`.
///
/// A tree that is a single leaf carries no information in its bits: every bit position decodes
/// to that one symbol, whatever its value.
pub fn decode<S: Clone>(
    tree: &HuffmanTree<S>,
    bits: &Bitstream,
    bit_count: usize,
    expected: Option<usize>,
) -> Result<Vec<S>> {
    if bit_count > bits.len() {
        return Err(HuffmanError::TruncatedStream {
            bit_count,
            available: bits.len(),
        });
    }

    let root = tree.root();
    let symbols = match root {
        Node::Leaf(symbol) => vec![symbol.clone(); bit_count],
        _ => {
            // Every symbol takes at least one bit
            let mut symbols = Vec::with_capacity(expected.unwrap_or(bit_count).min(bit_count));
            let mut node = root;
            for bit in bits.iter().take(bit_count) {
                if let Node::Internal(left, right) = node {
                    node = if bit { right.as_ref() } else { left.as_ref() };
                }
                if let Node::Leaf(symbol) = node {
                    symbols.push(symbol.clone());
                    node = root;
                }
            }
            // Anywhere but the root means the stream stopped part way down a code
            if !std::ptr::eq(node, root) {
                return Err(HuffmanError::TruncatedStream {
                    bit_count,
                    available: bit_count,
                });
            }
            symbols
        }
    };

    if let Some(expected) = expected {
        if symbols.len() != expected {
            return Err(HuffmanError::LengthMismatch {
                expected,
                actual: symbols.len(),
            });
        }
    }
    debug!("Decoded {} symbols from {} bits.", symbols.len(), bit_count);
    Ok(symbols)
}
