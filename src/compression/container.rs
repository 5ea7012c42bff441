//! The .huff container: everything needed to restore a compressed byte sequence.
//!
//! Layout, written with a BitPacker (all integers most significant bit first):
//!
//! | field        | size              | notes                                              |
//! |--------------|-------------------|----------------------------------------------------|
//! | magic        | 3 bytes           | `HUF`                                              |
//! | version      | 1 byte            | 1                                                  |
//! | symbol_count | 64 bits           | bytes in the original input                        |
//! | leaf_count   | 16 bits           | 0 for empty input, else 1..=256                    |
//! | tree         | preorder bits     | 0 = internal node, 1 = leaf then its 8 bit symbol  |
//! | padding      | 0-7 bits          | zeros up to a byte boundary                        |
//! | bit_count    | 64 bits           | exact length of the payload in bits                |
//! | payload      | bit_count bits    | zero padded to a whole byte                        |
//!
//! The tree section is absent when leaf_count is 0.

use std::io::{self, ErrorKind, Read};

use log::{debug, trace, warn};

use crate::bitstream::{BitPacker, BitReader, Bitstream};
use crate::error::{HuffmanError, Result};
use crate::huffman_coding::{HuffmanTree, Node};

const MAGIC: &[u8; 3] = b"HUF";
const VERSION: u8 = 1;

/// A tree plus the bitstream it encoded, and the symbol count needed to check the decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    /// Number of symbols (bytes) that were encoded
    pub symbol_count: u64,
    /// The coding tree, None for an empty input
    pub tree: Option<HuffmanTree<u8>>,
    /// Encoded symbols
    pub payload: Bitstream,
}

/// Header reads that run out of data mean the file was cut short.
fn header_error(e: io::Error) -> HuffmanError {
    if e.kind() == ErrorKind::UnexpectedEof {
        HuffmanError::corrupt("file ends inside the header")
    } else {
        HuffmanError::Io(e)
    }
}

impl Container {
    /// Pack the container into bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bw = BitPacker::new(self.payload.as_bytes().len() + 400);

        MAGIC.iter().for_each(|&x| bw.out8(x));
        bw.out8(VERSION);
        bw.out64(self.symbol_count);

        match &self.tree {
            None => bw.out16(0),
            Some(tree) => {
                bw.out16(tree.leaf_count() as u16);
                trace!("Tree written at {}.", bw.loc());
                pack_tree(&mut bw, tree);
            }
        }
        bw.align();

        trace!("Payload written at {}.", bw.loc());
        bw.out64(self.payload.len() as u64);
        bw.append(&self.payload);
        bw.finish().into_bytes()
    }

    /// Read a container back, checking its header and tree as it goes.
    pub fn read_from<R: Read>(source: R) -> Result<Self> {
        let mut br = BitReader::new(source);

        // Look for a valid signature.
        if br.bytes(3).map_err(header_error)? != MAGIC {
            return Err(HuffmanError::corrupt("not a huffpress file"));
        }
        let version = br.byte().map_err(header_error)?;
        if version != VERSION {
            return Err(HuffmanError::corrupt(format!(
                "unsupported container version {}",
                version
            )));
        }

        let symbol_count = br.bint(64).map_err(header_error)?;
        let leaf_count = br.bint(16).map_err(header_error)? as usize;
        if leaf_count > 256 {
            return Err(HuffmanError::corrupt(format!(
                "{} leaves is more than a byte alphabet holds",
                leaf_count
            )));
        }
        debug!(
            "Container holds {} symbols coded with {} leaves.",
            symbol_count, leaf_count
        );

        let tree = match leaf_count {
            0 => None,
            _ => Some(unpack_tree(&mut br, leaf_count)?),
        };
        br.align();

        let bit_count = br.bint(64).map_err(header_error)?;
        let bit_count = usize::try_from(bit_count)
            .map_err(|_| HuffmanError::corrupt(format!("bit count {} is too large", bit_count)))?;
        let payload = read_payload(&mut br, bit_count)?;

        let extra = trailing_bytes(&mut br)?;
        if extra > 0 {
            warn!("Ignoring {} bytes after the end of the container.", extra);
        }

        if tree.is_none() && (symbol_count != 0 || bit_count != 0) {
            return Err(HuffmanError::corrupt("data present without a tree"));
        }
        Ok(Container {
            symbol_count,
            tree,
            payload,
        })
    }
}

/// Read `bit_count` bits of payload. The buffer grows as data arrives rather than trusting the
/// stored count up front.
fn read_payload<R: Read>(br: &mut BitReader<R>, bit_count: usize) -> Result<Bitstream> {
    let needed = bit_count / 8 + (bit_count % 8 != 0) as usize;
    let mut bytes = Vec::with_capacity(needed.min(1 << 20));
    while bytes.len() < needed {
        match br.byte() {
            Ok(byte) => bytes.push(byte),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(HuffmanError::TruncatedStream {
                    bit_count,
                    available: bytes.len() * 8,
                })
            }
            Err(e) => return Err(e.into()),
        }
    }
    Bitstream::from_bytes(bytes, bit_count)
}

/// Count (and consume) whatever follows the payload.
fn trailing_bytes<R: Read>(br: &mut BitReader<R>) -> io::Result<usize> {
    let mut count = 0;
    loop {
        match br.byte() {
            Ok(_) => count += 1,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(count),
            Err(e) => return Err(e),
        }
    }
}

/// Write the tree in preorder: 0 for an internal node, 1 and the symbol for a leaf.
fn pack_tree(bw: &mut BitPacker, tree: &HuffmanTree<u8>) {
    for (node, _) in tree.walk() {
        match node {
            Node::Internal(..) => bw.out_bit(false),
            Node::Leaf(symbol) => {
                bw.out_bit(true);
                bw.out8(*symbol);
            }
        }
    }
}

/// Rebuild a tree written by pack_tree, without recursion. Rejects trees that do not have
/// exactly `leaf_count` distinct leaves.
fn unpack_tree<R: Read>(br: &mut BitReader<R>, leaf_count: usize) -> Result<HuffmanTree<u8>> {
    let mut seen = [false; 256];
    let mut leaves = 0;
    let mut internals = 0;
    // Internal nodes still waiting on children. Some holds a finished left child.
    let mut pending: Vec<Option<Node<u8>>> = Vec::new();

    loop {
        if !br.bit().map_err(header_error)? {
            internals += 1;
            // A full binary tree has one internal node less than it has leaves
            if internals >= leaf_count {
                return Err(HuffmanError::corrupt("tree has too many internal nodes"));
            }
            pending.push(None);
            continue;
        }

        let symbol = br.byte().map_err(header_error)?;
        if seen[symbol as usize] {
            return Err(HuffmanError::corrupt(format!(
                "symbol {} appears twice in the tree",
                symbol
            )));
        }
        seen[symbol as usize] = true;
        leaves += 1;
        if leaves > leaf_count {
            return Err(HuffmanError::corrupt("tree has too many leaves"));
        }

        // Climb for as long as the finished node completes its parent
        let mut node = Node::Leaf(symbol);
        loop {
            match pending.pop() {
                None => {
                    if leaves != leaf_count {
                        return Err(HuffmanError::corrupt(format!(
                            "tree has {} leaves, header says {}",
                            leaves, leaf_count
                        )));
                    }
                    return Ok(HuffmanTree::from_root(node));
                }
                Some(None) => {
                    pending.push(Some(node));
                    break;
                }
                Some(Some(left)) => node = Node::internal(left, node),
            }
        }
    }
}
