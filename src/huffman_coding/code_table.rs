//! Derives the code of every symbol from a tree: `0` for each step left, `1` for each step
//! right, read from the root down to the symbol's leaf.
//!
//! The walk keeps its own stack, so a tree as deep as the alphabet is large is no problem.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use super::frequency::Distribution;
use super::tree::{HuffmanTree, Node};
use crate::bitstream::Bitstream;

/// Symbol to code mapping, in left to right leaf order.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTable<S: Eq + Hash> {
    codes: Vec<(S, Bitstream)>,
    index: FxHashMap<S, usize>,
}

impl<S: Eq + Hash + Clone> CodeTable<S> {
    /// Code for a symbol, if the symbol was part of the tree
    pub fn get(&self, symbol: &S) -> Option<&Bitstream> {
        self.index.get(symbol).map(|&i| &self.codes[i].1)
    }

    /// Every symbol with its code, leftmost leaf first
    pub fn iter(&self) -> impl Iterator<Item = (&S, &Bitstream)> {
        self.codes.iter().map(|(symbol, code)| (symbol, code))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Longest code, in bits
    pub fn max_len(&self) -> usize {
        self.codes.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    }

    /// Average code length in bits per symbol under `dist`, weighted by its normalized weights.
    /// Symbols of `dist` without a code are ignored.
    pub fn average_len(&self, dist: &Distribution<S>) -> f64 {
        let total = dist.total_weight();
        if total <= 0.0 {
            return 0.0;
        }
        dist.entries()
            .iter()
            .filter_map(|(symbol, weight)| self.get(symbol).map(|code| weight * code.len() as f64))
            .sum::<f64>()
            / total
    }
}

/// Generate the code table of a tree. A tree that is a single leaf gives its symbol the code `0`.
pub fn generate_codes<S: Eq + Hash + Clone>(tree: &HuffmanTree<S>) -> CodeTable<S> {
    let mut codes: Vec<(S, Bitstream)> = Vec::new();

    match tree.root() {
        Node::Leaf(symbol) => codes.push((symbol.clone(), Bitstream::from_text("0"))),
        root => {
            // Each stack entry carries the path that leads to its node
            let mut stack = vec![(root, Bitstream::new())];
            while let Some((node, path)) = stack.pop() {
                match node {
                    Node::Leaf(symbol) => codes.push((symbol.clone(), path)),
                    Node::Internal(left, right) => {
                        let mut right_path = path.clone();
                        right_path.push(true);
                        let mut left_path = path;
                        left_path.push(false);
                        // Right first so the left leaf is recorded first
                        stack.push((right.as_ref(), right_path));
                        stack.push((left.as_ref(), left_path));
                    }
                }
            }
        }
    }

    let index = codes
        .iter()
        .enumerate()
        .map(|(i, (symbol, _))| (symbol.clone(), i))
        .collect();
    CodeTable { codes, index }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::huffman_coding::tree::build_tree;

    fn code_strings<S: Eq + Hash + Clone + ToString>(table: &CodeTable<S>) -> Vec<(String, String)> {
        table
            .iter()
            .map(|(symbol, code)| (symbol.to_string(), code.to_string()))
            .collect()
    }

    #[test]
    fn skewed_codes_test() {
        let dist = Distribution::from_probabilities(vec![("A", 0.7), ("B", 0.2), ("C", 0.1)]);
        let table = generate_codes(&build_tree(&dist).unwrap());
        assert_eq!(
            code_strings(&table),
            vec![
                ("C".to_string(), "00".to_string()),
                ("B".to_string(), "01".to_string()),
                ("A".to_string(), "1".to_string())
            ]
        );
        // 0.7 * 1 + 0.2 * 2 + 0.1 * 2 = 1.3 bits, under both log2(3) and a 2 bit fixed code
        let average = table.average_len(&dist);
        assert!((average - 1.3).abs() < 1e-9);
        assert!(average < 3_f64.log2());
        assert!(average < 2.0);
    }

    #[test]
    fn single_leaf_code_test() {
        let dist = Distribution::from_probabilities(vec![("X", 1.0)]);
        let table = generate_codes(&build_tree(&dist).unwrap());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&"X"), Some(&Bitstream::from_text("0")));
    }

    #[test]
    fn prefix_free_test() {
        let text = "it was the best of times, it was the worst of times".as_bytes();
        let table = generate_codes(&build_tree(&Distribution::from_symbols(text)).unwrap());
        for (a, code_a) in table.iter() {
            for (b, code_b) in table.iter() {
                if a != b {
                    assert!(!code_a.is_prefix_of(code_b), "{} prefixes {}", a, b);
                }
            }
        }
    }

    #[test]
    fn deep_tree_codes_test() {
        // A linear chain 1000 leaves deep; the walk must not recurse.
        let dist = Distribution::from_counts((0..1000_u32).map(|i| (i, 2_f64.powi(i as i32))));
        let tree = build_tree(&dist).unwrap();
        let table = generate_codes(&tree);
        assert_eq!(table.len(), 1000);
        assert_eq!(table.max_len(), 999);
        assert_eq!(table.get(&999).map(|code| code.len()), Some(1));
    }

    #[test]
    fn codes_match_tree_depth_test() {
        let data = "mississippi river".as_bytes();
        let tree = build_tree(&Distribution::from_symbols(data)).unwrap();
        let table = generate_codes(&tree);
        assert_eq!(table.len(), tree.leaf_count());
        assert_eq!(table.max_len(), tree.depth());
    }
}
