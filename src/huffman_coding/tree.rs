//! Builds the Huffman tree from a weighted alphabet.
//!
//! Every symbol starts as a leaf in a min-priority queue. The two lightest entries are popped
//! and merged under a new internal node (first popped on the left) until one entry is left,
//! which is the root. Queue entries are ordered by weight and then by a counter handed out as
//! entries are created, so equal weights never need the nodes themselves to be compared and
//! the same input always gives the same tree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::{Display, Formatter};
use std::hash::Hash;

use log::{debug, trace};

use super::frequency::Distribution;
use crate::error::{HuffmanError, Result};

/// A node of the coding tree. Each node is owned by its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<S> {
    Leaf(S),
    Internal(Box<Node<S>>, Box<Node<S>>),
}

impl<S> Node<S> {
    /// Merge two subtrees under a new internal node
    pub fn internal(left: Node<S>, right: Node<S>) -> Self {
        Node::Internal(Box::new(left), Box::new(right))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}

/// A complete coding tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree<S> {
    root: Node<S>,
}

impl<S> HuffmanTree<S> {
    /// Wrap an already built root, e.g. one read back from storage.
    pub fn from_root(root: Node<S>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node<S> {
        &self.root
    }

    /// Number of leaves, i.e. distinct symbols
    pub fn leaf_count(&self) -> usize {
        self.walk().filter(|(node, _)| node.is_leaf()).count()
    }

    /// Length of the longest root to leaf path. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.walk().map(|(_, depth)| depth).max().unwrap_or(0)
    }

    /// Preorder walk over every node with its depth, using an explicit stack.
    pub fn walk(&self) -> Walk<'_, S> {
        Walk {
            stack: vec![(&self.root, 0)],
        }
    }
}

/// Preorder iterator over the nodes of a tree, see `HuffmanTree::walk`.
pub struct Walk<'a, S> {
    stack: Vec<(&'a Node<S>, usize)>,
}

impl<'a, S> Iterator for Walk<'a, S> {
    type Item = (&'a Node<S>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        if let Node::Internal(left, right) = node {
            // Right goes on first so the left subtree comes out first
            self.stack.push((right.as_ref(), depth + 1));
            self.stack.push((left.as_ref(), depth + 1));
        }
        Some((node, depth))
    }
}

/// Entry of the min-priority queue. Ordering looks at weight and insertion order only.
struct Entry<S> {
    weight: f64,
    order: u64,
    node: Node<S>,
}

impl<S> PartialEq for Entry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for Entry<S> {}

impl<S> PartialOrd for Entry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for Entry<S> {
    /// Reversed, so std's max-heap pops the lightest (then oldest) entry first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Build the Huffman tree for a distribution. Fails with `InvalidDistribution` before any
/// merging happens if the weights are unusable.
pub fn build_tree<S: Eq + Hash + Clone>(dist: &Distribution<S>) -> Result<HuffmanTree<S>> {
    dist.validate()?;

    // A single symbol cannot be merged with anything; it is the whole tree.
    if dist.len() == 1 {
        let (symbol, _) = &dist.entries()[0];
        debug!("Single symbol alphabet, tree is one leaf.");
        return Ok(HuffmanTree::from_root(Node::Leaf(symbol.clone())));
    }

    let mut heap: BinaryHeap<Entry<S>> = dist
        .entries()
        .iter()
        .enumerate()
        .map(|(i, (symbol, weight))| Entry {
            weight: *weight,
            order: i as u64,
            node: Node::Leaf(symbol.clone()),
        })
        .collect();
    let mut next_order = heap.len() as u64;

    // Pare the queue down to one entry, merging the two lightest each time.
    let root = loop {
        let first = match heap.pop() {
            Some(entry) => entry,
            None => return Err(HuffmanError::invalid_distribution("the alphabet is empty")),
        };
        // Nothing left to merge with, so this one is the root.
        let second = match heap.pop() {
            Some(entry) => entry,
            None => break first.node,
        };
        let weight = first.weight + second.weight;
        trace!(
            "merge #{} ({}) + #{} ({}) -> #{} ({}), {} entries left",
            first.order,
            first.weight,
            second.order,
            second.weight,
            next_order,
            weight,
            heap.len() + 1
        );
        heap.push(Entry {
            weight,
            order: next_order,
            node: Node::internal(first.node, second.node),
        });
        next_order += 1;
    };
    let tree = HuffmanTree::from_root(root);
    debug!(
        "Built tree with {} leaves, depth {}.",
        dist.len(),
        tree.depth()
    );
    Ok(tree)
}

/// Shows the tree as nested pairs, e.g. `((s2, s1), s0)`.
impl<S: Display> Display for HuffmanTree<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        enum Step<'a, S> {
            Visit(&'a Node<S>),
            Text(&'static str),
        }
        let mut stack = vec![Step::Visit(&self.root)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Text(text) => f.write_str(text)?,
                Step::Visit(Node::Leaf(symbol)) => write!(f, "{}", symbol)?,
                Step::Visit(Node::Internal(left, right)) => {
                    stack.push(Step::Text(")"));
                    stack.push(Step::Visit(right.as_ref()));
                    stack.push(Step::Text(", "));
                    stack.push(Step::Visit(left.as_ref()));
                    stack.push(Step::Text("("));
                }
            }
        }
        Ok(())
    }
}
