//! The frequency model turns input into the weighted alphabet the tree builder consumes.
//!
//! Weights come either from counting a symbol sequence or straight from the caller, as a table
//! of counts or of probabilities. Probability tables must also sum to one within a tolerance.
//!
//! Entry order matters: it becomes the insertion order of the tree builder's priority queue,
//! which breaks weight ties. Counting keeps symbols in order of first appearance.

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{HuffmanError, Result};

/// Default allowed distance between a probability table's sum and 1.0
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// What the weights of a distribution mean, and so how they are checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightKind {
    /// Occurrence counts, or any positive weights. Only positivity is checked.
    Counts,
    /// Probabilities in (0, 1] which must sum to 1 within `tolerance`.
    Probabilities { tolerance: f64 },
}

/// A finite alphabet with one weight per symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution<S> {
    entries: Vec<(S, f64)>,
    kind: WeightKind,
}

impl<S: Eq + Hash + Clone> Distribution<S> {
    /// Count every distinct symbol of a sequence. Symbols keep the order they first appear in.
    pub fn from_symbols<'a, I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        let mut index: FxHashMap<&'a S, usize> = FxHashMap::default();
        let mut counts: Vec<(&'a S, u64)> = Vec::new();
        for symbol in symbols {
            match index.get(symbol) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(symbol, counts.len());
                    counts.push((symbol, 1));
                }
            }
        }
        Self {
            entries: counts
                .into_iter()
                .map(|(symbol, count)| (symbol.clone(), count as f64))
                .collect(),
            kind: WeightKind::Counts,
        }
    }

    /// Take caller supplied counts (or other positive weights) as they are.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
    {
        Self {
            entries: counts.into_iter().collect(),
            kind: WeightKind::Counts,
        }
    }

    /// Take a caller supplied probability table, checked against `DEFAULT_TOLERANCE`.
    pub fn from_probabilities<I>(probabilities: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
    {
        Self {
            entries: probabilities.into_iter().collect(),
            kind: WeightKind::Probabilities {
                tolerance: DEFAULT_TOLERANCE,
            },
        }
    }

    /// Change the sum tolerance of a probability table. Count tables are left alone.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        if let WeightKind::Probabilities { .. } = self.kind {
            self.kind = WeightKind::Probabilities { tolerance };
        }
        self
    }

    /// Check the distribution can be turned into a tree.
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(HuffmanError::invalid_distribution("the alphabet is empty"));
        }

        let mut seen: FxHashSet<&S> = FxHashSet::default();
        for (i, (symbol, weight)) in self.entries.iter().enumerate() {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(HuffmanError::invalid_distribution(format!(
                    "weight {} of entry {} is not a positive number",
                    weight, i
                )));
            }
            if !seen.insert(symbol) {
                return Err(HuffmanError::invalid_distribution(format!(
                    "entry {} repeats an earlier symbol",
                    i
                )));
            }
        }

        if let WeightKind::Probabilities { tolerance } = self.kind {
            // The sum check is strict, so a zero tolerance would reject every table
            if !tolerance.is_finite() || tolerance <= 0.0 {
                return Err(HuffmanError::invalid_distribution(format!(
                    "tolerance {} is not a positive number",
                    tolerance
                )));
            }
            if let Some((i, (_, p))) = self.entries.iter().enumerate().find(|(_, (_, p))| *p > 1.0) {
                return Err(HuffmanError::invalid_distribution(format!(
                    "probability {} of entry {} is above 1",
                    p, i
                )));
            }
            let total = self.total_weight();
            if (total - 1.0).abs() >= tolerance {
                return Err(HuffmanError::invalid_distribution(format!(
                    "probabilities sum to {}, not 1 (tolerance {})",
                    total, tolerance
                )));
            }
        }
        Ok(())
    }

    /// Rescale to a probability table (weights divided by their total).
    pub fn normalized(&self) -> Self {
        let total = self.total_weight();
        Self {
            entries: self
                .entries
                .iter()
                .map(|(symbol, weight)| (symbol.clone(), weight / total))
                .collect(),
            kind: WeightKind::Probabilities {
                tolerance: DEFAULT_TOLERANCE,
            },
        }
    }
}

impl<S> Distribution<S> {
    /// Symbols and weights in insertion order
    pub fn entries(&self) -> &[(S, f64)] {
        &self.entries
    }

    pub fn kind(&self) -> WeightKind {
        self.kind
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|(_, weight)| weight).sum()
    }
}

impl Distribution<u8> {
    /// Build a count table from a 256 entry byte histogram, in byte order. Absent bytes are skipped.
    pub fn from_byte_counts(freqs: &[u64]) -> Self {
        Self {
            entries: freqs
                .iter()
                .enumerate()
                .take(256)
                .filter(|(_, &count)| count > 0)
                .map(|(byte, &count)| (byte as u8, count as f64))
                .collect(),
            kind: WeightKind::Counts,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_symbols_test() {
        let data = "abracadabra".as_bytes();
        let dist = Distribution::from_symbols(data);
        assert_eq!(
            dist.entries(),
            &[(b'a', 5.0), (b'b', 2.0), (b'r', 2.0), (b'c', 1.0), (b'd', 1.0)]
        );
        assert_eq!(dist.total_weight(), 11.0);
        assert!(dist.validate().is_ok());
    }

    #[test]
    fn byte_counts_test() {
        let mut freqs = vec![0_u64; 256];
        freqs[b'z' as usize] = 3;
        freqs[b'a' as usize] = 1;
        let dist = Distribution::from_byte_counts(&freqs);
        assert_eq!(dist.entries(), &[(b'a', 1.0), (b'z', 3.0)]);
    }

    #[test]
    fn empty_rejected_test() {
        let dist: Distribution<u8> = Distribution::from_symbols(&[]);
        assert!(matches!(
            dist.validate(),
            Err(HuffmanError::InvalidDistribution { .. })
        ));
    }

    #[test]
    fn half_sum_rejected_test() {
        let dist = Distribution::from_probabilities(vec![("A", 0.25), ("B", 0.25)]);
        assert!(matches!(
            dist.validate(),
            Err(HuffmanError::InvalidDistribution { .. })
        ));
    }

    #[test]
    fn bad_weights_rejected_test() {
        for bad in [-0.5, 0.0, f64::NAN, f64::INFINITY] {
            let dist = Distribution::from_counts(vec![("A", 1.0), ("B", bad)]);
            assert!(dist.validate().is_err(), "weight {} accepted", bad);
        }
        let dist = Distribution::from_probabilities(vec![("A", 1.2), ("B", -0.2)]);
        assert!(dist.validate().is_err());
    }

    #[test]
    fn duplicate_rejected_test() {
        let dist = Distribution::from_counts(vec![("A", 1.0), ("A", 2.0)]);
        assert!(dist.validate().is_err());
    }

    #[test]
    fn tolerance_test() {
        let probs = vec![("A", 0.7), ("B", 0.2), ("C", 0.095)];
        // Sum is 0.995, outside the default tolerance
        assert!(Distribution::from_probabilities(probs.clone())
            .validate()
            .is_err());
        assert!(Distribution::from_probabilities(probs.clone())
            .with_tolerance(0.01)
            .validate()
            .is_ok());
        // The bound itself is excluded
        assert!(Distribution::from_probabilities(vec![("A", 0.5), ("B", 0.25)])
            .with_tolerance(0.25)
            .validate()
            .is_err());
    }

    #[test]
    fn non_positive_tolerance_test() {
        let probs = vec![("A", 0.5), ("B", 0.5)];
        for tolerance in [0.0, -0.1, f64::NAN] {
            let result = Distribution::from_probabilities(probs.clone())
                .with_tolerance(tolerance)
                .validate();
            assert!(matches!(
                result,
                Err(HuffmanError::InvalidDistribution { message }) if message.contains("tolerance")
            ));
        }
    }

    #[test]
    fn single_certain_symbol_test() {
        let dist = Distribution::from_probabilities(vec![("X", 1.0)]);
        assert!(dist.validate().is_ok());
    }

    #[test]
    fn normalized_test() {
        let dist = Distribution::from_symbols(&[1_u32, 1, 1, 2]).normalized();
        assert_eq!(dist.entries(), &[(1, 0.75), (2, 0.25)]);
        assert!(dist.validate().is_ok());
    }
}
