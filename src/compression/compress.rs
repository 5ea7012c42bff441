use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Read};

use log::{debug, info};

use super::container::Container;
use super::write_output;
use crate::bitstream::Bitstream;
use crate::error::Result;
use crate::huffman_coding::{build_tree, encode, generate_codes, Distribution};
use crate::tools::cli::{HuffOpts, Verbosity};
use crate::tools::freq_count::freqs;
use crate::tools::report::report;

/// Size figures for one compressed input.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionReport {
    /// Size of the input in bits
    pub original_bits: u64,
    /// Size of the encoded payload in bits (tree and header not included)
    pub compressed_bits: u64,
    /// Size of the whole container in bytes
    pub container_bytes: usize,
    /// Number of distinct byte values in the input
    pub distinct_symbols: usize,
    /// Longest code length
    pub max_code_len: usize,
    /// Average code length in bits per input byte
    pub average_code_len: f64,
}

impl CompressionReport {
    /// Original size over compressed size, None when nothing was encoded
    pub fn ratio(&self) -> Option<f64> {
        match self.compressed_bits {
            0 => None,
            bits => Some(self.original_bits as f64 / bits as f64),
        }
    }
}

impl Display for CompressionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Original size: {} bits, Compressed size: {} bits, Compression ratio: ",
            self.original_bits, self.compressed_bits
        )?;
        match self.ratio() {
            Some(ratio) => write!(f, "{:.2}", ratio),
            None => write!(f, "n/a"),
        }
    }
}

/// Compress a byte sequence into a .huff container.
pub fn compress_bytes(data: &[u8]) -> Result<(Vec<u8>, CompressionReport)> {
    if data.is_empty() {
        let container = Container {
            symbol_count: 0,
            tree: None,
            payload: Bitstream::new(),
        };
        let packed = container.to_bytes();
        let report = CompressionReport {
            original_bits: 0,
            compressed_bits: 0,
            container_bytes: packed.len(),
            distinct_symbols: 0,
            max_code_len: 0,
            average_code_len: 0.0,
        };
        return Ok((packed, report));
    }

    // Frequency count, then tree and codes
    let dist = Distribution::from_byte_counts(&freqs(data));
    debug!("Found {} distinct bytes.", dist.len());
    let tree = build_tree(&dist)?;
    let codes = generate_codes(&tree);

    let payload = encode(&codes, data)?;
    let container = Container {
        symbol_count: data.len() as u64,
        tree: Some(tree),
        payload,
    };
    let packed = container.to_bytes();

    let report = CompressionReport {
        original_bits: data.len() as u64 * 8,
        compressed_bits: container.payload.len() as u64,
        container_bytes: packed.len(),
        distinct_symbols: dist.len(),
        max_code_len: codes.max_len(),
        average_code_len: codes.average_len(&dist),
    };
    Ok((packed, report))
}

/// Compress the input files defined in opts <HuffOpts>, each into <file>.huff. With no files,
/// compress standard input to standard output.
pub fn compress(opts: &HuffOpts) -> Result<()> {
    if opts.files.is_empty() {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        let (packed, result) = compress_bytes(&data)?;
        write_output(opts, None, &packed)?;
        report(opts, Verbosity::Warnings, format!("(stdin): {}", result));
        return Ok(());
    }

    for file in &opts.files {
        let data = fs::read(file)?;
        info!("Read {} bytes from {}.", data.len(), file);
        let (packed, result) = compress_bytes(&data)?;
        let out_name = format!("{}.huff", file);
        write_output(opts, Some(&out_name), &packed)?;
        info!(
            "{} distinct bytes, longest code {} bits, {:.3} bits/byte, {} byte container.",
            result.distinct_symbols,
            result.max_code_len,
            result.average_code_len,
            result.container_bytes
        );
        report(opts, Verbosity::Warnings, format!("{}: {}", file, result));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn report_test() {
        let data = "aaaaaaab".as_bytes();
        let (_, report) = compress_bytes(data).unwrap();
        assert_eq!(report.original_bits, 64);
        // One bit per byte with two symbols
        assert_eq!(report.compressed_bits, 8);
        assert_eq!(report.ratio(), Some(8.0));
        assert_eq!(report.distinct_symbols, 2);
        assert_eq!(
            report.to_string(),
            "Original size: 64 bits, Compressed size: 8 bits, Compression ratio: 8.00"
        );
    }

    #[test]
    fn single_byte_value_report_test() {
        let (_, report) = compress_bytes(&[7_u8; 16]).unwrap();
        // A lone symbol still spends one bit per byte
        assert_eq!(report.max_code_len, 1);
        assert_eq!(report.compressed_bits, 16);
        assert_eq!(report.distinct_symbols, 1);
    }

    #[test]
    fn empty_report_test() {
        let (packed, report) = compress_bytes(&[]).unwrap();
        assert_eq!(report.ratio(), None);
        assert_eq!(report.container_bytes, packed.len());
        assert!(report.to_string().ends_with("n/a"));
    }

    #[test]
    fn skewed_text_shrinks_test() {
        let data = "aaaaaaaaaaaaaaaabbbbbbbbccccdd".repeat(50);
        let (packed, report) = compress_bytes(data.as_bytes()).unwrap();
        assert!(packed.len() < data.len());
        assert!(report.average_code_len < 2.0);
    }
}
