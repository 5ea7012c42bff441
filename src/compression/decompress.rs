use std::fs;
use std::io::{self, Read};

use log::{error, info};

use super::container::Container;
use super::write_output;
use crate::error::{HuffmanError, Result};
use crate::huffman_coding::decode;
use crate::tools::cli::{HuffOpts, Verbosity};
use crate::tools::report::report;

const SUFFIX: &str = ".huff";

/// Restore the bytes held in a .huff container. The stored symbol count must match what the
/// payload decodes to.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let container = Container::read_from(data)?;
    let expected = usize::try_from(container.symbol_count).map_err(|_| {
        HuffmanError::corrupt(format!(
            "symbol count {} is too large",
            container.symbol_count
        ))
    })?;

    match &container.tree {
        None => Ok(Vec::new()),
        Some(tree) => decode(
            tree,
            &container.payload,
            container.payload.len(),
            Some(expected),
        ),
    }
}

/// Output name for a compressed file: the .huff suffix removed, or .out added if it has none.
pub fn output_name(file: &str) -> String {
    match file.strip_suffix(SUFFIX) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{}.out", file),
    }
}

/// Decompress the files specified in opts (HuffOpts). With no files, decompress standard input
/// to standard output.
pub fn decompress(opts: &HuffOpts) -> Result<()> {
    if opts.files.is_empty() {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        let restored = decompress_bytes(&data)?;
        return write_output(opts, None, &restored);
    }

    for file in &opts.files {
        if !file.ends_with(SUFFIX) {
            report(
                opts,
                Verbosity::Warnings,
                format!("{}: does not end in {}, writing {}", file, SUFFIX, output_name(file)),
            );
        }
        let data = fs::read(file)?;
        let restored = decompress_bytes(&data).map_err(|e| {
            error!("Fatal error: {} could not be decompressed.", file);
            e
        })?;
        info!("Restored {} bytes from {}.", restored.len(), file);
        write_output(opts, Some(&output_name(file)), &restored)?;
    }
    Ok(())
}

/// Decompress one input and report whether it came out whole.
fn test_bytes(opts: &HuffOpts, name: &str, data: &[u8]) -> Result<()> {
    match decompress_bytes(data) {
        Ok(restored) => {
            report(
                opts,
                Verbosity::Warnings,
                format!("{}: ok ({} bytes)", name, restored.len()),
            );
            Ok(())
        }
        Err(e) => {
            report(opts, Verbosity::Errors, format!("{}: {}", name, e));
            Err(e)
        }
    }
}

/// Check that each file decompresses cleanly, without writing anything. With no files, check
/// standard input.
pub fn test(opts: &HuffOpts) -> Result<()> {
    if opts.files.is_empty() {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        return test_bytes(opts, "(stdin)", &data);
    }

    let mut failed = 0;
    for file in &opts.files {
        let result = match fs::read(file) {
            Ok(data) => test_bytes(opts, file, &data),
            Err(e) => {
                report(opts, Verbosity::Errors, format!("{}: {}", file, e));
                Err(e.into())
            }
        };
        if result.is_err() {
            failed += 1;
        }
    }
    if failed > 0 {
        return Err(HuffmanError::corrupt(format!(
            "{} of {} files failed the test",
            failed,
            opts.files.len()
        )));
    }
    Ok(())
}
