//! The compression module manages whole-file compression with the Huffman coder.
//!
//! Compression happens in the following steps:
//! - Frequency count: Count every byte value of the input.
//! - Huffman coding: Build the tree and code table, then encode the input bytes.
//! - Container: Store the tree, the exact bit count and the packed payload in a .huff file.
//!
//! Decompression reads the container back, walks the stored tree over the payload and checks
//! that it produced as many bytes as the container says were encoded.
//!

pub mod compress;
pub mod container;
pub mod decompress;

use std::fs::OpenOptions;
use std::io::{self, ErrorKind, Write};

use log::info;

use crate::error::Result;
use crate::tools::cli::{HuffOpts, Output};

/// Write finished output to the file named, or to stdout when asked to (or when there is no
/// name). Existing files are only replaced when force_overwrite is set.
pub(crate) fn write_output(opts: &HuffOpts, name: Option<&str>, data: &[u8]) -> Result<()> {
    match (opts.output, name) {
        (Output::File, Some(fname)) => {
            let mut options = OpenOptions::new();
            options.write(true);
            if opts.force_overwrite {
                options.create(true).truncate(true);
            } else {
                options.create_new(true);
            }
            let mut f_out = options.open(fname).map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    io::Error::new(
                        ErrorKind::AlreadyExists,
                        format!("{} already exists, use --force to overwrite", fname),
                    )
                } else {
                    e
                }
            })?;
            f_out.write_all(data)?;
            info!("Wrote {} bytes to {}.", data.len(), fname);
        }
        _ => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            out.write_all(data)?;
            out.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::compress::compress;
    use super::decompress::{decompress, test as test_files};
    use crate::error::HuffmanError;
    use crate::tools::cli::{HuffOpts, Mode};
    use std::fs;

    #[test]
    fn file_round_trip_test() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sample.txt");
        let text = "It was the best of times, it was the worst of times.".repeat(20);
        fs::write(&source, &text).unwrap();

        let mut opts = HuffOpts::new();
        opts.files = vec![source.to_string_lossy().to_string()];
        compress(&opts).unwrap();

        let packed = dir.path().join("sample.txt.huff");
        assert!(packed.exists());
        assert!(fs::metadata(&packed).unwrap().len() < text.len() as u64);

        // Restoring over the original needs --force
        opts.op_mode = Mode::Unzip;
        opts.files = vec![packed.to_string_lossy().to_string()];
        assert!(matches!(decompress(&opts), Err(HuffmanError::Io(_))));

        fs::remove_file(&source).unwrap();
        decompress(&opts).unwrap();
        assert_eq!(fs::read_to_string(&source).unwrap(), text);

        opts.op_mode = Mode::Test;
        test_files(&opts).unwrap();
    }

    #[test]
    fn test_mode_flags_corruption_test() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.huff");
        fs::write(&bad, b"HUF\x01 not really").unwrap();

        let mut opts = HuffOpts::new();
        opts.op_mode = Mode::Test;
        opts.verbose = crate::tools::cli::Verbosity::Quiet;
        opts.files = vec![bad.to_string_lossy().to_string()];
        assert!(test_files(&opts).is_err());
    }

    #[test]
    fn force_overwrite_test() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.bin");
        fs::write(&source, [1_u8, 2, 3, 3]).unwrap();
        fs::write(dir.path().join("a.bin.huff"), b"old").unwrap();

        let mut opts = HuffOpts::new();
        opts.files = vec![source.to_string_lossy().to_string()];
        assert!(compress(&opts).is_err());
        opts.force_overwrite = true;
        compress(&opts).unwrap();
        assert_ne!(fs::read(dir.path().join("a.bin.huff")).unwrap(), b"old");
    }
}
