use clap::Parser;
use log::{info, LevelFilter};
use std::{fmt::Display, fmt::Formatter};

use crate::huffman_coding::DEFAULT_TOLERANCE;

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    /// Log level matching this verbosity
    pub fn level(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Errors => LevelFilter::Error,
            Verbosity::Warnings => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// Compress, Decompress, Test, or build a code Table from probabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
    Table,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct HuffOpts {
    /// Vec of names of files to read for input
    pub files: Vec<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Compress/Decompress/Test/Table
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Probabilities of the symbols s0, s1, ... for table mode
    pub probabilities: Vec<f64>,
    /// Allowed distance between the probability sum and 1
    pub tolerance: f64,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl HuffOpts {
    pub fn new() -> Self {
        Self {
            files: vec![],
            force_overwrite: false,
            op_mode: Mode::Zip,
            output: Output::File,
            probabilities: vec![],
            tolerance: DEFAULT_TOLERANCE,
            verbose: Verbosity::Warnings,
        }
    }
}

impl Default for HuffOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A Huffman coding file compressor",
    long_about = "
    Compresses each input file into <file>.huff using a Huffman code built from the
    file's own byte frequencies, and restores it again with -d.

    With -p (or --prob) it instead builds the code for a table of symbol probabilities
    s0, s1, ... and prints the tree and codes. Without --prob the probabilities are
    asked for interactively."
)]
pub struct Args {
    /// Files to process
    #[clap()]
    files: Vec<String>,

    /// Compress the input files (default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Decompress the input files
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Build and print the code table for a set of probabilities
    #[clap(short = 'p', long = "table")]
    table: bool,

    /// Comma separated probabilities of s0, s1, ... (implies --table)
    #[clap(long = "prob", value_delimiter = ',', allow_hyphen_values = true)]
    probabilities: Vec<f64>,

    /// Allowed distance between the probability sum and 1
    #[clap(long = "tolerance", default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Overwrite existing output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Send output to standard out
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Suppress noncritical messages
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,

    /// Be verbose (a 2nd -v gives more)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    verbose: u64,
}

/// Put command line information from CLAP into our internal structure.
pub fn huffopts_from(args: Args) -> HuffOpts {
    let mut opts = HuffOpts::new();
    opts.files = args.files;
    opts.force_overwrite = args.force;
    opts.tolerance = args.tolerance;
    opts.probabilities = args.probabilities;

    if args.compress {
        opts.op_mode = Mode::Zip
    };
    if args.test {
        opts.op_mode = Mode::Test
    };
    if args.decompress {
        opts.op_mode = Mode::Unzip
    };
    if args.table || !opts.probabilities.is_empty() {
        opts.op_mode = Mode::Table
    };
    if args.stdout {
        opts.output = Output::Stdout
    };

    opts.verbose = match (args.quiet, args.verbose) {
        (true, _) => Verbosity::Quiet,
        (false, 0) => Verbosity::Warnings,
        (false, 1) => Verbosity::Info,
        (false, 2) => Verbosity::Debug,
        (false, _) => Verbosity::Trace,
    };
    opts
}

/// Parse the command line, set the log level and report the settings.
pub fn huffopts_init() -> HuffOpts {
    let opts = huffopts_from(Args::parse());

    // Set the log level
    log::set_max_level(opts.verbose.level());

    // Below we report initialization status to the user
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Sending output to {}", opts.output);
    if opts.op_mode == Mode::Table {
        info!("Probability tolerance set to {}", opts.tolerance);
    }
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    opts
}
