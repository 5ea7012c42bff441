//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use huffpress::compression::compress::compress;
use huffpress::compression::decompress::{decompress, test};
use huffpress::tools::cli::{huffopts_init, Mode};
use huffpress::tools::table::table;
use huffpress::HuffmanError;

use log::{error, info, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> Result<(), HuffmanError> {
    // Available log levels are Error, Warn, Info, Debug, Trace. The command line narrows this.
    // Logs go to stderr so that --stdout output stays clean.
    if TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("Logger was already initialized.");
    }

    let options = huffopts_init();

    //----- Figure how what we need to do and go do it
    let result = match options.op_mode {
        Mode::Zip => compress(&options),
        Mode::Unzip => decompress(&options),
        Mode::Test => test(&options),
        Mode::Table => table(&options),
    };

    match &result {
        Ok(()) => info!("Done."),
        Err(e) => error!("{}", e),
    }
    result
}
