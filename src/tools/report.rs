use super::cli::{HuffOpts, Verbosity};

/// Reports app progress as per Verbosity setting. Goes to stderr so that compressed data sent
/// to stdout stays clean. Accepts both &str and String message.
pub fn report<S: AsRef<str> + std::fmt::Display>(o: &HuffOpts, this_v: Verbosity, msg: S) {
    if o.verbose >= this_v {
        eprintln!("{}", msg)
    }
}
