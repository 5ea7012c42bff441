//! The tools module provides the helper functions around the coder.
//!
//! The tools are:
//! - cli: Command line interface and the options it produces.
//! - freq_count: Byte frequency count, parallel for large inputs.
//! - report: User facing progress messages, filtered by verbosity.
//! - table: Code table builder for a set of symbol probabilities, with interactive prompt.
//!
pub mod cli;
pub mod freq_count;
pub mod report;
pub mod table;
