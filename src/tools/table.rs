//! Builds and prints the code for a table of symbol probabilities.
//!
//! The symbols are labelled s0, s1, ... in the order their probabilities are given. When no
//! probabilities come from the command line they are asked for one at a time, and anything
//! that is not a usable number is asked for again.

use std::io::{self, BufRead, ErrorKind, Write};
use std::str::FromStr;

use log::info;

use super::cli::HuffOpts;
use crate::error::{HuffmanError, Result};
use crate::huffman_coding::{build_tree, generate_codes, Distribution};

/// Print `question`, read a line and parse it, repeating until `accept` takes the value.
fn ask<R, W, T, F>(input: &mut R, out: &mut W, question: &str, complaint: &str, accept: F) -> io::Result<T>
where
    R: BufRead,
    W: Write,
    T: FromStr,
    F: Fn(&T) -> bool,
{
    loop {
        write!(out, "{}", question)?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(ErrorKind::UnexpectedEof, "input ended"));
        }
        match line.trim().parse::<T>() {
            Ok(value) if accept(&value) => return Ok(value),
            _ => writeln!(out, "{}", complaint)?,
        }
    }
}

/// Ask for a symbol count (at least 2) and then a probability in (0, 1) for every symbol.
pub fn prompt_probabilities<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Vec<f64>> {
    let count: usize = ask(
        input,
        out,
        "Enter number of symbols: ",
        "Number of symbols must be an integer of at least 2.",
        |&n| n >= 2,
    )?;

    let mut probabilities = Vec::with_capacity(count);
    for i in 0..count {
        let p: f64 = ask(
            input,
            out,
            &format!("Enter probability for symbol s{}: ", i),
            "Probability must be a number between 0 and 1.",
            |&p| p > 0.0 && p < 1.0,
        )?;
        probabilities.push(p);
    }
    Ok(probabilities)
}

/// Hold a table given on the command line to the same rules as the prompt: at least 2 symbols,
/// each with a probability in (0, 1).
pub fn check_probabilities(probabilities: &[f64]) -> Result<()> {
    if probabilities.len() < 2 {
        return Err(HuffmanError::invalid_distribution(format!(
            "a table needs at least 2 probabilities, got {}",
            probabilities.len()
        )));
    }
    if let Some((i, p)) = probabilities
        .iter()
        .enumerate()
        .find(|(_, &p)| !(p > 0.0 && p < 1.0))
    {
        return Err(HuffmanError::invalid_distribution(format!(
            "probability {} of s{} is not between 0 and 1",
            p, i
        )));
    }
    Ok(())
}

/// Build the tree for s0, s1, ... and print it with every code and the average code length.
/// A table that does not sum to 1 within `tolerance` is rejected before any tree is built.
pub fn print_table<W: Write>(probabilities: &[f64], tolerance: f64, out: &mut W) -> Result<()> {
    let dist = Distribution::from_probabilities(
        probabilities
            .iter()
            .enumerate()
            .map(|(i, &p)| (format!("s{}", i), p)),
    )
    .with_tolerance(tolerance);

    let tree = build_tree(&dist)?;
    writeln!(out, "Probabilities accepted.")?;
    let codes = generate_codes(&tree);

    writeln!(out, "\nHuffman Tree:\n{}", tree)?;
    writeln!(out, "\nHuffman Codes:")?;
    // Listed in symbol order rather than leaf order
    for (symbol, _) in dist.entries() {
        if let Some(code) = codes.get(symbol) {
            writeln!(out, "{} : {}", symbol, code)?;
        }
    }

    let entropy: f64 = dist.entries().iter().map(|(_, p)| p * (1.0 / p).log2()).sum();
    writeln!(
        out,
        "\nAverage code length: {:.4} bits/symbol (entropy {:.4})",
        codes.average_len(&dist),
        entropy
    )?;
    Ok(())
}

/// Table mode entry point: probabilities from the options, or from an interactive prompt.
pub fn table(opts: &HuffOpts) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let probabilities = if opts.probabilities.is_empty() {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        prompt_probabilities(&mut input, &mut out)?
    } else {
        check_probabilities(&opts.probabilities)?;
        opts.probabilities.clone()
    };
    info!("Building a code table for {} symbols.", probabilities.len());
    print_table(&probabilities, opts.tolerance, &mut out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn prompt_reasks_test() {
        let mut input = "two\n1\n3\n0.5\nabc\n1.5\n0.25\n0.25\n".as_bytes();
        let mut out = Vec::new();
        let probabilities = prompt_probabilities(&mut input, &mut out).unwrap();
        assert_eq!(probabilities, vec![0.5, 0.25, 0.25]);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Number of symbols must be").count(), 2);
        assert_eq!(text.matches("Probability must be").count(), 2);
        assert!(text.contains("Enter probability for symbol s2: "));
    }

    #[test]
    fn prompt_eof_test() {
        let mut input = "3\n0.5\n".as_bytes();
        let mut out = Vec::new();
        assert!(matches!(
            prompt_probabilities(&mut input, &mut out),
            Err(HuffmanError::Io(_))
        ));
    }

    #[test]
    fn print_table_test() {
        let mut out = Vec::new();
        print_table(&[0.7, 0.2, 0.1], 0.001, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("((s2, s1), s0)"));
        assert!(text.contains("s0 : 1\ns1 : 01\ns2 : 00\n"));
        assert!(text.contains("Average code length: 1.3000 bits/symbol"));
    }

    #[test]
    fn bad_sum_rejected_test() {
        let mut out = Vec::new();
        let result = print_table(&[0.25, 0.25], 0.001, &mut out);
        assert!(matches!(result, Err(HuffmanError::InvalidDistribution { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn command_line_table_checked_test() {
        for probabilities in [vec![1.0], vec![0.4], vec![], vec![0.5, 0.5, 0.0], vec![1.0, 0.0]] {
            assert!(matches!(
                check_probabilities(&probabilities),
                Err(HuffmanError::InvalidDistribution { .. })
            ));
        }
        assert!(check_probabilities(&[0.7, 0.2, 0.1]).is_ok());
    }

    #[test]
    fn certain_symbol_entropy_test() {
        let mut out = Vec::new();
        print_table(&[1.0], 0.001, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(entropy 0.0000)"));
        assert!(!text.contains("-0.0000"));
    }
}
