//! Error handling for huffpress.
//!
//! Every failure the coder can report is a variant of [`HuffmanError`]. None of them are
//! retried internally; re-prompting or re-reading is left to the caller.

use thiserror::Error;

/// Main error type for the huffpress library
#[derive(Error, Debug)]
pub enum HuffmanError {
    /// The weights handed to the tree builder are not a usable distribution
    #[error("Invalid distribution: {message}")]
    InvalidDistribution {
        /// What was wrong with the weights
        message: String,
    },

    /// A symbol being encoded has no code in the table
    #[error("Unknown symbol {symbol} at position {position}")]
    UnknownSymbol {
        /// Debug rendering of the offending symbol
        symbol: String,
        /// Index of the symbol in the input sequence
        position: usize,
    },

    /// The bitstream ran out before the declared length, or stopped inside a code
    #[error("Truncated stream: ended inside a code or short of its declared length ({available} of {bit_count} bits)")]
    TruncatedStream {
        /// Bit count the caller declared
        bit_count: usize,
        /// Bits actually usable
        available: usize,
    },

    /// Decoding produced a different number of symbols than expected
    #[error("Length mismatch: expected {expected} symbols, decoded {actual}")]
    LengthMismatch {
        /// Symbol count recorded alongside the stream
        expected: usize,
        /// Symbol count actually decoded
        actual: usize,
    },

    /// A persisted file does not follow the container layout
    #[error("Corrupt container: {message}")]
    CorruptContainer {
        /// What failed to validate
        message: String,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HuffmanError {
    /// Create an invalid distribution error
    pub fn invalid_distribution<S: Into<String>>(message: S) -> Self {
        Self::InvalidDistribution {
            message: message.into(),
        }
    }

    /// Create a corrupt container error
    pub fn corrupt<S: Into<String>>(message: S) -> Self {
        Self::CorruptContainer {
            message: message.into(),
        }
    }
}

/// Result type alias for huffpress operations
pub type Result<T> = std::result::Result<T, HuffmanError>;

#[cfg(test)]
mod test {
    use super::HuffmanError;

    #[test]
    fn display_test() {
        let err = HuffmanError::LengthMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Length mismatch: expected 4 symbols, decoded 3");

        let err = HuffmanError::invalid_distribution("sum is 0.5");
        assert_eq!(err.to_string(), "Invalid distribution: sum is 0.5");
    }

    #[test]
    fn io_conversion_test() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: HuffmanError = io.into();
        assert!(matches!(err, HuffmanError::Io(_)));
    }
}
