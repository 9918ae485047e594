//! Common error types for primitives

use thiserror::Error;

/// Numeric parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Input was empty (or only a sign)
    #[error("empty numeric string")]
    Empty,

    /// A character outside the accepted digit set
    #[error("invalid digit {ch:?} @ index {index}")]
    InvalidDigit {
        /// Offending character
        ch: char,
        /// Byte index within the input
        index: usize,
    },

    /// Magnitude does not fit in 256 bits
    #[error("value exceeds 256 bits: {0}")]
    Overflow(String),
}
