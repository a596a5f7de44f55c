// tilefloat: a micro-float FMA tile reference model
// error.rs
//
// Error types for the text-boundary bitstring conversions.
// Everything past this boundary is internal and asserts instead.

use thiserror::Error;

/// Failure parsing a hex or binary digit string into one of the
/// fixed-width encoded-bits newtypes in [`crate::bits`] (e.g.
/// [`crate::bits::Fp16Bits`]).
///
/// This is the one place in the crate where malformed input is a
/// recoverable [`Result`] rather than a panic: hex/binary text arrives
/// from a human or a CLI argument, not from another part of the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BitStringError {
    /// The string's length did not match the format's expected bit width.
    #[error("expected {expected} bits, found {found}")]
    WrongLength { expected: usize, found: usize },

    /// A character outside `{0, 1}` appeared in a binary digit string.
    #[error("invalid binary digit {ch:?} at position {pos}")]
    InvalidDigit { ch: char, pos: usize },

    /// A character outside `[0-9a-fA-F]` appeared in a hex digit string.
    #[error("invalid hex digit {ch:?} at position {pos}")]
    InvalidHexDigit { ch: char, pos: usize },
}
