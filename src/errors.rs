//! Error types for the automatic differentiation crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error variants for the fallible entry points of the crate.
pub enum ADError {
    #[error("Symbol error: empty input")]
    /// A symbol was parsed from an empty (or all-whitespace) string.
    EmptySymbol,
    #[error("Symbol error: `{0}` is neither an identifier nor a numeric literal")]
    /// A symbol was parsed from text that is not a single atom.
    InvalidSymbol(String),
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, ADError>;
