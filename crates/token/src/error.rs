//! Token stream error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    /// The input ended in the middle of a value.
    #[error("unexpected end of input at byte {0}")]
    EndOfInput(usize),
    /// The input is not syntactically valid JSON.
    #[error("malformed JSON at byte {0}")]
    Malformed(usize),
    /// The next token is well-formed but not of the requested kind.
    #[error("expected {expected} but was {found} at {path}")]
    Unexpected {
        expected: &'static str,
        found: String,
        path: String,
    },
    /// A string literal could not be unescaped.
    #[error("invalid string literal: {0}")]
    Str(#[from] serde_json::Error),
}

impl TokenError {
    /// Whether this error is a token-kind mismatch.
    ///
    /// Mismatches leave the cursor before the offending value and may be
    /// recovered by a caller; structural errors may not.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, TokenError::Unexpected { .. })
    }
}
