//! Error taxonomy for generation, encoding and decoding.

use json_static_token::TokenError;
use thiserror::Error;

/// A token whose shape does not match the expected value shape.
#[derive(Debug)]
pub struct ConversionError {
    pub expected: &'static str,
    pub found: String,
    pub path: String,
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "expected {} but was {} at {}",
            self.expected, self.found, self.path
        )
    }
}

impl From<TokenError> for ConversionError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Unexpected {
                expected,
                found,
                path,
            } => ConversionError {
                expected,
                found,
                path,
            },
            other => ConversionError {
                expected: "a value",
                found: other.to_string(),
                path: String::from("$"),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    /// Decoding of one object aborted on a field. Raised for strict,
    /// require-non-null and must-set violations alike; the enclosing
    /// object's remaining tokens have already been consumed.
    #[error("failed to decode {model}.{field}: {reason}")]
    Field {
        model: String,
        field: String,
        reason: String,
    },
    /// A value of the wrong shape outside any field context (the root
    /// value, or a collection element).
    #[error("{0}")]
    Conversion(ConversionError),
    /// The document itself is not valid JSON. Never recovered by a policy.
    #[error(transparent)]
    Syntax(#[from] TokenError),
    /// A nested model type was never registered.
    #[error("no codec registered for {type_name}")]
    UnresolvedAdapter { type_name: String },
    /// A registered codec produced a value of an unexpected kind.
    #[error("codec produced a value that is not {expected}")]
    Value { expected: &'static str },
}

#[derive(Debug, Error)]
pub enum EncodeError {
    /// The value handed to a codec is not of the kind it encodes.
    #[error("value is not {expected}")]
    Value { expected: &'static str },
    /// A nested model type was never registered.
    #[error("no codec registered for {type_name}")]
    UnresolvedAdapter { type_name: String },
}

/// A schema that could not be turned into a codec. Fatal to generation of
/// the one model only.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{model}.{field}: {type_name} is not a generated model type")]
    NotSerializable {
        model: String,
        field: String,
        type_name: String,
    },
    #[error("{model}.{field} has no accessor binding")]
    MissingBinding { model: String, field: String },
    #[error("{model}.{field}: accessor binding does not match shape {shape}")]
    BindingMismatch {
        model: String,
        field: String,
        shape: String,
    },
}
