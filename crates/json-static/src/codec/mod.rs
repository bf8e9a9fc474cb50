//! Codec trait and the erased value currency.
//!
//! Generated codecs move values across the type-erasure seam in two forms:
//! borrowed [`ValueRef`]s on the way out (encode) and owned [`FieldValue`]s
//! on the way in (decode). Accessor functions supplied by the schema front
//! end translate between a concrete model struct and these forms.

pub(crate) mod model;
pub(crate) mod scalar;
pub(crate) mod seq;

pub use model::{FieldOp, GeneratedCodec, ModelBinding};

use std::any::Any;
use std::sync::Arc;

use json_static_token::{TokenError, TokenReader, TokenWriter};

use crate::error::{ConversionError, DecodeError, EncodeError};
use crate::sink::ErrorSink;

/// Borrowed view of a value being encoded.
pub enum ValueRef<'a> {
    Bool(bool),
    /// Integer-like and long values, widened.
    Int(i64),
    /// Float and double values, widened.
    Float(f64),
    Str(&'a str),
    /// A nested model value.
    Object(&'a dyn Any),
    /// List or array elements, in order.
    Seq(Vec<ValueRef<'a>>),
    /// String-keyed map entries, in order.
    Map(Vec<(&'a str, ValueRef<'a>)>),
}

/// Owned result of decoding a value.
pub enum FieldValue {
    /// Wire null.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Object(Box<dyn Any>),
    Seq(Vec<FieldValue>),
    Map(Vec<(String, FieldValue)>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_i64(self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_f64(self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            FieldValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_object<T: 'static>(self) -> Option<T> {
        match self {
            FieldValue::Object(boxed) => boxed.downcast::<T>().ok().map(|b| *b),
            _ => None,
        }
    }

    pub fn into_seq(self) -> Option<Vec<FieldValue>> {
        match self {
            FieldValue::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_map(self) -> Option<Vec<(String, FieldValue)>> {
        match self {
            FieldValue::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

/// Ambient state threaded through a decode call tree.
pub struct DecodeContext {
    pub(crate) sink: Option<Arc<dyn ErrorSink>>,
}

impl DecodeContext {
    pub fn new(sink: Option<Arc<dyn ErrorSink>>) -> Self {
        Self { sink }
    }

    pub(crate) fn report(&self, error: &DecodeError) {
        if let Some(sink) = &self.sink {
            sink.log(error);
        }
    }
}

/// Paired encode/decode behavior for one value type.
///
/// Codecs are stateless beyond their resolved dependencies and safe for
/// concurrent use once constructed.
pub trait Codec: Send + Sync {
    fn encode(&self, value: &ValueRef<'_>, writer: &mut TokenWriter) -> Result<(), EncodeError>;

    /// Decode a value, returning [`FieldValue::Null`] for wire null.
    /// Whether null is acceptable is the caller's decision, not this
    /// codec's.
    fn decode(
        &self,
        reader: &mut TokenReader<'_>,
        cx: &DecodeContext,
    ) -> Result<FieldValue, DecodeError>;
}

/// Lift a reader error to a decode error: kind mismatches become
/// conversion errors, everything else is a syntax failure.
pub(crate) fn map_token(error: TokenError) -> DecodeError {
    if error.is_mismatch() {
        DecodeError::Conversion(error.into())
    } else {
        DecodeError::Syntax(error)
    }
}

/// How a failed read is handled by the containing structure.
pub(crate) enum Failure {
    /// Wrong token shape. The cursor must be restored to the value start
    /// and the value skipped before continuing.
    Mismatch(ConversionError),
    /// A nested decode aborted; the stream is already positioned past the
    /// failed value.
    Aborted(DecodeError),
    /// Structural or configuration error; never recovered by a policy.
    Fatal(DecodeError),
}

impl Failure {
    pub(crate) fn classify(error: DecodeError) -> Failure {
        match error {
            DecodeError::Conversion(c) => Failure::Mismatch(c),
            DecodeError::Syntax(t) if t.is_mismatch() => Failure::Mismatch(t.into()),
            err @ DecodeError::Field { .. } => Failure::Aborted(err),
            err => Failure::Fatal(err),
        }
    }

    pub(crate) fn classify_token(error: TokenError) -> Failure {
        if error.is_mismatch() {
            Failure::Mismatch(error.into())
        } else {
            Failure::Fatal(DecodeError::Syntax(error))
        }
    }

    /// The error as reported to the sink or embedded in an abort reason.
    pub(crate) fn into_error(self) -> DecodeError {
        match self {
            Failure::Mismatch(c) => DecodeError::Conversion(c),
            Failure::Aborted(e) | Failure::Fatal(e) => e,
        }
    }
}
