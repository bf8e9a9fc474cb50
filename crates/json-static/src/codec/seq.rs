//! Collection recovery adapters.
//!
//! Wraps an element codec so that a failing element is dropped and
//! reported rather than failing the whole collection. Recovery is a
//! property of the container: it applies regardless of the element type's
//! own policy, and the surviving elements keep their order. Encoding has no
//! recovery logic.

use json_static_token::{TokenKind, TokenReader, TokenWriter};

use super::{map_token, Codec, DecodeContext, Failure, FieldValue, ValueRef};
use crate::adapter::AdapterHandle;
use crate::error::{DecodeError, EncodeError};

/// Element-recovering codec for list and array shapes.
pub(crate) struct SeqCodec {
    element: AdapterHandle,
}

impl SeqCodec {
    pub(crate) fn new(element: AdapterHandle) -> SeqCodec {
        SeqCodec { element }
    }
}

impl Codec for SeqCodec {
    fn encode(&self, value: &ValueRef<'_>, writer: &mut TokenWriter) -> Result<(), EncodeError> {
        let items = match value {
            ValueRef::Seq(items) => items,
            _ => {
                return Err(EncodeError::Value {
                    expected: "a sequence",
                })
            }
        };
        let codec = self
            .element
            .get()
            .map_err(|type_name| EncodeError::UnresolvedAdapter { type_name })?;
        writer.begin_array();
        for item in items {
            codec.encode(item, writer)?;
        }
        writer.end_array();
        Ok(())
    }

    fn decode(
        &self,
        reader: &mut TokenReader<'_>,
        cx: &DecodeContext,
    ) -> Result<FieldValue, DecodeError> {
        if reader.peek().map_err(map_token)? == TokenKind::Null {
            reader.next_null().map_err(map_token)?;
            return Ok(FieldValue::Null);
        }
        reader.begin_array().map_err(map_token)?;
        let codec = self
            .element
            .get()
            .map_err(|type_name| DecodeError::UnresolvedAdapter { type_name })?;
        let mut items = Vec::new();
        while reader.has_next().map_err(DecodeError::Syntax)? {
            let checkpoint = reader.checkpoint();
            match codec.decode(reader, cx) {
                Ok(value) => items.push(value),
                Err(error) => match Failure::classify(error) {
                    Failure::Mismatch(conversion) => {
                        reader.restore(checkpoint);
                        reader.skip_value().map_err(DecodeError::Syntax)?;
                        cx.report(&DecodeError::Conversion(conversion));
                    }
                    // The element consumed its own tokens before aborting.
                    Failure::Aborted(error) => cx.report(&error),
                    Failure::Fatal(error) => return Err(error),
                },
            }
        }
        reader.end_array().map_err(DecodeError::Syntax)?;
        Ok(FieldValue::Seq(items))
    }
}

/// Entry-recovering codec for string-keyed map shapes.
pub(crate) struct MapCodec {
    value: AdapterHandle,
}

impl MapCodec {
    pub(crate) fn new(value: AdapterHandle) -> MapCodec {
        MapCodec { value }
    }
}

impl Codec for MapCodec {
    fn encode(&self, value: &ValueRef<'_>, writer: &mut TokenWriter) -> Result<(), EncodeError> {
        let entries = match value {
            ValueRef::Map(entries) => entries,
            _ => return Err(EncodeError::Value { expected: "a map" }),
        };
        let codec = self
            .value
            .get()
            .map_err(|type_name| EncodeError::UnresolvedAdapter { type_name })?;
        writer.begin_object();
        for (key, entry) in entries {
            writer.name(key);
            codec.encode(entry, writer)?;
        }
        writer.end_object();
        Ok(())
    }

    fn decode(
        &self,
        reader: &mut TokenReader<'_>,
        cx: &DecodeContext,
    ) -> Result<FieldValue, DecodeError> {
        if reader.peek().map_err(map_token)? == TokenKind::Null {
            reader.next_null().map_err(map_token)?;
            return Ok(FieldValue::Null);
        }
        reader.begin_object().map_err(map_token)?;
        let codec = self
            .value
            .get()
            .map_err(|type_name| DecodeError::UnresolvedAdapter { type_name })?;
        let mut entries = Vec::new();
        while reader.has_next().map_err(DecodeError::Syntax)? {
            let key = reader.next_name().map_err(DecodeError::Syntax)?;
            let checkpoint = reader.checkpoint();
            match codec.decode(reader, cx) {
                Ok(value) => entries.push((key, value)),
                Err(error) => match Failure::classify(error) {
                    Failure::Mismatch(conversion) => {
                        reader.restore(checkpoint);
                        reader.skip_value().map_err(DecodeError::Syntax)?;
                        cx.report(&DecodeError::Conversion(conversion));
                    }
                    Failure::Aborted(error) => cx.report(&error),
                    Failure::Fatal(error) => return Err(error),
                },
            }
        }
        reader.end_object().map_err(DecodeError::Syntax)?;
        Ok(FieldValue::Map(entries))
    }
}
