//! Scalar reads and element codecs.
//!
//! The relaxed readers implement the value coercions the decode algorithm
//! applies to scalar fields: booleans additionally accept `"true"`/`"false"`
//! strings (case-insensitive) and the numbers 1/0; numeric reads additionally
//! accept string tokens holding a parseable number. A failed coercion is an
//! ordinary token-kind mismatch for the field's policy to handle.

use json_static_token::{TokenError, TokenKind, TokenReader, TokenWriter};

use super::{map_token, Codec, DecodeContext, FieldValue, ValueRef};
use crate::error::{DecodeError, EncodeError};

pub(crate) fn read_bool_relaxed(reader: &mut TokenReader<'_>) -> Result<bool, TokenError> {
    match reader.peek()? {
        TokenKind::Str => {
            let path = reader.path();
            let text = reader.next_str()?;
            if text.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if text.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(TokenError::Unexpected {
                    expected: "true or false",
                    found: format!("\"{text}\""),
                    path,
                })
            }
        }
        TokenKind::Number => {
            let path = reader.path();
            let number = reader.next_f64()?;
            if number == 1.0 {
                Ok(true)
            } else if number == 0.0 {
                Ok(false)
            } else {
                Err(TokenError::Unexpected {
                    expected: "1 or 0",
                    found: number.to_string(),
                    path,
                })
            }
        }
        _ => reader.next_bool(),
    }
}

pub(crate) fn read_i64_relaxed(reader: &mut TokenReader<'_>) -> Result<i64, TokenError> {
    match reader.peek()? {
        TokenKind::Str => {
            let path = reader.path();
            let text = reader.next_str()?;
            parse_i64(&text).ok_or_else(|| TokenError::Unexpected {
                expected: "a number",
                found: format!("\"{text}\""),
                path,
            })
        }
        _ => reader.next_i64(),
    }
}

pub(crate) fn read_f64_relaxed(reader: &mut TokenReader<'_>) -> Result<f64, TokenError> {
    match reader.peek()? {
        TokenKind::Str => {
            let path = reader.path();
            let text = reader.next_str()?;
            text.trim().parse::<f64>().map_err(|_| TokenError::Unexpected {
                expected: "a number",
                found: format!("\"{text}\""),
                path,
            })
        }
        _ => reader.next_f64(),
    }
}

fn parse_i64(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(v) = text.parse::<i64>() {
        return Some(v);
    }
    let d: f64 = text.parse().ok()?;
    if d.fract() == 0.0 && d >= i64::MIN as f64 && d <= i64::MAX as f64 {
        Some(d as i64)
    } else {
        None
    }
}

/// Boolean element codec with relaxed coercion.
pub(crate) struct BoolCodec;

impl Codec for BoolCodec {
    fn encode(&self, value: &ValueRef<'_>, writer: &mut TokenWriter) -> Result<(), EncodeError> {
        match value {
            ValueRef::Bool(v) => {
                writer.value_bool(*v);
                Ok(())
            }
            _ => Err(EncodeError::Value {
                expected: "a boolean",
            }),
        }
    }

    fn decode(
        &self,
        reader: &mut TokenReader<'_>,
        _cx: &DecodeContext,
    ) -> Result<FieldValue, DecodeError> {
        if reader.peek().map_err(map_token)? == TokenKind::Null {
            reader.next_null().map_err(map_token)?;
            return Ok(FieldValue::Null);
        }
        read_bool_relaxed(reader)
            .map(FieldValue::Bool)
            .map_err(map_token)
    }
}

/// Integer-like and long element codec.
pub(crate) struct IntCodec;

impl Codec for IntCodec {
    fn encode(&self, value: &ValueRef<'_>, writer: &mut TokenWriter) -> Result<(), EncodeError> {
        match value {
            ValueRef::Int(v) => {
                writer.value_i64(*v);
                Ok(())
            }
            _ => Err(EncodeError::Value {
                expected: "a number",
            }),
        }
    }

    fn decode(
        &self,
        reader: &mut TokenReader<'_>,
        _cx: &DecodeContext,
    ) -> Result<FieldValue, DecodeError> {
        if reader.peek().map_err(map_token)? == TokenKind::Null {
            reader.next_null().map_err(map_token)?;
            return Ok(FieldValue::Null);
        }
        read_i64_relaxed(reader)
            .map(FieldValue::Int)
            .map_err(map_token)
    }
}

/// Float and double element codec.
pub(crate) struct FloatCodec;

impl Codec for FloatCodec {
    fn encode(&self, value: &ValueRef<'_>, writer: &mut TokenWriter) -> Result<(), EncodeError> {
        match value {
            ValueRef::Float(v) => {
                writer.value_f64(*v);
                Ok(())
            }
            _ => Err(EncodeError::Value {
                expected: "a number",
            }),
        }
    }

    fn decode(
        &self,
        reader: &mut TokenReader<'_>,
        _cx: &DecodeContext,
    ) -> Result<FieldValue, DecodeError> {
        if reader.peek().map_err(map_token)? == TokenKind::Null {
            reader.next_null().map_err(map_token)?;
            return Ok(FieldValue::Null);
        }
        read_f64_relaxed(reader)
            .map(FieldValue::Float)
            .map_err(map_token)
    }
}

/// String element codec.
pub(crate) struct StrCodec;

impl Codec for StrCodec {
    fn encode(&self, value: &ValueRef<'_>, writer: &mut TokenWriter) -> Result<(), EncodeError> {
        match value {
            ValueRef::Str(v) => {
                writer.value_str(v);
                Ok(())
            }
            _ => Err(EncodeError::Value {
                expected: "a string",
            }),
        }
    }

    fn decode(
        &self,
        reader: &mut TokenReader<'_>,
        _cx: &DecodeContext,
    ) -> Result<FieldValue, DecodeError> {
        if reader.peek().map_err(map_token)? == TokenKind::Null {
            reader.next_null().map_err(map_token)?;
            return Ok(FieldValue::Null);
        }
        reader.next_str().map(FieldValue::Str).map_err(map_token)
    }
}

#[cfg(test)]
mod tests {
    use json_static_token::TokenReader;

    use super::{read_bool_relaxed, read_i64_relaxed};

    fn reader(json: &str) -> TokenReader<'_> {
        TokenReader::new(json.as_bytes())
    }

    #[test]
    fn bool_accepts_native_tokens() {
        assert!(read_bool_relaxed(&mut reader("true")).unwrap());
        assert!(!read_bool_relaxed(&mut reader("false")).unwrap());
    }

    #[test]
    fn bool_accepts_strings_case_insensitively() {
        assert!(read_bool_relaxed(&mut reader("\"TRUE\"")).unwrap());
        assert!(!read_bool_relaxed(&mut reader("\"False\"")).unwrap());
    }

    #[test]
    fn bool_accepts_one_and_zero() {
        assert!(read_bool_relaxed(&mut reader("1")).unwrap());
        assert!(!read_bool_relaxed(&mut reader("0")).unwrap());
        assert!(read_bool_relaxed(&mut reader("1.0")).unwrap());
    }

    #[test]
    fn bool_rejects_other_strings_and_numbers() {
        let err = read_bool_relaxed(&mut reader("\"2\"")).unwrap_err();
        assert!(err.is_mismatch());
        assert_eq!(err.to_string(), "expected true or false but was \"2\" at $");
        let err = read_bool_relaxed(&mut reader("2")).unwrap_err();
        assert!(err.is_mismatch());
    }

    #[test]
    fn int_accepts_numeric_strings() {
        assert_eq!(read_i64_relaxed(&mut reader("\"42\"")).unwrap(), 42);
        assert_eq!(read_i64_relaxed(&mut reader("\" -7 \"")).unwrap(), -7);
        assert_eq!(read_i64_relaxed(&mut reader("7")).unwrap(), 7);
    }

    #[test]
    fn int_rejects_garbage_strings() {
        let err = read_i64_relaxed(&mut reader("\"x\"")).unwrap_err();
        assert!(err.is_mismatch());
    }
}
