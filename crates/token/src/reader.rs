//! Pull parser over a JSON byte slice.

use crate::error::TokenError;

/// Kind of the next structural event in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Name,
    Str,
    Number,
    Bool,
    Null,
    EndOfDocument,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokenKind::BeginObject => "an object",
            TokenKind::EndObject => "end of object",
            TokenKind::BeginArray => "an array",
            TokenKind::EndArray => "end of array",
            TokenKind::Name => "a name",
            TokenKind::Str => "a string",
            TokenKind::Number => "a number",
            TokenKind::Bool => "a boolean",
            TokenKind::Null => "null",
            TokenKind::EndOfDocument => "end of document",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjState {
    /// Before the first key or the closing brace.
    FirstKey,
    /// After a value; a comma or the closing brace follows.
    Key,
    /// A comma has been consumed; a key must follow.
    KeyReady,
    /// After a key; a value follows.
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrState {
    First,
    Next,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
enum Frame {
    Doc { consumed: bool },
    Object { state: ObjState, name: Option<String> },
    Array { state: ArrState, index: usize },
}

/// A saved cursor position; see [`TokenReader::checkpoint`].
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pos: usize,
    stack: Vec<Frame>,
}

/// Streaming reader producing structural JSON tokens from a byte slice.
///
/// The reader tracks nesting itself: callers drive it with
/// `begin_object`/`has_next`/`next_name`/value reads/`end_object` and never
/// see separators. All diagnostics carry the current JSON path.
pub struct TokenReader<'a> {
    data: &'a [u8],
    pos: usize,
    stack: Vec<Frame>,
}

impl<'a> TokenReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            stack: vec![Frame::Doc { consumed: false }],
        }
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// JSON path of the value being read, e.g. `$.items[2].name`.
    pub fn path(&self) -> String {
        let mut out = String::from("$");
        for frame in &self.stack {
            match frame {
                Frame::Doc { .. } => {}
                Frame::Object { name: Some(n), .. } => {
                    out.push('.');
                    out.push_str(n);
                }
                Frame::Object { name: None, .. } => {}
                Frame::Array { index, .. } => {
                    out.push('[');
                    out.push_str(&index.to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    /// Save the cursor so a partially-consumed value can be re-read or
    /// skipped after a conversion failure.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            stack: self.stack.clone(),
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.stack = checkpoint.stack;
    }

    /// Kind of the next token, consuming any pending separators.
    pub fn peek(&mut self) -> Result<TokenKind, TokenError> {
        self.skip_ws();
        let top = self.stack.len() - 1;
        match self.stack[top].clone() {
            Frame::Doc { consumed } => {
                if consumed {
                    if self.pos >= self.data.len() {
                        Ok(TokenKind::EndOfDocument)
                    } else {
                        Err(TokenError::Malformed(self.pos))
                    }
                } else {
                    self.peek_value()
                }
            }
            Frame::Object { state, .. } => match state {
                ObjState::FirstKey => match self.byte()? {
                    b'}' => Ok(TokenKind::EndObject),
                    b'"' => Ok(TokenKind::Name),
                    _ => Err(TokenError::Malformed(self.pos)),
                },
                ObjState::Key => match self.byte()? {
                    b'}' => Ok(TokenKind::EndObject),
                    b',' => {
                        self.pos += 1;
                        self.set_obj_state(ObjState::KeyReady);
                        self.skip_ws();
                        if self.byte()? == b'"' {
                            Ok(TokenKind::Name)
                        } else {
                            Err(TokenError::Malformed(self.pos))
                        }
                    }
                    _ => Err(TokenError::Malformed(self.pos)),
                },
                ObjState::KeyReady => {
                    if self.byte()? == b'"' {
                        Ok(TokenKind::Name)
                    } else {
                        Err(TokenError::Malformed(self.pos))
                    }
                }
                ObjState::Value => self.peek_value(),
            },
            Frame::Array { state, .. } => match state {
                ArrState::First => {
                    if self.byte()? == b']' {
                        Ok(TokenKind::EndArray)
                    } else {
                        self.peek_value()
                    }
                }
                ArrState::Next => match self.byte()? {
                    b']' => Ok(TokenKind::EndArray),
                    b',' => {
                        self.pos += 1;
                        self.set_arr_state(ArrState::Ready);
                        self.skip_ws();
                        self.peek_value()
                    }
                    _ => Err(TokenError::Malformed(self.pos)),
                },
                ArrState::Ready => self.peek_value(),
            },
        }
    }

    /// Whether the current object or array has another name or element.
    pub fn has_next(&mut self) -> Result<bool, TokenError> {
        let kind = self.peek()?;
        Ok(kind != TokenKind::EndObject && kind != TokenKind::EndArray)
    }

    pub fn begin_object(&mut self) -> Result<(), TokenError> {
        self.expect(TokenKind::BeginObject, "an object")?;
        self.pos += 1;
        self.stack.push(Frame::Object {
            state: ObjState::FirstKey,
            name: None,
        });
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<(), TokenError> {
        self.expect(TokenKind::EndObject, "end of object")?;
        self.pos += 1;
        self.stack.pop();
        self.value_consumed();
        Ok(())
    }

    pub fn begin_array(&mut self) -> Result<(), TokenError> {
        self.expect(TokenKind::BeginArray, "an array")?;
        self.pos += 1;
        self.stack.push(Frame::Array {
            state: ArrState::First,
            index: 0,
        });
        Ok(())
    }

    pub fn end_array(&mut self) -> Result<(), TokenError> {
        self.expect(TokenKind::EndArray, "end of array")?;
        self.pos += 1;
        self.stack.pop();
        self.value_consumed();
        Ok(())
    }

    /// Read the next object key and its `:` separator.
    pub fn next_name(&mut self) -> Result<String, TokenError> {
        self.expect(TokenKind::Name, "a name")?;
        let name = self.parse_string()?;
        self.skip_ws();
        if self.byte()? != b':' {
            return Err(TokenError::Malformed(self.pos));
        }
        self.pos += 1;
        if let Some(Frame::Object { state, name: slot }) = self.stack.last_mut() {
            *state = ObjState::Value;
            *slot = Some(name.clone());
        }
        Ok(name)
    }

    pub fn next_str(&mut self) -> Result<String, TokenError> {
        self.expect(TokenKind::Str, "a string")?;
        let value = self.parse_string()?;
        self.value_consumed();
        Ok(value)
    }

    pub fn next_bool(&mut self) -> Result<bool, TokenError> {
        self.expect(TokenKind::Bool, "a boolean")?;
        let value = if self.data[self.pos..].starts_with(b"true") {
            self.pos += 4;
            true
        } else if self.data[self.pos..].starts_with(b"false") {
            self.pos += 5;
            false
        } else {
            return Err(TokenError::Malformed(self.pos));
        };
        self.value_consumed();
        Ok(value)
    }

    pub fn next_null(&mut self) -> Result<(), TokenError> {
        self.expect(TokenKind::Null, "null")?;
        if !self.data[self.pos..].starts_with(b"null") {
            return Err(TokenError::Malformed(self.pos));
        }
        self.pos += 4;
        self.value_consumed();
        Ok(())
    }

    pub fn next_f64(&mut self) -> Result<f64, TokenError> {
        self.expect(TokenKind::Number, "a number")?;
        let text = self.number_text()?;
        let value: f64 = text
            .parse()
            .map_err(|_| TokenError::Malformed(self.pos))?;
        self.pos += text.len();
        self.value_consumed();
        Ok(value)
    }

    /// Read an integer, accepting integral floats (`3.0`) losslessly.
    pub fn next_i64(&mut self) -> Result<i64, TokenError> {
        self.expect(TokenKind::Number, "a number")?;
        let text = self.number_text()?;
        let value = match text.parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                let d: f64 = text
                    .parse()
                    .map_err(|_| TokenError::Malformed(self.pos))?;
                if d.fract() == 0.0 && d >= i64::MIN as f64 && d <= i64::MAX as f64 {
                    d as i64
                } else {
                    return Err(TokenError::Unexpected {
                        expected: "an integer",
                        found: text.to_string(),
                        path: self.path(),
                    });
                }
            }
        };
        self.pos += text.len();
        self.value_consumed();
        Ok(value)
    }

    /// Skip the next value, recursing through nested structures.
    pub fn skip_value(&mut self) -> Result<(), TokenError> {
        match self.peek()? {
            TokenKind::BeginObject => {
                self.begin_object()?;
                while self.has_next()? {
                    self.next_name()?;
                    self.skip_value()?;
                }
                self.end_object()
            }
            TokenKind::BeginArray => {
                self.begin_array()?;
                while self.has_next()? {
                    self.skip_value()?;
                }
                self.end_array()
            }
            TokenKind::Str => self.next_str().map(|_| ()),
            TokenKind::Number => self.next_f64().map(|_| ()),
            TokenKind::Bool => self.next_bool().map(|_| ()),
            TokenKind::Null => self.next_null(),
            found => Err(TokenError::Unexpected {
                expected: "a value",
                found: found.to_string(),
                path: self.path(),
            }),
        }
    }

    /// Discard the remaining names and values of the current object and
    /// consume its end token, leaving the cursor just past the object.
    pub fn skip_rest_of_object(&mut self) -> Result<(), TokenError> {
        while self.has_next()? {
            self.next_name()?;
            self.skip_value()?;
        }
        self.end_object()
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), TokenError> {
        let found = self.peek()?;
        if found == kind {
            Ok(())
        } else {
            Err(TokenError::Unexpected {
                expected,
                found: found.to_string(),
                path: self.path(),
            })
        }
    }

    fn peek_value(&mut self) -> Result<TokenKind, TokenError> {
        match self.byte()? {
            b'{' => Ok(TokenKind::BeginObject),
            b'[' => Ok(TokenKind::BeginArray),
            b'"' => Ok(TokenKind::Str),
            b't' | b'f' => Ok(TokenKind::Bool),
            b'n' => Ok(TokenKind::Null),
            b'-' | b'0'..=b'9' => Ok(TokenKind::Number),
            _ => Err(TokenError::Malformed(self.pos)),
        }
    }

    fn byte(&self) -> Result<u8, TokenError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(TokenError::EndOfInput(self.pos))
    }

    fn skip_ws(&mut self) {
        while let Some(ch) = self.data.get(self.pos) {
            match ch {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn set_obj_state(&mut self, new: ObjState) {
        if let Some(Frame::Object { state, .. }) = self.stack.last_mut() {
            *state = new;
        }
    }

    fn set_arr_state(&mut self, new: ArrState) {
        if let Some(Frame::Array { state, .. }) = self.stack.last_mut() {
            *state = new;
        }
    }

    /// Update the enclosing frame after a complete value has been consumed.
    fn value_consumed(&mut self) {
        match self.stack.last_mut() {
            Some(Frame::Doc { consumed }) => *consumed = true,
            Some(Frame::Object { state, .. }) => *state = ObjState::Key,
            Some(Frame::Array { state, index }) => {
                *state = ArrState::Next;
                *index += 1;
            }
            None => {}
        }
    }

    /// Parse the string literal at the cursor (which must be `"`), leaving
    /// the cursor just past the closing quote.
    fn parse_string(&mut self) -> Result<String, TokenError> {
        debug_assert_eq!(self.data.get(self.pos), Some(&b'"'));
        let close = find_ending_quote(self.data, self.pos + 1)?;
        let literal = &self.data[self.pos..=close];
        let value: String = serde_json::from_slice(literal)?;
        self.pos = close + 1;
        Ok(value)
    }

    /// The number literal starting at the cursor, not yet consumed.
    fn number_text(&self) -> Result<&'a str, TokenError> {
        let data = self.data;
        let start = self.pos;
        let mut end = start;
        while let Some(ch) = data.get(end) {
            match ch {
                b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9' => end += 1,
                _ => break,
            }
        }
        if end == start {
            return Err(TokenError::Malformed(start));
        }
        std::str::from_utf8(&data[start..end]).map_err(|_| TokenError::Malformed(start))
    }
}

/// Position of the closing `"` of a string whose contents start at `x`.
///
/// Handles backslash escaping: `\"` inside the string does not terminate it.
fn find_ending_quote(data: &[u8], mut x: usize) -> Result<usize, TokenError> {
    let len = data.len();
    let mut prev: u8 = 0;
    while x < len {
        let ch = data[x];
        if ch == b'"' && prev != b'\\' {
            return Ok(x);
        }
        // double-backslash cancels the escape
        if ch == b'\\' && prev == b'\\' {
            prev = 0;
        } else {
            prev = ch;
        }
        x += 1;
    }
    Err(TokenError::EndOfInput(x))
}
