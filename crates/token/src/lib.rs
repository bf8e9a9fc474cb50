//! Streaming JSON token layer for json-static generated codecs.
//!
//! The runtime reads and writes documents through an abstract stream of
//! structural events (begin/end object, begin/end array, name, value, null)
//! rather than through a document tree:
//!
//! - [`TokenReader`] - pull parser over a byte slice with cursor tracking,
//!   JSON-path diagnostics, recursive value skipping, and checkpoint/restore
//! - [`TokenWriter`] - push writer that manages separators and nesting over
//!   an auto-growing buffer
//!
//! # Example
//!
//! ```
//! use json_static_token::{TokenReader, TokenWriter, TokenKind};
//!
//! let mut writer = TokenWriter::new();
//! writer.begin_object();
//! writer.name("id");
//! writer.value_i64(42);
//! writer.end_object();
//! let data = writer.finish();
//! assert_eq!(data, b"{\"id\":42}");
//!
//! let mut reader = TokenReader::new(&data);
//! reader.begin_object().unwrap();
//! assert_eq!(reader.next_name().unwrap(), "id");
//! assert_eq!(reader.peek().unwrap(), TokenKind::Number);
//! assert_eq!(reader.next_i64().unwrap(), 42);
//! reader.end_object().unwrap();
//! ```

mod error;
mod reader;
mod writer;

pub use error::TokenError;
pub use reader::{Checkpoint, TokenKind, TokenReader};
pub use writer::TokenWriter;
