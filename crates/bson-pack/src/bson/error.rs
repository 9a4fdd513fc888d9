//! Binary codec errors.

use thiserror::Error;

/// Errors produced while encoding a document to bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Keys, regex patterns, and regex options are NUL-terminated on the
    /// wire and therefore cannot contain NUL themselves.
    #[error("NUL byte in cstring value {0:?}")]
    InteriorNul(String),
    /// The document body exceeds the `i32` size prefix.
    #[error("document of {0} bytes exceeds the maximum encodable size")]
    DocumentTooLarge(usize),
}

/// Errors produced while decoding bytes into a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended before the structure it announced.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A size prefix was negative, too small, or overran the buffer.
    #[error("invalid length prefix {0}")]
    InvalidLength(i32),
    /// An element carried a type byte outside the BSON assignment.
    #[error("unknown element type 0x{0:02x}")]
    UnknownElementType(u8),
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    /// Booleans must be encoded as 0x00 or 0x01.
    #[error("invalid boolean byte 0x{0:02x}")]
    InvalidBoolean(u8),
    /// A document or cstring was not NUL-terminated where required.
    #[error("missing NUL terminator")]
    MissingTerminator,
    /// The same key appeared twice within one document.
    #[error("duplicate key {0:?}")]
    DuplicateKey(String),
    /// Bytes remained after the top-level document ended.
    #[error("{0} trailing bytes after document")]
    TrailingBytes(usize),
    /// Array documents must use dense ascending index keys.
    #[error("array key {found:?} where {expected:?} was required")]
    InvalidArrayKey { expected: String, found: String },
    /// Documents nested deeper than the decoder's recursion limit.
    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),
}
