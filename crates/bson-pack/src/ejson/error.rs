//! Extended JSON decode errors.
//!
//! Encoding is infallible; every document has an Extended JSON rendering
//! in both modes.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EjsonDecodeError {
    /// The input was not valid JSON at all.
    #[error("invalid JSON: {0}")]
    Json(String),
    /// Extended JSON documents are objects at the top level.
    #[error("top-level value must be an object")]
    TopLevelNotObject,
    /// A `$`-prefixed key that is neither a known wrapper nor a DBRef
    /// field.
    #[error("unknown wrapper key {0:?}")]
    UnknownWrapper(String),
    /// A wrapper object carried keys beyond its defined shape.
    #[error("unexpected extra keys alongside {0}")]
    ExtraKeys(&'static str),
    /// A wrapper payload had the wrong JSON type or missing fields.
    #[error("malformed {0} wrapper")]
    InvalidWrapper(&'static str),
    #[error("invalid ObjectId payload")]
    InvalidObjectId,
    /// A stringified number that does not parse in its declared type.
    #[error("invalid {0} payload {1:?}")]
    InvalidNumber(&'static str, String),
    #[error("invalid base64 payload")]
    InvalidBase64,
    #[error("invalid binary subtype {0:?}")]
    InvalidSubtype(String),
    #[error("invalid UUID string {0:?}")]
    InvalidUuid(String),
    #[error("invalid $date payload {0:?}")]
    InvalidDate(String),
    /// A numeric field outside the range its BSON type can hold.
    #[error("number out of range in {0} wrapper")]
    OutOfRange(&'static str),
}
