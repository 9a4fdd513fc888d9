//! Payload structs for the composite `Bson` variants.

use crate::{Document, ObjectId};

/// Binary data with a subtype tag (element type `0x05`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binary {
    pub subtype: u8,
    pub bytes: Vec<u8>,
}

impl Binary {
    /// Generic binary subtype (`0x00`).
    pub const SUBTYPE_GENERIC: u8 = 0x00;
    /// UUID subtype (`0x04`), used by the `$uuid` extended-JSON form.
    pub const SUBTYPE_UUID: u8 = 0x04;

    pub fn generic(bytes: Vec<u8>) -> Self {
        Self {
            subtype: Self::SUBTYPE_GENERIC,
            bytes,
        }
    }
}

/// Regular expression pattern and options (element type `0x0b`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Regex {
    pub pattern: String,
    pub options: String,
}

impl Regex {
    pub fn new(pattern: impl Into<String>, options: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            options: options.into(),
        }
    }
}

/// Internal replication timestamp (element type `0x11`): seconds and an
/// ordinal increment, distinct from the wall-clock datetime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    pub time: u32,
    pub increment: u32,
}

/// Deprecated namespace pointer (element type `0x0c`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DbPointer {
    pub namespace: String,
    pub id: ObjectId,
}

/// JavaScript code with a captured scope document (element type `0x0f`).
#[derive(Debug, Clone, PartialEq)]
pub struct CodeWithScope {
    pub code: String,
    pub scope: Document,
}
