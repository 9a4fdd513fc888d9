//! Extended JSON v2 (MongoDB Extended JSON) encoding and decoding.
//!
//! Extended JSON is a superset of JSON that preserves BSON type
//! information through `$`-prefixed wrapper objects such as
//! `{"$oid":"..."}` and `{"$numberInt":"..."}`.
//!
//! Two output modes exist:
//! - **Canonical**: every number and date gets an explicit type wrapper;
//!   decoding canonical output restores the document exactly.
//! - **Relaxed** (default): native JSON numbers and ISO-8601 dates where
//!   possible; decoding may narrow integer cases, but the result still
//!   compares equal under cross-numeric value equality.
//!
//! The decoder accepts both spellings regardless of mode.

mod decoder;
mod encoder;
mod error;

pub use decoder::EjsonDecoder;
pub use encoder::{EjsonEncoder, EjsonEncoderOptions};
pub use error::EjsonDecodeError;

use bson_core::Document;

/// Encodes a document in relaxed mode.
pub fn to_relaxed_string(doc: &Document) -> String {
    EjsonEncoder::new().encode(doc)
}

/// Encodes a document in canonical mode.
pub fn to_canonical_string(doc: &Document) -> String {
    EjsonEncoder::canonical().encode(doc)
}

/// Decodes a document from Extended JSON text.
pub fn from_str(input: &str) -> Result<Document, EjsonDecodeError> {
    EjsonDecoder::new()
        .decode(input)
        .inspect_err(|e| log::debug!("ejson decode failed: {e}"))
}
