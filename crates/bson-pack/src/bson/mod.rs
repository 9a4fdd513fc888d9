//! Binary BSON codec.
//!
//! [`BsonEncoder`] turns a [`Document`](bson_core::Document) into bytes;
//! [`BsonDecoder`] parses bytes back, rejecting malformed input. Encoding
//! then decoding reproduces the document exactly, including entry order,
//! numeric case identity, and decimal128 bytes.

mod decoder;
mod encoder;
mod error;

pub use decoder::BsonDecoder;
pub use encoder::BsonEncoder;
pub use error::{DecodeError, EncodeError};

use bson_core::Document;

/// Encodes one document to BSON bytes.
pub fn encode_document(doc: &Document) -> Result<Vec<u8>, EncodeError> {
    BsonEncoder::new().encode(doc)
}

/// Decodes one document from BSON bytes, consuming the whole input.
pub fn decode_document(data: &[u8]) -> Result<Document, DecodeError> {
    BsonDecoder::new(data)
        .decode()
        .inspect_err(|e| log::debug!("bson decode failed on {} byte input: {e}", data.len()))
}
