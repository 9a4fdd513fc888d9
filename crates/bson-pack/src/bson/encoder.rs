//! Binary BSON encoder.
//!
//! BSON is a little-endian binary format. A document is a 4-byte total
//! size, a run of elements, and a terminating NUL; each element is a type
//! byte, a NUL-terminated key, and a type-specific payload.

use bson_core::{Bson, Document};

use super::error::EncodeError;

/// Encodes a [`Document`] to BSON bytes.
///
/// The top level is always a document; BSON has no scalar top-level
/// encoding.
#[derive(Default)]
pub struct BsonEncoder;

impl BsonEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, doc: &Document) -> Result<Vec<u8>, EncodeError> {
        self.write_document(doc)
    }

    fn write_document(&self, doc: &Document) -> Result<Vec<u8>, EncodeError> {
        let mut body: Vec<u8> = Vec::new();
        for (key, value) in doc {
            self.write_element(&mut body, key, value)?;
        }
        self.finish_document(body)
    }

    /// Arrays go on the wire as documents keyed "0", "1", ...
    fn write_array(&self, items: &[Bson]) -> Result<Vec<u8>, EncodeError> {
        let mut body: Vec<u8> = Vec::new();
        for (i, value) in items.iter().enumerate() {
            self.write_element(&mut body, &i.to_string(), value)?;
        }
        self.finish_document(body)
    }

    fn finish_document(&self, mut body: Vec<u8>) -> Result<Vec<u8>, EncodeError> {
        body.push(0);
        let total = body.len() + 4;
        if total > i32::MAX as usize {
            return Err(EncodeError::DocumentTooLarge(total));
        }
        let mut result = Vec::with_capacity(total);
        result.extend_from_slice(&(total as i32).to_le_bytes());
        result.extend_from_slice(&body);
        Ok(result)
    }

    fn write_element(&self, buf: &mut Vec<u8>, key: &str, value: &Bson) -> Result<(), EncodeError> {
        buf.push(value.element_type());
        self.write_cstring(buf, key)?;
        match value {
            Bson::Double(f) => buf.extend_from_slice(&f.to_le_bytes()),
            Bson::String(s) | Bson::JavaScriptCode(s) | Bson::Symbol(s) => {
                self.write_string(buf, s);
            }
            Bson::Document(doc) => {
                let nested = self.write_document(doc)?;
                buf.extend_from_slice(&nested);
            }
            Bson::Array(items) => {
                let nested = self.write_array(items)?;
                buf.extend_from_slice(&nested);
            }
            Bson::Binary(bin) => {
                buf.extend_from_slice(&(bin.bytes.len() as i32).to_le_bytes());
                buf.push(bin.subtype);
                buf.extend_from_slice(&bin.bytes);
            }
            Bson::ObjectId(id) => buf.extend_from_slice(&id.bytes()),
            Bson::Boolean(b) => buf.push(*b as u8),
            Bson::DateTime(ms) => buf.extend_from_slice(&ms.to_le_bytes()),
            Bson::RegularExpression(regex) => {
                self.write_cstring(buf, &regex.pattern)?;
                self.write_cstring(buf, &regex.options)?;
            }
            Bson::DbPointer(ptr) => {
                self.write_string(buf, &ptr.namespace);
                buf.extend_from_slice(&ptr.id.bytes());
            }
            Bson::JavaScriptCodeWithScope(cws) => {
                let scope = self.write_document(&cws.scope)?;
                // total length covers itself, the code string, and the scope
                let total = 4 + 4 + cws.code.len() + 1 + scope.len();
                if total > i32::MAX as usize {
                    return Err(EncodeError::DocumentTooLarge(total));
                }
                buf.extend_from_slice(&(total as i32).to_le_bytes());
                self.write_string(buf, &cws.code);
                buf.extend_from_slice(&scope);
            }
            Bson::Int32(v) => buf.extend_from_slice(&v.to_le_bytes()),
            Bson::Timestamp(ts) => {
                buf.extend_from_slice(&ts.increment.to_le_bytes());
                buf.extend_from_slice(&ts.time.to_le_bytes());
            }
            Bson::Int64(v) => buf.extend_from_slice(&v.to_le_bytes()),
            Bson::Decimal128(d) => buf.extend_from_slice(&d.bytes()),
            Bson::Undefined | Bson::Null | Bson::MinKey | Bson::MaxKey => {}
        }
        Ok(())
    }

    /// Keys and regex fields. NUL cannot appear in the value, so its
    /// presence is an error rather than a silent truncation.
    fn write_cstring(&self, buf: &mut Vec<u8>, s: &str) -> Result<(), EncodeError> {
        if s.as_bytes().contains(&0) {
            return Err(EncodeError::InteriorNul(s.to_owned()));
        }
        buf.extend_from_slice(s.as_bytes());
        buf.push(0);
        Ok(())
    }

    /// Length-prefixed string; the length covers the trailing NUL, and
    /// interior NULs are permitted.
    fn write_string(&self, buf: &mut Vec<u8>, s: &str) {
        buf.extend_from_slice(&((s.len() + 1) as i32).to_le_bytes());
        buf.extend_from_slice(s.as_bytes());
        buf.push(0);
    }
}
