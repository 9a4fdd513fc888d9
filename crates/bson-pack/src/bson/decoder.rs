//! Binary BSON decoder.
//!
//! The decoder is strict: stated sizes must match what is actually read,
//! documents must end with their NUL terminator, keys must be unique, and
//! array documents must use dense ascending index keys. Malformed input
//! is an error, never a best-effort value.

use bson_core::{Binary, Bson, CodeWithScope, DbPointer, Decimal128, Document, ObjectId, Regex,
    Timestamp};

use super::error::DecodeError;

/// Documents and scopes may nest at most this many levels deep; the
/// decoder recurses per level, so hostile input must not pick the depth.
pub const MAX_DEPTH: usize = 256;

/// Cursor over a borrowed BSON byte slice.
pub struct BsonDecoder<'a> {
    data: &'a [u8],
    x: usize,
    depth: usize,
}

impl<'a> BsonDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, x: 0, depth: 0 }
    }

    /// Decodes one top-level document, consuming the whole input.
    pub fn decode(mut self) -> Result<Document, DecodeError> {
        let doc = self.read_document()?;
        let rest = self.data.len() - self.x;
        if rest != 0 {
            return Err(DecodeError::TrailingBytes(rest));
        }
        Ok(doc)
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), DecodeError> {
        if self.x + n > self.data.len() {
            Err(DecodeError::UnexpectedEof)
        } else {
            Ok(())
        }
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        self.check(1)?;
        let val = self.data[self.x];
        self.x += 1;
        Ok(val)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.x..self.x + N]);
        self.x += N;
        Ok(out)
    }

    fn i32_le(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn u32_le(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn i64_le(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    fn f64_le(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_le_bytes(self.array()?))
    }

    fn buf(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.check(n)?;
        let bytes = &self.data[self.x..self.x + n];
        self.x += n;
        Ok(bytes)
    }

    fn utf8(&mut self, n: usize) -> Result<String, DecodeError> {
        let bytes = self.buf(n)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8)
    }

    fn read_cstring(&mut self) -> Result<String, DecodeError> {
        let start = self.x;
        while self.x < self.data.len() && self.data[self.x] != 0 {
            self.x += 1;
        }
        if self.x >= self.data.len() {
            return Err(DecodeError::MissingTerminator);
        }
        let s = String::from_utf8(self.data[start..self.x].to_vec())
            .map_err(|_| DecodeError::InvalidUtf8)?;
        self.x += 1;
        Ok(s)
    }

    fn read_string(&mut self) -> Result<String, DecodeError> {
        let length = self.i32_le()?;
        if length < 1 {
            return Err(DecodeError::InvalidLength(length));
        }
        let s = self.utf8(length as usize - 1)?;
        if self.u8()? != 0 {
            return Err(DecodeError::MissingTerminator);
        }
        Ok(s)
    }

    /// Reads a document's size prefix and validates it against the
    /// buffer, returning the position just past the terminator.
    fn read_document_header(&mut self) -> Result<usize, DecodeError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(DecodeError::DepthExceeded(MAX_DEPTH));
        }
        let size = self.i32_le()?;
        if size < 5 {
            return Err(DecodeError::InvalidLength(size));
        }
        let end = self.x + size as usize - 4;
        if end > self.data.len() {
            return Err(DecodeError::UnexpectedEof);
        }
        Ok(end)
    }

    fn read_document(&mut self) -> Result<Document, DecodeError> {
        let end = self.read_document_header()?;
        let mut doc = Document::new();
        while self.x < end - 1 {
            let element_type = self.u8()?;
            if element_type == 0 {
                // terminator before the stated size was consumed
                return Err(DecodeError::MissingTerminator);
            }
            let key = self.read_cstring()?;
            let value = self.read_element_value(element_type)?;
            if doc.contains_key(&key) {
                return Err(DecodeError::DuplicateKey(key));
            }
            doc.insert(key, value);
        }
        self.read_document_terminator(end)?;
        Ok(doc)
    }

    fn read_array(&mut self) -> Result<Vec<Bson>, DecodeError> {
        let end = self.read_document_header()?;
        let mut items = Vec::new();
        while self.x < end - 1 {
            let element_type = self.u8()?;
            if element_type == 0 {
                return Err(DecodeError::MissingTerminator);
            }
            let key = self.read_cstring()?;
            let expected = items.len().to_string();
            if key != expected {
                return Err(DecodeError::InvalidArrayKey {
                    expected,
                    found: key,
                });
            }
            items.push(self.read_element_value(element_type)?);
        }
        self.read_document_terminator(end)?;
        Ok(items)
    }

    fn read_document_terminator(&mut self, end: usize) -> Result<(), DecodeError> {
        // an element that overran the stated size lands past end - 1
        if self.x != end - 1 || self.data[self.x] != 0 {
            return Err(DecodeError::MissingTerminator);
        }
        self.x = end;
        self.depth -= 1;
        Ok(())
    }

    fn read_element_value(&mut self, typ: u8) -> Result<Bson, DecodeError> {
        match typ {
            0x01 => Ok(Bson::Double(self.f64_le()?)),
            0x02 => Ok(Bson::String(self.read_string()?)),
            0x03 => Ok(Bson::Document(self.read_document()?)),
            0x04 => Ok(Bson::Array(self.read_array()?)),
            0x05 => self.read_binary(),
            0x06 => Ok(Bson::Undefined),
            0x07 => Ok(Bson::ObjectId(ObjectId::from_bytes(self.array()?))),
            0x08 => match self.u8()? {
                0 => Ok(Bson::Boolean(false)),
                1 => Ok(Bson::Boolean(true)),
                b => Err(DecodeError::InvalidBoolean(b)),
            },
            0x09 => Ok(Bson::DateTime(self.i64_le()?)),
            0x0a => Ok(Bson::Null),
            0x0b => {
                let pattern = self.read_cstring()?;
                let options = self.read_cstring()?;
                Ok(Bson::RegularExpression(Regex { pattern, options }))
            }
            0x0c => {
                let namespace = self.read_string()?;
                let id = ObjectId::from_bytes(self.array()?);
                Ok(Bson::DbPointer(DbPointer { namespace, id }))
            }
            0x0d => Ok(Bson::JavaScriptCode(self.read_string()?)),
            0x0e => Ok(Bson::Symbol(self.read_string()?)),
            0x0f => self.read_code_with_scope(),
            0x10 => Ok(Bson::Int32(self.i32_le()?)),
            0x11 => {
                let increment = self.u32_le()?;
                let time = self.u32_le()?;
                Ok(Bson::Timestamp(Timestamp { time, increment }))
            }
            0x12 => Ok(Bson::Int64(self.i64_le()?)),
            0x13 => Ok(Bson::Decimal128(Decimal128::from_bytes(self.array()?))),
            0xff => Ok(Bson::MinKey),
            0x7f => Ok(Bson::MaxKey),
            t => Err(DecodeError::UnknownElementType(t)),
        }
    }

    fn read_binary(&mut self) -> Result<Bson, DecodeError> {
        let length = self.i32_le()?;
        if length < 0 {
            return Err(DecodeError::InvalidLength(length));
        }
        let subtype = self.u8()?;
        let bytes = self.buf(length as usize)?.to_vec();
        Ok(Bson::Binary(Binary { subtype, bytes }))
    }

    fn read_code_with_scope(&mut self) -> Result<Bson, DecodeError> {
        let total = self.i32_le()?;
        // 4-byte total, minimal string (5), minimal document (5)
        if total < 14 {
            return Err(DecodeError::InvalidLength(total));
        }
        let start = self.x - 4;
        let code = self.read_string()?;
        let scope = self.read_document()?;
        if self.x - start != total as usize {
            return Err(DecodeError::InvalidLength(total));
        }
        Ok(Bson::JavaScriptCodeWithScope(CodeWithScope { code, scope }))
    }
}
