//! Core BSON data model.
//!
//! This crate holds the value union ([`Bson`]), the ordered document type
//! ([`Document`]) with its sequence operations, and the scalar types that
//! back the less common wire elements ([`ObjectId`], [`Decimal128`],
//! [`Binary`], and friends). Codecs live in the companion `bson-pack`
//! crate; nothing here touches bytes.
//!
//! The numeric cases compare and hash by value across representations:
//!
//! ```
//! use bson_core::Bson;
//!
//! assert_eq!(Bson::Int32(5), Bson::Int64(5));
//! assert_eq!(Bson::Int64(5), Bson::Double(5.0));
//! assert_eq!(Bson::Double(5.01).to_i32(), None);
//! ```

pub mod decimal128;
pub mod document;
#[macro_use]
mod macros;
pub mod oid;
pub mod seq;
pub mod types;
pub mod value;

pub use decimal128::{Decimal128, ParseDecimalError};
pub use document::Document;
pub use oid::{ObjectId, ParseObjectIdError};
pub use types::{Binary, CodeWithScope, DbPointer, Regex, Timestamp};
pub use value::Bson;
