//! Codec boundaries for the `bson-core` data model.
//!
//! Two codecs, one value model:
//! - [`bson`]: the binary BSON wire format, byte-exact in both
//!   directions.
//! - [`ejson`]: Extended JSON v2 text, canonical or relaxed.
//!
//! ```
//! use bson_core::doc;
//!
//! let order = doc! { "sku": "A-7", "qty": 3 };
//! let bytes = bson_pack::bson::encode_document(&order)?;
//! let back = bson_pack::bson::decode_document(&bytes)?;
//! assert_eq!(order, back);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bson;
pub mod ejson;
