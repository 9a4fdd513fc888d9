//! Extended JSON v2 encoder.
//!
//! Renders a document as JSON where BSON-only types become `$`-prefixed
//! wrapper objects (`{"$oid":"..."}`, `{"$numberLong":"..."}`). Canonical
//! mode wraps every number and date; relaxed mode uses native JSON
//! numbers and ISO-8601 dates where they are representable.

use bson_core::{Bson, Document};
use chrono::{SecondsFormat, TimeZone, Utc};
use serde_json::{json, Map, Number, Value as Json};

/// Milliseconds for 9999-12-31T23:59:59.999Z, the top of the ISO-8601
/// range relaxed mode will format.
const ISO_DATE_MAX_MS: i64 = 253_402_300_799_999;

/// Options controlling Extended JSON output.
#[derive(Debug, Clone, Default)]
pub struct EjsonEncoderOptions {
    /// When `true`, every number and date gets an explicit type wrapper.
    /// When `false` (default), native JSON forms are used where lossless.
    pub canonical: bool,
}

/// Extended JSON encoder. Encoding never fails.
#[derive(Default)]
pub struct EjsonEncoder {
    pub options: EjsonEncoderOptions,
}

impl EjsonEncoder {
    /// Relaxed-mode encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical-mode encoder.
    pub fn canonical() -> Self {
        Self {
            options: EjsonEncoderOptions { canonical: true },
        }
    }

    pub fn with_options(options: EjsonEncoderOptions) -> Self {
        Self { options }
    }

    /// Encodes a document to an Extended JSON string.
    pub fn encode(&self, doc: &Document) -> String {
        Json::Object(self.write_document(doc)).to_string()
    }

    fn write_document(&self, doc: &Document) -> Map<String, Json> {
        doc.iter()
            .map(|(key, value)| (key.to_owned(), self.write_any(value)))
            .collect()
    }

    fn write_any(&self, value: &Bson) -> Json {
        match value {
            Bson::Double(f) => self.write_double(*f),
            Bson::String(s) => Json::String(s.clone()),
            Bson::Document(doc) => Json::Object(self.write_document(doc)),
            Bson::Array(items) => {
                Json::Array(items.iter().map(|v| self.write_any(v)).collect())
            }
            Bson::Binary(bin) => {
                use base64::Engine;
                json!({"$binary": {
                    "base64": base64::engine::general_purpose::STANDARD.encode(&bin.bytes),
                    "subType": hex::encode([bin.subtype]),
                }})
            }
            Bson::Undefined => json!({"$undefined": true}),
            Bson::ObjectId(id) => json!({"$oid": id.to_hex()}),
            Bson::Boolean(b) => Json::Bool(*b),
            Bson::DateTime(ms) => self.write_datetime(*ms),
            Bson::Null => Json::Null,
            Bson::RegularExpression(regex) => json!({"$regularExpression": {
                "pattern": &regex.pattern,
                "options": &regex.options,
            }}),
            Bson::DbPointer(ptr) => json!({"$dbPointer": {
                "$ref": &ptr.namespace,
                "$id": {"$oid": ptr.id.to_hex()},
            }}),
            Bson::JavaScriptCode(code) => json!({"$code": code}),
            Bson::Symbol(s) => json!({"$symbol": s}),
            Bson::JavaScriptCodeWithScope(cws) => json!({
                "$code": &cws.code,
                "$scope": Json::Object(self.write_document(&cws.scope)),
            }),
            Bson::Int32(v) => {
                if self.options.canonical {
                    json!({"$numberInt": v.to_string()})
                } else {
                    Json::Number(Number::from(*v))
                }
            }
            Bson::Timestamp(ts) => json!({"$timestamp": {"t": ts.time, "i": ts.increment}}),
            Bson::Int64(v) => {
                if self.options.canonical {
                    json!({"$numberLong": v.to_string()})
                } else {
                    Json::Number(Number::from(*v))
                }
            }
            Bson::Decimal128(d) => json!({"$numberDecimal": d.to_string()}),
            Bson::MinKey => json!({"$minKey": 1}),
            Bson::MaxKey => json!({"$maxKey": 1}),
        }
    }

    fn write_double(&self, f: f64) -> Json {
        if !self.options.canonical {
            // from_f64 is None exactly for NaN and the infinities, which
            // have no native JSON form and fall through to the wrapper.
            if let Some(n) = Number::from_f64(f) {
                return Json::Number(n);
            }
        }
        json!({"$numberDouble": double_repr(f)})
    }

    fn write_datetime(&self, ms: i64) -> Json {
        if !self.options.canonical && (0..=ISO_DATE_MAX_MS).contains(&ms) {
            if let Some(dt) = Utc.timestamp_millis_opt(ms).single() {
                return json!({"$date": dt.to_rfc3339_opts(SecondsFormat::Millis, true)});
            }
        }
        json!({"$date": {"$numberLong": ms.to_string()}})
    }
}

/// Shortest decimal form of a double, with `Infinity`/`-Infinity`/`NaN`
/// spelled out as Extended JSON requires.
fn double_repr(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_owned()
    } else if f == f64::INFINITY {
        "Infinity".to_owned()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_owned()
    } else {
        format!("{f:?}")
    }
}
