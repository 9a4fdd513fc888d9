//! Extended JSON v2 decoder.
//!
//! Parses JSON text and rewrites `$`-prefixed wrapper objects into their
//! BSON types. Both canonical and relaxed spellings are accepted
//! regardless of how the text was produced. Wrapper objects are matched
//! by exact shape; extra keys alongside a wrapper are an error, while
//! DBRef fields (`$ref`, `$id`, `$db`) pass through as ordinary entries.

use base64::Engine;
use bson_core::{Binary, Bson, CodeWithScope, DbPointer, Document, ObjectId, Regex, Timestamp};
use serde_json::{Map, Value as Json};

use super::error::EjsonDecodeError;

/// Extended JSON decoder.
#[derive(Default)]
pub struct EjsonDecoder;

impl EjsonDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes one top-level document from Extended JSON text.
    pub fn decode(&self, input: &str) -> Result<Document, EjsonDecodeError> {
        let json: Json =
            serde_json::from_str(input).map_err(|e| EjsonDecodeError::Json(e.to_string()))?;
        match json {
            Json::Object(map) => match self.transform_object(map)? {
                Bson::Document(doc) => Ok(doc),
                _ => Err(EjsonDecodeError::TopLevelNotObject),
            },
            _ => Err(EjsonDecodeError::TopLevelNotObject),
        }
    }

    fn transform_any(&self, json: Json) -> Result<Bson, EjsonDecodeError> {
        match json {
            Json::Null => Ok(Bson::Null),
            Json::Bool(b) => Ok(Bson::Boolean(b)),
            Json::String(s) => Ok(Bson::String(s)),
            Json::Number(n) => Ok(transform_number(&n)),
            Json::Array(items) => Ok(Bson::Array(
                items
                    .into_iter()
                    .map(|item| self.transform_any(item))
                    .collect::<Result<_, _>>()?,
            )),
            Json::Object(map) => self.transform_object(map),
        }
    }

    /// Wrapper dispatch. An object containing a known wrapper key must
    /// match that wrapper's shape exactly; anything else is a plain
    /// document.
    fn transform_object(&self, map: Map<String, Json>) -> Result<Bson, EjsonDecodeError> {
        if map.contains_key("$oid") {
            only_keys(&map, "$oid", &["$oid"])?;
            let hex = expect_str(&map, "$oid")?;
            let id = ObjectId::parse_str(hex).map_err(|_| EjsonDecodeError::InvalidObjectId)?;
            return Ok(Bson::ObjectId(id));
        }
        if map.contains_key("$numberInt") {
            only_keys(&map, "$numberInt", &["$numberInt"])?;
            let text = expect_str(&map, "$numberInt")?;
            let v: i32 = text.parse().map_err(|_| {
                EjsonDecodeError::InvalidNumber("$numberInt", text.to_owned())
            })?;
            return Ok(Bson::Int32(v));
        }
        if map.contains_key("$numberLong") {
            only_keys(&map, "$numberLong", &["$numberLong"])?;
            let text = expect_str(&map, "$numberLong")?;
            let v: i64 = text.parse().map_err(|_| {
                EjsonDecodeError::InvalidNumber("$numberLong", text.to_owned())
            })?;
            return Ok(Bson::Int64(v));
        }
        if map.contains_key("$numberDouble") {
            only_keys(&map, "$numberDouble", &["$numberDouble"])?;
            let text = expect_str(&map, "$numberDouble")?;
            return Ok(Bson::Double(parse_double(text)?));
        }
        if map.contains_key("$numberDecimal") {
            only_keys(&map, "$numberDecimal", &["$numberDecimal"])?;
            let text = expect_str(&map, "$numberDecimal")?;
            let d = text.parse().map_err(|_| {
                EjsonDecodeError::InvalidNumber("$numberDecimal", text.to_owned())
            })?;
            return Ok(Bson::Decimal128(d));
        }
        if map.contains_key("$binary") {
            only_keys(&map, "$binary", &["$binary"])?;
            return transform_binary(&map);
        }
        if map.contains_key("$uuid") {
            only_keys(&map, "$uuid", &["$uuid"])?;
            let text = expect_str(&map, "$uuid")?;
            return Ok(Bson::Binary(parse_uuid(text)?));
        }
        if map.contains_key("$code") {
            only_keys(&map, "$code", &["$code", "$scope"])?;
            let code = expect_str(&map, "$code")?.to_owned();
            return match map.get("$scope") {
                None => Ok(Bson::JavaScriptCode(code)),
                Some(Json::Object(scope)) => {
                    match self.transform_object(scope.clone())? {
                        Bson::Document(scope) => {
                            Ok(Bson::JavaScriptCodeWithScope(CodeWithScope { code, scope }))
                        }
                        _ => Err(EjsonDecodeError::InvalidWrapper("$scope")),
                    }
                }
                Some(_) => Err(EjsonDecodeError::InvalidWrapper("$scope")),
            };
        }
        if map.contains_key("$symbol") {
            only_keys(&map, "$symbol", &["$symbol"])?;
            return Ok(Bson::Symbol(expect_str(&map, "$symbol")?.to_owned()));
        }
        if map.contains_key("$timestamp") {
            only_keys(&map, "$timestamp", &["$timestamp"])?;
            return transform_timestamp(&map);
        }
        if map.contains_key("$regularExpression") {
            only_keys(&map, "$regularExpression", &["$regularExpression"])?;
            return transform_regex(&map);
        }
        if map.contains_key("$dbPointer") {
            only_keys(&map, "$dbPointer", &["$dbPointer"])?;
            return self.transform_db_pointer(&map);
        }
        if map.contains_key("$date") {
            only_keys(&map, "$date", &["$date"])?;
            return self.transform_date(&map);
        }
        if map.contains_key("$minKey") {
            only_keys(&map, "$minKey", &["$minKey"])?;
            expect_literal_one(&map, "$minKey")?;
            return Ok(Bson::MinKey);
        }
        if map.contains_key("$maxKey") {
            only_keys(&map, "$maxKey", &["$maxKey"])?;
            expect_literal_one(&map, "$maxKey")?;
            return Ok(Bson::MaxKey);
        }
        if map.contains_key("$undefined") {
            only_keys(&map, "$undefined", &["$undefined"])?;
            if map.get("$undefined") != Some(&Json::Bool(true)) {
                return Err(EjsonDecodeError::InvalidWrapper("$undefined"));
            }
            return Ok(Bson::Undefined);
        }
        // Plain document. `$ref`, `$id`, and `$db` are DBRef fields and
        // stay as ordinary entries; any other `$`-key is unknown.
        let mut doc = Document::new();
        for (key, value) in map {
            if key.starts_with('$') && !matches!(key.as_str(), "$ref" | "$id" | "$db") {
                return Err(EjsonDecodeError::UnknownWrapper(key));
            }
            let value = self.transform_any(value)?;
            doc.insert(key, value);
        }
        Ok(Bson::Document(doc))
    }

    fn transform_db_pointer(&self, map: &Map<String, Json>) -> Result<Bson, EjsonDecodeError> {
        let inner = match map.get("$dbPointer") {
            Some(Json::Object(inner)) => inner,
            _ => return Err(EjsonDecodeError::InvalidWrapper("$dbPointer")),
        };
        if inner.len() != 2 {
            return Err(EjsonDecodeError::InvalidWrapper("$dbPointer"));
        }
        let namespace = expect_str(inner, "$ref")?.to_owned();
        let id = match inner.get("$id") {
            Some(Json::Object(oid)) => match self.transform_object(oid.clone())? {
                Bson::ObjectId(id) => id,
                _ => return Err(EjsonDecodeError::InvalidWrapper("$dbPointer")),
            },
            _ => return Err(EjsonDecodeError::InvalidWrapper("$dbPointer")),
        };
        Ok(Bson::DbPointer(DbPointer { namespace, id }))
    }

    fn transform_date(&self, map: &Map<String, Json>) -> Result<Bson, EjsonDecodeError> {
        match map.get("$date") {
            Some(Json::String(text)) => {
                let dt = chrono::DateTime::parse_from_rfc3339(text)
                    .map_err(|_| EjsonDecodeError::InvalidDate(text.clone()))?;
                Ok(Bson::DateTime(dt.timestamp_millis()))
            }
            Some(Json::Object(inner)) => match self.transform_object(inner.clone())? {
                Bson::Int64(ms) => Ok(Bson::DateTime(ms)),
                _ => Err(EjsonDecodeError::InvalidWrapper("$date")),
            },
            _ => Err(EjsonDecodeError::InvalidWrapper("$date")),
        }
    }
}

/// Relaxed-mode native numbers: integers that fit take the smallest
/// integer case, everything else is a double.
fn transform_number(n: &serde_json::Number) -> Bson {
    if let Some(i) = n.as_i64() {
        return match i32::try_from(i) {
            Ok(narrow) => Bson::Int32(narrow),
            Err(_) => Bson::Int64(i),
        };
    }
    Bson::Double(n.as_f64().unwrap_or(f64::NAN))
}

fn parse_double(text: &str) -> Result<f64, EjsonDecodeError> {
    match text {
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        "NaN" => Ok(f64::NAN),
        _ => text
            .parse()
            .map_err(|_| EjsonDecodeError::InvalidNumber("$numberDouble", text.to_owned())),
    }
}

fn transform_binary(map: &Map<String, Json>) -> Result<Bson, EjsonDecodeError> {
    let inner = match map.get("$binary") {
        Some(Json::Object(inner)) => inner,
        _ => return Err(EjsonDecodeError::InvalidWrapper("$binary")),
    };
    if inner.len() != 2 {
        return Err(EjsonDecodeError::InvalidWrapper("$binary"));
    }
    let payload = expect_str(inner, "base64")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| EjsonDecodeError::InvalidBase64)?;
    let subtype_hex = expect_str(inner, "subType")?;
    let subtype = match hex::decode(subtype_hex).ok().as_deref() {
        Some([b]) => *b,
        _ => return Err(EjsonDecodeError::InvalidSubtype(subtype_hex.to_owned())),
    };
    Ok(Bson::Binary(Binary { subtype, bytes }))
}

/// `8-4-4-4-12` hex form; becomes a binary value with the UUID subtype.
fn parse_uuid(text: &str) -> Result<Binary, EjsonDecodeError> {
    let invalid = || EjsonDecodeError::InvalidUuid(text.to_owned());
    let groups: Vec<&str> = text.split('-').collect();
    let lengths: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    if lengths != [8, 4, 4, 4, 12] {
        return Err(invalid());
    }
    let bytes = hex::decode(groups.concat()).map_err(|_| invalid())?;
    Ok(Binary {
        subtype: Binary::SUBTYPE_UUID,
        bytes,
    })
}

fn transform_timestamp(map: &Map<String, Json>) -> Result<Bson, EjsonDecodeError> {
    let inner = match map.get("$timestamp") {
        Some(Json::Object(inner)) => inner,
        _ => return Err(EjsonDecodeError::InvalidWrapper("$timestamp")),
    };
    if inner.len() != 2 {
        return Err(EjsonDecodeError::InvalidWrapper("$timestamp"));
    }
    let field = |name: &'static str| -> Result<u32, EjsonDecodeError> {
        let raw = inner
            .get(name)
            .and_then(Json::as_u64)
            .ok_or(EjsonDecodeError::InvalidWrapper("$timestamp"))?;
        u32::try_from(raw).map_err(|_| EjsonDecodeError::OutOfRange("$timestamp"))
    };
    Ok(Bson::Timestamp(Timestamp {
        time: field("t")?,
        increment: field("i")?,
    }))
}

fn transform_regex(map: &Map<String, Json>) -> Result<Bson, EjsonDecodeError> {
    let inner = match map.get("$regularExpression") {
        Some(Json::Object(inner)) => inner,
        _ => return Err(EjsonDecodeError::InvalidWrapper("$regularExpression")),
    };
    if inner.len() != 2 {
        return Err(EjsonDecodeError::InvalidWrapper("$regularExpression"));
    }
    Ok(Bson::RegularExpression(Regex {
        pattern: expect_str(inner, "pattern")?.to_owned(),
        options: expect_str(inner, "options")?.to_owned(),
    }))
}

fn only_keys(
    map: &Map<String, Json>,
    wrapper: &'static str,
    allowed: &[&str],
) -> Result<(), EjsonDecodeError> {
    if map.keys().all(|key| allowed.contains(&key.as_str())) {
        Ok(())
    } else {
        Err(EjsonDecodeError::ExtraKeys(wrapper))
    }
}

fn expect_str<'m>(
    map: &'m Map<String, Json>,
    key: &'static str,
) -> Result<&'m str, EjsonDecodeError> {
    map.get(key)
        .and_then(Json::as_str)
        .ok_or(EjsonDecodeError::InvalidWrapper(key))
}

fn expect_literal_one(
    map: &Map<String, Json>,
    wrapper: &'static str,
) -> Result<(), EjsonDecodeError> {
    match map.get(wrapper).and_then(Json::as_i64) {
        Some(1) => Ok(()),
        _ => Err(EjsonDecodeError::InvalidWrapper(wrapper)),
    }
}
