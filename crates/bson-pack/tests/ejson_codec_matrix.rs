//! Extended JSON round trips, wrapper parsing, and malformed input.

use bson_core::{doc, Binary, Bson, Decimal128, ObjectId, Regex, Timestamp};
use bson_pack::ejson::{
    from_str, to_canonical_string, to_relaxed_string, EjsonDecodeError, EjsonEncoder,
};
use serde_json::{json, Value as Json};

fn as_json(text: &str) -> Json {
    serde_json::from_str(text).unwrap()
}

#[test]
fn canonical_wraps_numbers() {
    let doc = doc! { "i": 5, "l": 5i64, "d": 5.0 };
    let text = to_canonical_string(&doc);
    assert_eq!(
        as_json(&text),
        json!({
            "i": {"$numberInt": "5"},
            "l": {"$numberLong": "5"},
            "d": {"$numberDouble": "5.0"},
        })
    );
}

#[test]
fn relaxed_uses_native_numbers() {
    let doc = doc! { "i": 5, "l": 5i64, "d": 5.5 };
    let text = to_relaxed_string(&doc);
    assert_eq!(as_json(&text), json!({"i": 5, "l": 5, "d": 5.5}));
}

#[test]
fn canonical_round_trip_is_exact() {
    let doc = doc! {
        "i": 5,
        "l": 5i64,
        "d": 0.1,
        "dec": ("0.1".parse::<Decimal128>().unwrap()),
        "id": (ObjectId::from_bytes([7; 12])),
        "when": (Bson::DateTime(-1)),
        "bin": (Binary { subtype: 0x04, bytes: vec![1, 2, 3, 4] }),
        "re": (Regex::new("^x", "i")),
        "ts": (Timestamp { time: 1, increment: 2 }),
        "min": (Bson::MinKey),
        "max": (Bson::MaxKey),
        "none": (Bson::Undefined),
        "nested": { "arr": [1, {"deep": true}] },
    };
    let back = from_str(&to_canonical_string(&doc)).unwrap();
    assert_eq!(back, doc);
    // Integer case identity is preserved by canonical wrappers.
    assert_eq!(back.get("l"), Some(&Bson::Int64(5)));
}

#[test]
fn relaxed_round_trip_preserves_value_equality() {
    let doc = doc! { "small": 5i64, "big": ((1i64 << 40)), "d": 2.5 };
    let back = from_str(&to_relaxed_string(&doc)).unwrap();
    // Small integers come back in the narrower case, but the documents
    // still compare equal under cross-numeric equality.
    assert_eq!(back.get("small"), Some(&Bson::Int32(5)));
    assert_eq!(back.get("big"), Some(&Bson::Int64(1 << 40)));
    assert_eq!(back, doc);
}

#[test]
fn non_finite_doubles_always_wrap() {
    let doc = doc! { "nan": (f64::NAN), "inf": (f64::INFINITY), "ninf": (f64::NEG_INFINITY) };
    for text in [to_relaxed_string(&doc), to_canonical_string(&doc)] {
        assert_eq!(
            as_json(&text),
            json!({
                "nan": {"$numberDouble": "NaN"},
                "inf": {"$numberDouble": "Infinity"},
                "ninf": {"$numberDouble": "-Infinity"},
            })
        );
        let back = from_str(&text).unwrap();
        assert_eq!(back, doc);
    }
}

#[test]
fn relaxed_dates_use_iso_in_range() {
    let doc = doc! { "epoch": (Bson::DateTime(0)), "mid": (Bson::DateTime(1_356_351_330_500i64)) };
    let json = as_json(&to_relaxed_string(&doc));
    assert_eq!(json["epoch"], json!({"$date": "1970-01-01T00:00:00.000Z"}));
    assert_eq!(json["mid"], json!({"$date": "2012-12-24T12:15:30.500Z"}));
    assert_eq!(from_str(&to_relaxed_string(&doc)).unwrap(), doc);

    // Pre-epoch dates fall back to the wrapped form even in relaxed mode.
    let doc = doc! { "old": (Bson::DateTime(-5_000)) };
    let json = as_json(&to_relaxed_string(&doc));
    assert_eq!(json["old"], json!({"$date": {"$numberLong": "-5000"}}));
}

#[test]
fn uuid_wrapper_decodes_to_subtype_four() {
    let back = from_str(r#"{"u": {"$uuid": "00112233-4455-6677-8899-aabbccddeeff"}}"#).unwrap();
    let expected = Binary {
        subtype: Binary::SUBTYPE_UUID,
        bytes: vec![
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ],
    };
    assert_eq!(back.get("u"), Some(&Bson::Binary(expected)));

    assert_eq!(
        from_str(r#"{"u": {"$uuid": "not-a-uuid"}}"#),
        Err(EjsonDecodeError::InvalidUuid("not-a-uuid".into()))
    );
}

#[test]
fn code_with_and_without_scope() {
    let back = from_str(r#"{"f": {"$code": "x + 1"}}"#).unwrap();
    assert_eq!(back.get("f"), Some(&Bson::JavaScriptCode("x + 1".into())));

    let back = from_str(r#"{"f": {"$code": "x + y", "$scope": {"y": 2}}}"#).unwrap();
    match back.get("f") {
        Some(Bson::JavaScriptCodeWithScope(cws)) => {
            assert_eq!(cws.code, "x + y");
            assert_eq!(cws.scope, doc! { "y": 2 });
        }
        other => panic!("unexpected value {other:?}"),
    }
}

#[test]
fn dbref_fields_pass_through() {
    let back = from_str(
        r#"{"link": {"$ref": "users", "$id": {"$oid": "0102030405060708090a0b0c"}, "$db": "app"}}"#,
    )
    .unwrap();
    let link = back.get_document("link").expect("plain document");
    assert_eq!(link.get_str("$ref"), Some("users"));
    assert_eq!(
        link.get_object_id("$id"),
        Some(ObjectId::from_bytes([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]))
    );
    assert_eq!(link.get_str("$db"), Some("app"));
}

#[test]
fn wrapper_shape_errors() {
    assert_eq!(
        from_str(r#"{"a": {"$oid": "xyz", "extra": 1}}"#),
        Err(EjsonDecodeError::ExtraKeys("$oid"))
    );
    assert_eq!(
        from_str(r#"{"a": {"$oid": "xyz"}}"#),
        Err(EjsonDecodeError::InvalidObjectId)
    );
    assert_eq!(
        from_str(r#"{"a": {"$numberInt": "9999999999"}}"#),
        Err(EjsonDecodeError::InvalidNumber(
            "$numberInt",
            "9999999999".into()
        ))
    );
    assert_eq!(
        from_str(r#"{"a": {"$unknownThing": 1}}"#),
        Err(EjsonDecodeError::UnknownWrapper("$unknownThing".into()))
    );
    assert_eq!(
        from_str(r#"{"a": {"$binary": {"base64": "!!", "subType": "00"}}}"#),
        Err(EjsonDecodeError::InvalidBase64)
    );
    assert_eq!(
        from_str(r#"{"a": {"$timestamp": {"t": 1, "i": 4294967296}}}"#),
        Err(EjsonDecodeError::OutOfRange("$timestamp"))
    );
    assert_eq!(
        from_str(r#"{"a": {"$minKey": 2}}"#),
        Err(EjsonDecodeError::InvalidWrapper("$minKey"))
    );
}

#[test]
fn top_level_must_be_an_object() {
    assert_eq!(from_str("[1, 2]"), Err(EjsonDecodeError::TopLevelNotObject));
    assert_eq!(from_str("42"), Err(EjsonDecodeError::TopLevelNotObject));
    assert_eq!(
        from_str(r#"{"$numberInt": "5"}"#),
        Err(EjsonDecodeError::TopLevelNotObject)
    );
    assert!(matches!(
        from_str("{nope"),
        Err(EjsonDecodeError::Json(_))
    ));
}

#[test]
fn key_order_survives_both_dialects() {
    let doc = doc! { "z": 1, "a": 2, "m": 3 };
    for text in [to_relaxed_string(&doc), to_canonical_string(&doc)] {
        let back = from_str(&text).unwrap();
        let keys: Vec<_> = back.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}

#[test]
fn encoder_options_select_the_mode() {
    let doc = doc! { "n": 1 };
    let relaxed = EjsonEncoder::new().encode(&doc);
    let canonical = EjsonEncoder::canonical().encode(&doc);
    assert_eq!(as_json(&relaxed), json!({"n": 1}));
    assert_eq!(as_json(&canonical), json!({"n": {"$numberInt": "1"}}));
}
