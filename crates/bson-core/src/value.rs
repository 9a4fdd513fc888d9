//! The BSON value model: a closed tagged union with one variant per wire
//! type, coercion-free narrowing accessors, lossless-only numeric
//! conversions, and equality/hash/ordering that follow the BSON cross-type
//! comparison rules.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::decimal128::Decimal128;
use crate::document::Document;
use crate::oid::ObjectId;
use crate::types::{Binary, CodeWithScope, DbPointer, Regex, Timestamp};

/// 2^63 as a double; doubles at or above this magnitude are outside `i64`.
const I64_BOUND_F64: f64 = 9_223_372_036_854_775_808.0;

/// A single BSON value.
///
/// The union is closed: every consumer (codecs, the comparator, the
/// hasher) matches exhaustively, so adding a wire type is a compile-time
/// all-sites change.
#[derive(Debug, Clone)]
pub enum Bson {
    /// 64-bit IEEE 754 double (`0x01`).
    Double(f64),
    /// UTF-8 string (`0x02`).
    String(String),
    /// Embedded document (`0x03`).
    Document(Document),
    /// Array (`0x04`), positionally addressed.
    Array(Vec<Bson>),
    /// Binary data with subtype tag (`0x05`).
    Binary(Binary),
    /// Deprecated undefined (`0x06`).
    Undefined,
    /// 12-byte ObjectId (`0x07`).
    ObjectId(ObjectId),
    /// Boolean (`0x08`).
    Boolean(bool),
    /// UTC datetime, milliseconds since the Unix epoch (`0x09`).
    DateTime(i64),
    /// Null (`0x0a`).
    Null,
    /// Regular expression (`0x0b`).
    RegularExpression(Regex),
    /// Deprecated DB pointer (`0x0c`).
    DbPointer(DbPointer),
    /// JavaScript code (`0x0d`).
    JavaScriptCode(String),
    /// Deprecated symbol (`0x0e`).
    Symbol(String),
    /// JavaScript code with captured scope (`0x0f`).
    JavaScriptCodeWithScope(CodeWithScope),
    /// 32-bit signed integer (`0x10`).
    Int32(i32),
    /// Replication timestamp (`0x11`).
    Timestamp(Timestamp),
    /// 64-bit signed integer (`0x12`).
    Int64(i64),
    /// 128-bit decimal (`0x13`).
    Decimal128(Decimal128),
    /// Sentinel below every other value (`0xff`).
    MinKey,
    /// Sentinel above every other value (`0x7f`).
    MaxKey,
}

impl Bson {
    /// The wire type byte of this value.
    pub fn element_type(&self) -> u8 {
        match self {
            Bson::Double(_) => 0x01,
            Bson::String(_) => 0x02,
            Bson::Document(_) => 0x03,
            Bson::Array(_) => 0x04,
            Bson::Binary(_) => 0x05,
            Bson::Undefined => 0x06,
            Bson::ObjectId(_) => 0x07,
            Bson::Boolean(_) => 0x08,
            Bson::DateTime(_) => 0x09,
            Bson::Null => 0x0a,
            Bson::RegularExpression(_) => 0x0b,
            Bson::DbPointer(_) => 0x0c,
            Bson::JavaScriptCode(_) => 0x0d,
            Bson::Symbol(_) => 0x0e,
            Bson::JavaScriptCodeWithScope(_) => 0x0f,
            Bson::Int32(_) => 0x10,
            Bson::Timestamp(_) => 0x11,
            Bson::Int64(_) => 0x12,
            Bson::Decimal128(_) => 0x13,
            Bson::MaxKey => 0x7f,
            Bson::MinKey => 0xff,
        }
    }

    // ----------------------------------------------------------------
    // Narrowing accessors: exact case match, no coercion.

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Bson::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Bson::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Bson::Document(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Bson]> {
        match self {
            Bson::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&Binary> {
        match self {
            Bson::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Bson::ObjectId(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Bson::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Milliseconds since the Unix epoch, for the datetime case only.
    pub fn as_datetime(&self) -> Option<i64> {
        match self {
            Bson::DateTime(ms) => Some(*ms),
            _ => None,
        }
    }

    pub fn as_regex(&self) -> Option<&Regex> {
        match self {
            Bson::RegularExpression(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_db_pointer(&self) -> Option<&DbPointer> {
        match self {
            Bson::DbPointer(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_javascript(&self) -> Option<&str> {
        match self {
            Bson::JavaScriptCode(code) => Some(code),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Bson::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_javascript_with_scope(&self) -> Option<&CodeWithScope> {
        match self {
            Bson::JavaScriptCodeWithScope(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Bson::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Bson::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Bson::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_decimal128(&self) -> Option<Decimal128> {
        match self {
            Bson::Decimal128(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Bson::Null)
    }

    /// `true` for the four numeric cases.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_)
        )
    }

    // ----------------------------------------------------------------
    // Lossless conversions: succeed only when the numeric
    // reinterpretation is exact. A distinct family from the accessors
    // above; callers rely on the absence/exactness split.

    pub fn to_i32(&self) -> Option<i32> {
        match self {
            Bson::Int32(v) => Some(*v),
            Bson::Int64(v) => i32::try_from(*v).ok(),
            Bson::Double(f) => {
                let wide = f64_to_i64_exact(*f)?;
                i32::try_from(wide).ok()
            }
            Bson::Decimal128(d) => d.to_i32_exact(),
            _ => None,
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Bson::Int32(v) => Some(*v as i64),
            Bson::Int64(v) => Some(*v),
            Bson::Double(f) => f64_to_i64_exact(*f),
            Bson::Decimal128(d) => d.to_i64_exact(),
            _ => None,
        }
    }

    /// Generic integer conversion; the native integer case is 64-bit.
    pub fn to_int(&self) -> Option<i64> {
        self.to_i64()
    }

    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Bson::Double(f) => Some(*f),
            Bson::Int32(v) => Some(*v as f64),
            Bson::Int64(v) => {
                let f = *v as f64;
                if eq_i64_f64(*v, f) {
                    Some(f)
                } else {
                    None
                }
            }
            Bson::Decimal128(d) => d.to_f64_exact(),
            _ => None,
        }
    }

    pub fn to_decimal128(&self) -> Option<Decimal128> {
        match self {
            Bson::Decimal128(d) => Some(*d),
            Bson::Int32(v) => Some(Decimal128::from_i32(*v)),
            Bson::Int64(v) => Some(Decimal128::from_i64(*v)),
            Bson::Double(f) => Decimal128::from_f64(*f),
            _ => None,
        }
    }

    // ----------------------------------------------------------------
    // Canonical ordering

    /// Rank in the BSON cross-type sort order. MinKey sorts below and
    /// MaxKey above every other value; the four numeric cases share a
    /// rank and compare numerically.
    fn canonical_rank(&self) -> u8 {
        match self {
            Bson::MinKey => 0,
            Bson::Undefined => 1,
            Bson::Null => 2,
            Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 3,
            Bson::String(_) | Bson::Symbol(_) => 4,
            Bson::Document(_) => 5,
            Bson::Array(_) => 6,
            Bson::Binary(_) => 7,
            Bson::ObjectId(_) => 8,
            Bson::Boolean(_) => 9,
            Bson::DateTime(_) => 10,
            Bson::Timestamp(_) => 11,
            Bson::RegularExpression(_) => 12,
            Bson::DbPointer(_) => 13,
            Bson::JavaScriptCode(_) => 14,
            Bson::JavaScriptCodeWithScope(_) => 15,
            Bson::MaxKey => 255,
        }
    }

    /// Total ordering following the BSON cross-type comparison rules.
    /// NaN sorts below every other number; `-0` and `0` are equal.
    ///
    /// Deliberately a named method rather than an `Ord` impl: callers
    /// choosing a sort order should say so explicitly.
    pub fn canonical_cmp(&self, other: &Bson) -> Ordering {
        let rank = self.canonical_rank().cmp(&other.canonical_rank());
        if rank != Ordering::Equal {
            return rank;
        }
        match (self, other) {
            (Bson::MinKey, Bson::MinKey)
            | (Bson::MaxKey, Bson::MaxKey)
            | (Bson::Null, Bson::Null)
            | (Bson::Undefined, Bson::Undefined) => Ordering::Equal,
            (Bson::Boolean(a), Bson::Boolean(b)) => a.cmp(b),
            (Bson::DateTime(a), Bson::DateTime(b)) => a.cmp(b),
            (Bson::Timestamp(a), Bson::Timestamp(b)) => a.cmp(b),
            (Bson::ObjectId(a), Bson::ObjectId(b)) => a.cmp(b),
            (Bson::JavaScriptCode(a), Bson::JavaScriptCode(b)) => a.cmp(b),
            (Bson::DbPointer(a), Bson::DbPointer(b)) => {
                (&a.namespace, &a.id).cmp(&(&b.namespace, &b.id))
            }
            (Bson::JavaScriptCodeWithScope(a), Bson::JavaScriptCodeWithScope(b)) => a
                .code
                .cmp(&b.code)
                .then_with(|| cmp_documents(&a.scope, &b.scope)),
            (Bson::RegularExpression(a), Bson::RegularExpression(b)) => {
                (&a.pattern, &a.options).cmp(&(&b.pattern, &b.options))
            }
            (Bson::Binary(a), Bson::Binary(b)) => (a.bytes.len(), a.subtype, &a.bytes)
                .cmp(&(b.bytes.len(), b.subtype, &b.bytes)),
            // String and Symbol share a rank and compare textually.
            (
                Bson::String(a) | Bson::Symbol(a),
                Bson::String(b) | Bson::Symbol(b),
            ) => a.cmp(b),
            (Bson::Document(a), Bson::Document(b)) => cmp_documents(a, b),
            (Bson::Array(a), Bson::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.canonical_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            // Numeric cross-type comparison.
            (Bson::Int32(a), b) => cmp_i64_numeric(*a as i64, b),
            (Bson::Int64(a), b) => cmp_i64_numeric(*a, b),
            (Bson::Double(a), b) => cmp_f64_numeric(*a, b),
            (Bson::Decimal128(a), b) => cmp_dec_numeric(a, b),
            // Ranks matched, so the cases above are exhaustive.
            _ => Ordering::Equal,
        }
    }
}

fn cmp_documents(a: &Document, b: &Document) -> Ordering {
    for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
        let key = ka.cmp(kb);
        if key != Ordering::Equal {
            return key;
        }
        let value = va.canonical_cmp(vb);
        if value != Ordering::Equal {
            return value;
        }
    }
    a.len().cmp(&b.len())
}

fn cmp_i64_numeric(a: i64, b: &Bson) -> Ordering {
    match b {
        Bson::Int32(v) => a.cmp(&(*v as i64)),
        Bson::Int64(v) => a.cmp(v),
        Bson::Double(f) => cmp_i64_f64(a, *f),
        Bson::Decimal128(d) => cmp_dec_i64(d, a).reverse(),
        _ => Ordering::Equal,
    }
}

fn cmp_f64_numeric(a: f64, b: &Bson) -> Ordering {
    match b {
        Bson::Int32(v) => cmp_i64_f64(*v as i64, a).reverse(),
        Bson::Int64(v) => cmp_i64_f64(*v, a).reverse(),
        Bson::Double(f) => cmp_f64_total(a, *f),
        Bson::Decimal128(d) => cmp_dec_f64(d, a).reverse(),
        _ => Ordering::Equal,
    }
}

fn cmp_dec_numeric(a: &Decimal128, b: &Bson) -> Ordering {
    match b {
        Bson::Int32(v) => cmp_dec_i64(a, *v as i64),
        Bson::Int64(v) => cmp_dec_i64(a, *v),
        Bson::Double(f) => cmp_dec_f64(a, *f),
        Bson::Decimal128(d) => match (a.is_nan(), d.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => a.numeric_cmp(d).unwrap_or(Ordering::Equal),
        },
        _ => Ordering::Equal,
    }
}

// ----------------------------------------------------------------
// Scalar numeric comparison helpers

/// `true` iff the double holds exactly the integer `i`.
fn eq_i64_f64(i: i64, f: f64) -> bool {
    f.is_finite()
        && f.fract() == 0.0
        && f >= -I64_BOUND_F64
        && f < I64_BOUND_F64
        && f as i64 == i
}

fn f64_to_i64_exact(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= -I64_BOUND_F64 && f < I64_BOUND_F64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Total order on doubles: NaN below everything, `-0 == 0`.
fn cmp_f64_total(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Compares an integer against a double without going through a lossy
/// common type.
fn cmp_i64_f64(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        return Ordering::Greater;
    }
    if f >= I64_BOUND_F64 {
        return Ordering::Less;
    }
    if f < -I64_BOUND_F64 {
        return Ordering::Greater;
    }
    let trunc = f.trunc() as i64;
    match i.cmp(&trunc) {
        Ordering::Equal => {
            if f.fract() > 0.0 {
                Ordering::Less
            } else if f.fract() < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        unequal => unequal,
    }
}

fn cmp_dec_i64(d: &Decimal128, i: i64) -> Ordering {
    if d.is_nan() {
        return Ordering::Less;
    }
    d.numeric_cmp(&Decimal128::from_i64(i))
        .unwrap_or(Ordering::Equal)
}

fn cmp_dec_f64(d: &Decimal128, f: f64) -> Ordering {
    match (d.is_nan(), f.is_nan()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    if let Some(df) = d.to_f64_exact() {
        return cmp_f64_total(df, f);
    }
    if let Some(fd) = Decimal128::from_f64(f) {
        return d.numeric_cmp(&fd).unwrap_or(Ordering::Equal);
    }
    // Neither side converts exactly; order against the shortest decimal
    // form of the double. Coarser than `==` by at most one ulp.
    let shortest = format!("{f:e}").parse().unwrap_or(Decimal128::ZERO);
    d.numeric_cmp(&shortest).unwrap_or(Ordering::Equal)
}

fn eq_i64_dec(i: i64, d: &Decimal128) -> bool {
    d.to_i64_exact() == Some(i)
}

fn eq_f64_dec(f: f64, d: &Decimal128) -> bool {
    if f.is_nan() {
        return d.is_nan();
    }
    match d.to_f64_exact() {
        Some(df) => df == f,
        None => false,
    }
}

// ----------------------------------------------------------------
// Equality and hashing

impl PartialEq for Bson {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Numeric cases cross-compare by value.
            (Bson::Int32(a), Bson::Int32(b)) => a == b,
            (Bson::Int64(a), Bson::Int64(b)) => a == b,
            (Bson::Int32(a), Bson::Int64(b)) | (Bson::Int64(b), Bson::Int32(a)) => {
                *a as i64 == *b
            }
            (Bson::Int32(a), Bson::Double(f)) | (Bson::Double(f), Bson::Int32(a)) => {
                eq_i64_f64(*a as i64, *f)
            }
            (Bson::Int64(a), Bson::Double(f)) | (Bson::Double(f), Bson::Int64(a)) => {
                eq_i64_f64(*a, *f)
            }
            (Bson::Int32(a), Bson::Decimal128(d)) | (Bson::Decimal128(d), Bson::Int32(a)) => {
                eq_i64_dec(*a as i64, d)
            }
            (Bson::Int64(a), Bson::Decimal128(d)) | (Bson::Decimal128(d), Bson::Int64(a)) => {
                eq_i64_dec(*a, d)
            }
            (Bson::Double(f), Bson::Decimal128(d)) | (Bson::Decimal128(d), Bson::Double(f)) => {
                eq_f64_dec(*f, d)
            }
            // NaN equals NaN so values behave in hashed containers.
            (Bson::Double(a), Bson::Double(b)) => {
                (a.is_nan() && b.is_nan()) || a == b
            }
            (Bson::Decimal128(a), Bson::Decimal128(b)) => {
                (a.is_nan() && b.is_nan())
                    || a.numeric_cmp(b) == Some(Ordering::Equal)
            }
            // Everything else is same-case structural equality.
            (Bson::Null, Bson::Null) => true,
            (Bson::Undefined, Bson::Undefined) => true,
            (Bson::MinKey, Bson::MinKey) => true,
            (Bson::MaxKey, Bson::MaxKey) => true,
            (Bson::Boolean(a), Bson::Boolean(b)) => a == b,
            (Bson::String(a), Bson::String(b)) => a == b,
            (Bson::Symbol(a), Bson::Symbol(b)) => a == b,
            (Bson::JavaScriptCode(a), Bson::JavaScriptCode(b)) => a == b,
            (Bson::JavaScriptCodeWithScope(a), Bson::JavaScriptCodeWithScope(b)) => {
                a.code == b.code && a.scope == b.scope
            }
            (Bson::Document(a), Bson::Document(b)) => a == b,
            (Bson::Array(a), Bson::Array(b)) => a == b,
            (Bson::Binary(a), Bson::Binary(b)) => a == b,
            (Bson::ObjectId(a), Bson::ObjectId(b)) => a == b,
            (Bson::DateTime(a), Bson::DateTime(b)) => a == b,
            (Bson::RegularExpression(a), Bson::RegularExpression(b)) => a == b,
            (Bson::DbPointer(a), Bson::DbPointer(b)) => a == b,
            (Bson::Timestamp(a), Bson::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Bson {}

/// Hash key shared by all numeric cases, so numerically-equal values hash
/// identically regardless of case.
#[derive(Hash)]
enum NumericHashKey {
    Int(i64),
    Bits(u64),
    Decimal {
        negative: bool,
        coefficient: u128,
        exponent: i32,
    },
    NaN,
    PositiveInfinity,
    NegativeInfinity,
}

fn f64_hash_key(f: f64) -> NumericHashKey {
    if f.is_nan() {
        return NumericHashKey::NaN;
    }
    if f == f64::INFINITY {
        return NumericHashKey::PositiveInfinity;
    }
    if f == f64::NEG_INFINITY {
        return NumericHashKey::NegativeInfinity;
    }
    match f64_to_i64_exact(f) {
        Some(i) => NumericHashKey::Int(i),
        None => NumericHashKey::Bits(f.to_bits()),
    }
}

fn decimal_hash_key(d: &Decimal128) -> NumericHashKey {
    use crate::decimal128::DecimalParts;
    if let Some(i) = d.to_i64_exact() {
        return NumericHashKey::Int(i);
    }
    if let Some(f) = d.to_f64_exact() {
        return f64_hash_key(f);
    }
    match d.parts() {
        DecimalParts::NaN => NumericHashKey::NaN,
        DecimalParts::Infinity { negative: false } => NumericHashKey::PositiveInfinity,
        DecimalParts::Infinity { negative: true } => NumericHashKey::NegativeInfinity,
        DecimalParts::Finite {
            negative,
            mut coefficient,
            mut exponent,
        } => {
            // Normalize so 0.100 and 0.1 share a key.
            while coefficient % 10 == 0 && coefficient != 0 {
                coefficient /= 10;
                exponent += 1;
            }
            NumericHashKey::Decimal {
                negative,
                coefficient,
                exponent,
            }
        }
    }
}

impl Hash for Bson {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Bson::Int32(v) => {
                state.write_u8(1);
                NumericHashKey::Int(*v as i64).hash(state);
            }
            Bson::Int64(v) => {
                state.write_u8(1);
                NumericHashKey::Int(*v).hash(state);
            }
            Bson::Double(f) => {
                state.write_u8(1);
                f64_hash_key(*f).hash(state);
            }
            Bson::Decimal128(d) => {
                state.write_u8(1);
                decimal_hash_key(d).hash(state);
            }
            Bson::Null => state.write_u8(2),
            Bson::Undefined => state.write_u8(3),
            Bson::MinKey => state.write_u8(4),
            Bson::MaxKey => state.write_u8(5),
            Bson::Boolean(b) => {
                state.write_u8(6);
                b.hash(state);
            }
            Bson::String(s) => {
                state.write_u8(7);
                s.hash(state);
            }
            Bson::Symbol(s) => {
                state.write_u8(8);
                s.hash(state);
            }
            Bson::JavaScriptCode(s) => {
                state.write_u8(9);
                s.hash(state);
            }
            Bson::JavaScriptCodeWithScope(c) => {
                state.write_u8(10);
                c.code.hash(state);
                c.scope.hash(state);
            }
            Bson::Document(d) => {
                state.write_u8(11);
                d.hash(state);
            }
            Bson::Array(a) => {
                state.write_u8(12);
                a.hash(state);
            }
            Bson::Binary(b) => {
                state.write_u8(13);
                b.hash(state);
            }
            Bson::ObjectId(id) => {
                state.write_u8(14);
                id.hash(state);
            }
            Bson::DateTime(ms) => {
                state.write_u8(15);
                ms.hash(state);
            }
            Bson::RegularExpression(r) => {
                state.write_u8(16);
                r.hash(state);
            }
            Bson::DbPointer(p) => {
                state.write_u8(17);
                p.hash(state);
            }
            Bson::Timestamp(ts) => {
                state.write_u8(18);
                ts.hash(state);
            }
        }
    }
}

// ----------------------------------------------------------------
// Construction from native values

/// An `i32` maps to the 32-bit case. A bare integer literal therefore
/// lands on `Int32`, Rust's default integer literal type; this affects
/// round-trip case identity, so write `5i64` when the 64-bit case is
/// intended.
impl From<i32> for Bson {
    fn from(value: i32) -> Self {
        Bson::Int32(value)
    }
}

impl From<i64> for Bson {
    fn from(value: i64) -> Self {
        Bson::Int64(value)
    }
}

impl From<f64> for Bson {
    fn from(value: f64) -> Self {
        Bson::Double(value)
    }
}

impl From<bool> for Bson {
    fn from(value: bool) -> Self {
        Bson::Boolean(value)
    }
}

impl From<&str> for Bson {
    fn from(value: &str) -> Self {
        Bson::String(value.to_owned())
    }
}

impl From<String> for Bson {
    fn from(value: String) -> Self {
        Bson::String(value)
    }
}

impl From<Vec<Bson>> for Bson {
    fn from(value: Vec<Bson>) -> Self {
        Bson::Array(value)
    }
}

impl From<Document> for Bson {
    fn from(value: Document) -> Self {
        Bson::Document(value)
    }
}

impl From<Binary> for Bson {
    fn from(value: Binary) -> Self {
        Bson::Binary(value)
    }
}

impl From<ObjectId> for Bson {
    fn from(value: ObjectId) -> Self {
        Bson::ObjectId(value)
    }
}

impl From<Regex> for Bson {
    fn from(value: Regex) -> Self {
        Bson::RegularExpression(value)
    }
}

impl From<Timestamp> for Bson {
    fn from(value: Timestamp) -> Self {
        Bson::Timestamp(value)
    }
}

impl From<Decimal128> for Bson {
    fn from(value: Decimal128) -> Self {
        Bson::Decimal128(value)
    }
}

impl From<DbPointer> for Bson {
    fn from(value: DbPointer) -> Self {
        Bson::DbPointer(value)
    }
}

impl From<CodeWithScope> for Bson {
    fn from(value: CodeWithScope) -> Self {
        Bson::JavaScriptCodeWithScope(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &Bson) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn dec(s: &str) -> Bson {
        Bson::Decimal128(s.parse().expect(s))
    }

    #[test]
    fn numeric_cases_cross_compare_by_value() {
        assert_eq!(Bson::Int32(5), Bson::Int64(5));
        assert_eq!(Bson::Int32(5), Bson::Double(5.0));
        assert_eq!(Bson::Int64(5), Bson::Double(5.0));
        assert_eq!(Bson::Int32(5), dec("5"));
        assert_eq!(Bson::Double(0.5), dec("0.5"));
        assert_ne!(Bson::Int32(5), Bson::Double(5.01));
        assert_ne!(Bson::Double(0.1), dec("0.1"));
        assert_ne!(Bson::String("5".into()), Bson::Int32(5));
        assert_ne!(Bson::Boolean(true), Bson::Int32(1));
    }

    #[test]
    fn large_integers_do_not_collapse() {
        let big = (1i64 << 53) + 1;
        assert_ne!(Bson::Int64(big), Bson::Double(big as f64));
        assert_eq!(Bson::Int64(1 << 53), Bson::Double((1i64 << 53) as f64));
        assert_ne!(Bson::Int64(i64::MAX), Bson::Double(I64_BOUND_F64));
    }

    #[test]
    fn equal_numbers_hash_identically() {
        let groups: Vec<Vec<Bson>> = vec![
            vec![Bson::Int32(5), Bson::Int64(5), Bson::Double(5.0), dec("5"), dec("5.00")],
            vec![Bson::Double(0.5), dec("0.5"), dec("0.500")],
            vec![Bson::Double(0.0), Bson::Double(-0.0), Bson::Int32(0)],
            vec![dec("0.1"), dec("0.100")],
        ];
        for group in &groups {
            for pair in group.windows(2) {
                assert_eq!(pair[0], pair[1], "{pair:?}");
                assert_eq!(hash_of(&pair[0]), hash_of(&pair[1]), "{pair:?}");
            }
        }
    }

    #[test]
    fn nan_is_self_equal() {
        assert_eq!(Bson::Double(f64::NAN), Bson::Double(f64::NAN));
        assert_eq!(dec("NaN"), dec("NaN"));
        assert_eq!(Bson::Double(f64::NAN), dec("NaN"));
        assert_ne!(Bson::Double(f64::NAN), Bson::Double(1.0));
    }

    #[test]
    fn sentinels_only_equal_themselves() {
        assert_eq!(Bson::MinKey, Bson::MinKey);
        assert_eq!(Bson::MaxKey, Bson::MaxKey);
        assert_ne!(Bson::MinKey, Bson::MaxKey);
        assert_ne!(Bson::MinKey, Bson::Null);
    }

    #[test]
    fn conversion_exactness() {
        assert_eq!(Bson::Double(5.0).to_i32(), Some(5));
        assert_eq!(Bson::Double(5.01).to_i32(), None);
        assert_eq!(Bson::Int64(5).to_i32(), Some(5));
        assert_eq!(Bson::Int64(i32::MAX as i64 + 1).to_i32(), None);
        assert_eq!(Bson::Int32(-7).to_i64(), Some(-7));
        assert_eq!(Bson::Double(2.5).to_i64(), None);
        assert_eq!(Bson::Int64((1 << 53) + 1).to_f64(), None);
        assert_eq!(Bson::Int32(7).to_f64(), Some(7.0));
        assert_eq!(dec("5").to_i32(), Some(5));
        assert_eq!(dec("5.5").to_int(), None);
        assert_eq!(Bson::Int64(42).to_decimal128().map(|d| d.to_string()), Some("42".into()));
        assert_eq!(Bson::Double(0.1).to_decimal128(), None);
        assert_eq!(Bson::String("5".into()).to_i32(), None);
        assert_eq!(Bson::Null.to_f64(), None);
        assert_eq!(Bson::Boolean(true).to_int(), None);
    }

    #[test]
    fn canonical_order_type_ranks() {
        let ordered = [
            Bson::MinKey,
            Bson::Null,
            Bson::Double(f64::NAN),
            Bson::Int32(-3),
            dec("2.5"),
            Bson::Int64(3),
            Bson::String("a".into()),
            Bson::Binary(Binary::generic(vec![1])),
            Bson::Boolean(false),
            Bson::DateTime(0),
            Bson::Timestamp(Timestamp { time: 0, increment: 1 }),
            Bson::MaxKey,
        ];
        for window in ordered.windows(2) {
            assert_eq!(
                window[0].canonical_cmp(&window[1]),
                Ordering::Less,
                "{window:?}"
            );
        }
    }

    #[test]
    fn canonical_order_numbers() {
        assert_eq!(Bson::Int32(2).canonical_cmp(&Bson::Double(2.5)), Ordering::Less);
        assert_eq!(Bson::Double(2.5).canonical_cmp(&Bson::Int64(2)), Ordering::Greater);
        assert_eq!(Bson::Int64(5).canonical_cmp(&dec("5.00")), Ordering::Equal);
        assert_eq!(dec("-1E+3").canonical_cmp(&Bson::Int32(-999)), Ordering::Less);
        assert_eq!(
            Bson::Double(f64::INFINITY).canonical_cmp(&dec("9E+6144")),
            Ordering::Greater
        );
    }

    #[test]
    fn string_and_symbol_share_a_rank() {
        assert_eq!(
            Bson::String("a".into()).canonical_cmp(&Bson::Symbol("b".into())),
            Ordering::Less
        );
        assert_eq!(
            Bson::Symbol("c".into()).canonical_cmp(&Bson::String("b".into())),
            Ordering::Greater
        );
    }
}
