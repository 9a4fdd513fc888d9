//! IEEE 754-2008 decimal128 in the BID encoding used by the BSON wire format.
//!
//! The raw 16 bytes are stored verbatim so both codecs round-trip
//! byte-identically, including non-canonical significands (which read as
//! zero per the IEEE decoding rule but are never rewritten).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest canonical coefficient: 10^34 - 1.
const MAX_COEFFICIENT: u128 = 9_999_999_999_999_999_999_999_999_999_999_999;
/// Exponent field bias.
const EXPONENT_BIAS: i32 = 6176;
/// Smallest representable exponent.
const EXPONENT_MIN: i32 = -6176;
/// Largest representable exponent.
const EXPONENT_MAX: i32 = 6111;

/// A 128-bit decimal floating point value.
///
/// Stored as the 16 little-endian bytes of the BID encoding, exactly as
/// they appear in a BSON element of type `0x13`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal128 {
    bytes: [u8; 16],
}

/// Error parsing a decimal string (the `$numberDecimal` grammar).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseDecimalError {
    #[error("invalid decimal syntax")]
    InvalidSyntax,
    #[error("more than 34 significant digits")]
    Inexact,
    #[error("exponent out of range")]
    ExponentOutOfRange,
}

/// Decoded view of a decimal128 value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecimalParts {
    NaN,
    Infinity { negative: bool },
    Finite {
        negative: bool,
        coefficient: u128,
        exponent: i32,
    },
}

impl Decimal128 {
    pub const ZERO: Decimal128 = Decimal128 {
        // +0E0: exponent field 6176 placed at bit 113.
        bytes: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x40, 0x30,
        ],
    };

    /// Builds a value from its raw little-endian BID bytes.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self { bytes }
    }

    /// The raw little-endian BID bytes, exactly as stored.
    pub const fn bytes(&self) -> [u8; 16] {
        self.bytes
    }

    pub fn is_nan(&self) -> bool {
        matches!(self.parts(), DecimalParts::NaN)
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self.parts(), DecimalParts::Infinity { .. })
    }

    pub fn is_finite(&self) -> bool {
        matches!(self.parts(), DecimalParts::Finite { .. })
    }

    pub fn is_negative(&self) -> bool {
        u128::from_le_bytes(self.bytes) >> 127 == 1
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.parts(), DecimalParts::Finite { coefficient: 0, .. })
    }

    /// `false` when the significand field exceeds 10^34 - 1. Such bytes read
    /// as zero but are carried verbatim through both codecs, so byte-level
    /// round-trip identity still holds; this flag is how callers detect the
    /// case.
    pub fn is_canonical(&self) -> bool {
        let bits = u128::from_le_bytes(self.bytes);
        let combination = ((bits >> 122) & 0b1_1111) as u8;
        if combination >= 0b1_1110 {
            // NaN and Infinity have no coefficient to be non-canonical.
            return true;
        }
        if (bits >> 125) & 0b11 == 0b11 {
            // Implicit `100` prefix form: coefficient >= 2^113 > 10^34 - 1.
            return false;
        }
        (bits & ((1u128 << 113) - 1)) <= MAX_COEFFICIENT
    }

    pub(crate) fn parts(&self) -> DecimalParts {
        let bits = u128::from_le_bytes(self.bytes);
        let negative = bits >> 127 == 1;
        let combination = ((bits >> 122) & 0b1_1111) as u8;
        if combination == 0b1_1111 {
            return DecimalParts::NaN;
        }
        if combination == 0b1_1110 {
            return DecimalParts::Infinity { negative };
        }
        let (exponent_field, coefficient) = if (bits >> 125) & 0b11 == 0b11 {
            // High coefficient form with implicit `100` prefix; always
            // non-canonical for decimal128, so the coefficient reads as zero.
            (((bits >> 111) & 0x3fff) as i32, 0)
        } else {
            let coeff = bits & ((1u128 << 113) - 1);
            (
                ((bits >> 113) & 0x3fff) as i32,
                if coeff > MAX_COEFFICIENT { 0 } else { coeff },
            )
        };
        DecimalParts::Finite {
            negative,
            coefficient,
            exponent: exponent_field - EXPONENT_BIAS,
        }
    }

    pub(crate) fn from_parts(negative: bool, coefficient: u128, exponent: i32) -> Self {
        debug_assert!(coefficient <= MAX_COEFFICIENT);
        debug_assert!((EXPONENT_MIN..=EXPONENT_MAX).contains(&exponent));
        let mut bits = coefficient;
        bits |= ((exponent + EXPONENT_BIAS) as u128) << 113;
        if negative {
            bits |= 1u128 << 127;
        }
        Self {
            bytes: bits.to_le_bytes(),
        }
    }

    pub const NAN: Decimal128 = Decimal128 {
        // Combination field 11111.
        bytes: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x7c,
        ],
    };

    pub const INFINITY: Decimal128 = Decimal128 {
        bytes: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x78,
        ],
    };

    pub const NEG_INFINITY: Decimal128 = Decimal128 {
        bytes: [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0xf8,
        ],
    };

    // ----------------------------------------------------------------
    // Exact conversions

    pub fn from_i32(value: i32) -> Self {
        Self::from_i64(value as i64)
    }

    pub fn from_i64(value: i64) -> Self {
        let negative = value < 0;
        let coefficient = value.unsigned_abs() as u128;
        Self::from_parts(negative, coefficient, 0)
    }

    /// Exact conversion from a double. Succeeds only when the binary value
    /// has an exact decimal representation within 34 significant digits.
    pub fn from_f64(value: f64) -> Option<Self> {
        if value.is_nan() || value.is_infinite() {
            return None;
        }
        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let raw_exponent = ((bits >> 52) & 0x7ff) as i32;
        let raw_mantissa = bits & ((1u64 << 52) - 1);
        let (mut mantissa, mut exp2) = if raw_exponent == 0 {
            // Subnormal (or zero).
            (raw_mantissa, -1074)
        } else {
            (raw_mantissa | (1u64 << 52), raw_exponent - 1075)
        };
        if mantissa == 0 {
            return Some(Self::from_parts(negative, 0, 0));
        }
        while mantissa % 2 == 0 && exp2 < 0 {
            mantissa /= 2;
            exp2 += 1;
        }
        let mut coefficient = mantissa as u128;
        let mut exp10 = 0i32;
        if exp2 >= 0 {
            // value = mantissa * 2^exp2, an integer.
            for _ in 0..exp2 {
                coefficient = coefficient.checked_mul(2)?;
            }
        } else {
            // value = mantissa / 2^k = mantissa * 5^k * 10^-k.
            for _ in 0..(-exp2) {
                coefficient = coefficient.checked_mul(5)?;
            }
            exp10 = exp2;
        }
        while coefficient > MAX_COEFFICIENT && coefficient % 10 == 0 {
            coefficient /= 10;
            exp10 += 1;
        }
        if coefficient > MAX_COEFFICIENT || !(EXPONENT_MIN..=EXPONENT_MAX).contains(&exp10) {
            return None;
        }
        Some(Self::from_parts(negative, coefficient, exp10))
    }

    /// Exact conversion to `i64`; `None` for NaN, infinities, fractional
    /// values, and values outside the `i64` range.
    pub fn to_i64_exact(&self) -> Option<i64> {
        let DecimalParts::Finite {
            negative,
            mut coefficient,
            mut exponent,
        } = self.parts()
        else {
            return None;
        };
        if coefficient == 0 {
            return Some(0);
        }
        while exponent > 0 {
            coefficient = coefficient.checked_mul(10)?;
            if coefficient > i64::MAX as u128 + 1 {
                return None;
            }
            exponent -= 1;
        }
        while exponent < 0 {
            if coefficient % 10 != 0 {
                return None;
            }
            coefficient /= 10;
            exponent += 1;
        }
        if negative {
            if coefficient > i64::MAX as u128 + 1 {
                return None;
            }
            Some((coefficient as i128).checked_neg()? as i64)
        } else {
            if coefficient > i64::MAX as u128 {
                return None;
            }
            Some(coefficient as i64)
        }
    }

    /// Exact conversion to `i32`.
    pub fn to_i32_exact(&self) -> Option<i32> {
        let wide = self.to_i64_exact()?;
        i32::try_from(wide).ok()
    }

    /// Exact conversion to a double. Succeeds only when the nearest double
    /// converts back to the same decimal value.
    pub fn to_f64_exact(&self) -> Option<f64> {
        match self.parts() {
            DecimalParts::NaN => None,
            DecimalParts::Infinity { negative } => Some(if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }),
            DecimalParts::Finite { negative, coefficient, .. } => {
                if coefficient == 0 {
                    return Some(if negative { -0.0 } else { 0.0 });
                }
                let approx = self.to_f64_lossy();
                let back = Decimal128::from_f64(approx)?;
                if self.numeric_cmp(&back) == Some(std::cmp::Ordering::Equal) {
                    Some(approx)
                } else {
                    None
                }
            }
        }
    }

    /// Nearest-double approximation, with no exactness guarantee.
    pub fn to_f64_lossy(&self) -> f64 {
        match self.parts() {
            DecimalParts::NaN => f64::NAN,
            DecimalParts::Infinity { negative: true } => f64::NEG_INFINITY,
            DecimalParts::Infinity { negative: false } => f64::INFINITY,
            DecimalParts::Finite { .. } => self.to_string().parse().unwrap_or(f64::NAN),
        }
    }

    /// Numeric comparison between two decimals. `None` when either side is
    /// NaN; `-0` and `+0` compare equal, as do equal values with different
    /// exponents (`1E+2` and `100E+0`).
    pub fn numeric_cmp(&self, other: &Decimal128) -> Option<std::cmp::Ordering> {
        use std::cmp::Ordering;
        let a = self.parts();
        let b = other.parts();
        match (a, b) {
            (DecimalParts::NaN, _) | (_, DecimalParts::NaN) => None,
            (
                DecimalParts::Infinity { negative: n1 },
                DecimalParts::Infinity { negative: n2 },
            ) => Some(n2.cmp(&n1)),
            (DecimalParts::Infinity { negative }, _) => {
                Some(if negative { Ordering::Less } else { Ordering::Greater })
            }
            (_, DecimalParts::Infinity { negative }) => {
                Some(if negative { Ordering::Greater } else { Ordering::Less })
            }
            (
                DecimalParts::Finite {
                    negative: n1,
                    coefficient: c1,
                    exponent: e1,
                },
                DecimalParts::Finite {
                    negative: n2,
                    coefficient: c2,
                    exponent: e2,
                },
            ) => {
                if c1 == 0 && c2 == 0 {
                    return Some(Ordering::Equal);
                }
                if c1 == 0 {
                    return Some(if n2 { Ordering::Greater } else { Ordering::Less });
                }
                if c2 == 0 {
                    return Some(if n1 { Ordering::Less } else { Ordering::Greater });
                }
                if n1 != n2 {
                    return Some(if n1 { Ordering::Less } else { Ordering::Greater });
                }
                let magnitude = cmp_magnitude(c1, e1, c2, e2);
                Some(if n1 { magnitude.reverse() } else { magnitude })
            }
        }
    }
}

/// Compares `c1 * 10^e1` against `c2 * 10^e2` for non-zero coefficients.
fn cmp_magnitude(c1: u128, e1: i32, c2: u128, e2: i32) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    if e1 == e2 {
        return c1.cmp(&c2);
    }
    // Scale the side with the larger exponent down to the common exponent.
    // Overflow means its magnitude certainly exceeds the other side, since
    // canonical coefficients stay below 10^34 and u128 holds ~10^38.
    if e1 > e2 {
        match scale_up(c1, (e1 - e2) as u32) {
            Some(scaled) => scaled.cmp(&c2),
            None => Ordering::Greater,
        }
    } else {
        match scale_up(c2, (e2 - e1) as u32) {
            Some(scaled) => c1.cmp(&scaled),
            None => Ordering::Less,
        }
    }
}

fn scale_up(mut value: u128, mut by: u32) -> Option<u128> {
    while by > 0 {
        value = value.checked_mul(10)?;
        by -= 1;
    }
    Some(value)
}

// ----------------------------------------------------------------
// Text round-trip (the `$numberDecimal` grammar)

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parts() {
            DecimalParts::NaN => f.write_str("NaN"),
            DecimalParts::Infinity { negative: false } => f.write_str("Infinity"),
            DecimalParts::Infinity { negative: true } => f.write_str("-Infinity"),
            DecimalParts::Finite {
                negative,
                coefficient,
                exponent,
            } => {
                if negative {
                    f.write_str("-")?;
                }
                let digits = coefficient.to_string();
                let adjusted = exponent + digits.len() as i32 - 1;
                if exponent > 0 || adjusted < -6 {
                    // Scientific notation.
                    f.write_str(&digits[..1])?;
                    if digits.len() > 1 {
                        write!(f, ".{}", &digits[1..])?;
                    }
                    if adjusted >= 0 {
                        write!(f, "E+{adjusted}")
                    } else {
                        write!(f, "E{adjusted}")
                    }
                } else if exponent == 0 {
                    f.write_str(&digits)
                } else {
                    // Plain notation with a decimal point.
                    let point = digits.len() as i32 + exponent;
                    if point > 0 {
                        let split = point as usize;
                        write!(f, "{}.{}", &digits[..split], &digits[split..])
                    } else {
                        write!(f, "0.{}{}", "0".repeat(-point as usize), digits)
                    }
                }
            }
        }
    }
}

impl FromStr for Decimal128 {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        match rest {
            "NaN" | "nan" => return Ok(Self::NAN),
            "Infinity" | "Inf" | "infinity" | "inf" => {
                return Ok(if negative { Self::NEG_INFINITY } else { Self::INFINITY })
            }
            "" => return Err(ParseDecimalError::InvalidSyntax),
            _ => {}
        }
        let (mantissa, exp_str) = match rest.find(['e', 'E']) {
            Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
            None => (rest, None),
        };
        let explicit_exponent: i32 = match exp_str {
            Some(e) if !e.is_empty() => e
                .parse::<i64>()
                .ok()
                .and_then(|v| i32::try_from(v.clamp(-20_000, 20_000)).ok())
                .ok_or(ParseDecimalError::InvalidSyntax)?,
            Some(_) => return Err(ParseDecimalError::InvalidSyntax),
            None => 0,
        };
        let (int_part, frac_part) = match mantissa.find('.') {
            Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseDecimalError::InvalidSyntax);
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ParseDecimalError::InvalidSyntax);
        }

        let mut exponent = explicit_exponent - frac_part.len() as i32;
        let all_digits: String = [int_part, frac_part].concat();
        let trimmed = all_digits.trim_start_matches('0');
        let mut coefficient: u128 = 0;
        if trimmed.len() > 34 + 6 {
            // Far beyond any zero-stripping salvage.
            return Err(ParseDecimalError::Inexact);
        }
        for b in trimmed.bytes() {
            coefficient = coefficient
                .checked_mul(10)
                .and_then(|c| c.checked_add((b - b'0') as u128))
                .ok_or(ParseDecimalError::Inexact)?;
        }
        while coefficient > MAX_COEFFICIENT {
            if coefficient % 10 != 0 {
                return Err(ParseDecimalError::Inexact);
            }
            coefficient /= 10;
            exponent += 1;
        }
        // Clamp a too-large exponent by padding the coefficient with zeros.
        while exponent > EXPONENT_MAX {
            coefficient = coefficient
                .checked_mul(10)
                .filter(|&c| c <= MAX_COEFFICIENT)
                .ok_or(ParseDecimalError::ExponentOutOfRange)?;
            exponent -= 1;
        }
        // And a too-small exponent by stripping trailing zeros.
        while exponent < EXPONENT_MIN {
            if coefficient % 10 != 0 {
                return Err(ParseDecimalError::ExponentOutOfRange);
            }
            coefficient /= 10;
            exponent += 1;
        }
        if coefficient == 0 {
            exponent = exponent.clamp(EXPONENT_MIN, EXPONENT_MAX);
        }
        Ok(Self::from_parts(negative, coefficient, exponent))
    }
}

impl Default for Decimal128 {
    fn default() -> Self {
        Self::ZERO
    }
}
