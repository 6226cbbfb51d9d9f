//! JSON numbers that remember how they were written.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A JSON number.
///
/// Non-negative integers are always `PosInt` and negative integers are
/// always `NegInt`, so two integer numbers are equal exactly when their
/// variants and payloads match. Comparisons across representations are
/// mathematical: `Number::PosInt(1) == Number::Float(1.0)`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

impl Number {
    /// Build a number from a signed integer, normalizing non-negative values.
    pub fn from_i64(value: i64) -> Self {
        if value >= 0 {
            Number::PosInt(value as u64)
        } else {
            Number::NegInt(value)
        }
    }

    pub fn from_u64(value: u64) -> Self {
        Number::PosInt(value)
    }

    pub fn from_f64(value: f64) -> Self {
        Number::Float(value)
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::PosInt(n) => n as f64,
            Number::NegInt(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    /// The exact integer value, when the number was written as an integer.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Number::PosInt(n) => Some(i128::from(n)),
            Number::NegInt(n) => Some(i128::from(n)),
            Number::Float(_) => None,
        }
    }

    /// The value as `u64` when it is a non-negative integer, including
    /// integer-valued floats such as `2.0`.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Number::PosInt(n) => Some(n),
            Number::NegInt(_) => None,
            Number::Float(f) => {
                if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
                    Some(f as u64)
                } else {
                    None
                }
            }
        }
    }

    /// Whether the number was written without a fraction or exponent.
    pub fn is_integer(&self) -> bool {
        !matches!(self, Number::Float(_))
    }

    /// Whether the number has no fractional part, however it was written.
    pub fn is_integer_valued(&self) -> bool {
        match *self {
            Number::Float(f) => f.is_finite() && f.fract() == 0.0,
            _ => true,
        }
    }

    pub fn is_positive(&self) -> bool {
        match *self {
            Number::PosInt(n) => n > 0,
            Number::NegInt(_) => false,
            Number::Float(f) => f > 0.0,
        }
    }

    /// Mathematical ordering. Integers compare exactly, anything involving
    /// a float compares as `f64`.
    pub fn compare(&self, other: &Number) -> Option<Ordering> {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::PosInt(n) => write!(f, "{}", n),
            Number::NegInt(n) => write!(f, "{}", n),
            // serde_json's float formatting keeps `1.0` as `1.0`
            Number::Float(v) => match serde_json::Number::from_f64(v) {
                Some(n) => write!(f, "{}", n),
                None => f.write_str("null"),
            },
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Number::PosInt(n) => serializer.serialize_u64(n),
            Number::NegInt(n) => serializer.serialize_i64(n),
            Number::Float(f) => serializer.serialize_f64(f),
        }
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(u) = n.as_u64() {
            Number::PosInt(u)
        } else if let Some(i) = n.as_i64() {
            Number::from_i64(i)
        } else {
            Number::Float(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::PosInt(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::from_i64(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}
