//! Salary bounds: raw upstream shapes and their canonical range.
//!
//! Upstream and stored salary cells arrive as integers, floats, digit strings
//! or nothing at all. [`normalize`] turns a pair of them into a [`SalaryRange`]
//! that is always well-formed, so ranking never has to look at raw data.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Upper bound used when a vacancy only declares "from X".
///
/// Larger than any real salary, so open-ended listings rank above bounded
/// listings with the same lower bound.
pub const SALARY_UNBOUNDED: u64 = u64::MAX;

/// A salary cell exactly as it was received.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawSalary {
    #[default]
    Absent,
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    /// Any other JSON shape (bool, array, object)
    Invalid,
}

impl RawSalary {
    /// Coerce to a non-negative integer, or `None` when the value is unusable.
    ///
    /// Negative numbers, non-digit strings and empty cells are all unusable.
    pub fn coerce(&self) -> Option<u64> {
        match self {
            RawSalary::Unsigned(value) => Some(*value),
            RawSalary::Signed(value) => u64::try_from(*value).ok(),
            RawSalary::Float(value) if value.is_finite() && *value >= 0.0 => {
                Some(value.trunc() as u64)
            }
            RawSalary::Text(text) => {
                if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                    text.parse().ok()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Coerced value, with `0` standing in for anything unusable.
    pub fn coerce_or_zero(&self) -> u64 {
        self.coerce().unwrap_or(0)
    }
}

impl From<&Value> for RawSalary {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => RawSalary::Absent,
            Value::Number(number) => {
                if let Some(v) = number.as_u64() {
                    RawSalary::Unsigned(v)
                } else if let Some(v) = number.as_i64() {
                    RawSalary::Signed(v)
                } else {
                    number
                        .as_f64()
                        .map(RawSalary::Float)
                        .unwrap_or(RawSalary::Invalid)
                }
            }
            Value::String(text) => RawSalary::Text(text.clone()),
            _ => RawSalary::Invalid,
        }
    }
}

impl From<u64> for RawSalary {
    fn from(value: u64) -> Self {
        RawSalary::Unsigned(value)
    }
}

impl From<Option<u64>> for RawSalary {
    fn from(value: Option<u64>) -> Self {
        value.map(RawSalary::Unsigned).unwrap_or_default()
    }
}

impl From<&str> for RawSalary {
    fn from(value: &str) -> Self {
        RawSalary::Text(value.to_string())
    }
}

impl<'de> Deserialize<'de> for RawSalary {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(RawSalary::from(&value))
    }
}

impl Serialize for RawSalary {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RawSalary::Unsigned(value) => serializer.serialize_u64(*value),
            RawSalary::Signed(value) => serializer.serialize_i64(*value),
            RawSalary::Float(value) => serializer.serialize_f64(*value),
            RawSalary::Text(text) => serializer.serialize_str(text),
            RawSalary::Absent | RawSalary::Invalid => serializer.serialize_none(),
        }
    }
}

/// What to do with a vacancy that states a lower bound but no usable upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpperBoundPolicy {
    /// "from X" becomes `(X, SALARY_UNBOUNDED)`
    #[default]
    Unbounded,
    /// "from X" becomes `(X, X)`
    MirrorLower,
}

/// Canonical `(min, max)` salary pair. Orders lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SalaryRange {
    pub min: u64,
    pub max: u64,
}

impl SalaryRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn has_lower(&self) -> bool {
        self.min > 0
    }

    pub fn is_open_ended(&self) -> bool {
        self.max == SALARY_UNBOUNDED
    }

    /// An upper bound the operator would want to see ("до X").
    pub fn has_upper(&self) -> bool {
        self.max > 0 && !self.is_open_ended() && self.max != self.min
    }

    pub fn is_unspecified(&self) -> bool {
        self.min == 0 && self.max == 0
    }
}

impl fmt::Display for SalaryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.has_lower(), self.has_upper()) {
            _ if self.is_unspecified() => write!(f, "не указана"),
            (true, true) => write!(f, "от {} до {}", self.min, self.max),
            (true, false) => write!(f, "от {}", self.min),
            (false, _) if self.is_open_ended() => write!(f, "не указана"),
            (false, _) => write!(f, "до {}", self.max),
        }
    }
}

/// Build a canonical salary range from two raw bounds.
///
/// Never fails. The result satisfies `max >= min` unless both are `0`.
pub fn normalize(min: &RawSalary, max: &RawSalary, policy: UpperBoundPolicy) -> SalaryRange {
    let lower = min.coerce_or_zero();

    // A zero upper bound carries no information, like a zero lower bound
    let upper = match max.coerce().filter(|&upper| upper > 0) {
        Some(upper) => upper.max(lower),
        None if lower > 0 => match policy {
            UpperBoundPolicy::Unbounded => SALARY_UNBOUNDED,
            UpperBoundPolicy::MirrorLower => lower,
        },
        None => 0,
    };

    SalaryRange::new(lower, upper)
}
