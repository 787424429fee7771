//! Application values handed to the escaper and the data types.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

/// A dynamically typed application value.
///
/// Values never reach SQL text directly: they go through the escaper or a
/// bind-parameter collector.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number, possibly non-finite.
    Float(f64),
    /// Arbitrary precision number kept as its decimal text.
    Decimal(String),
    /// Text.
    Text(String),
    /// Byte string.
    Bytes(Vec<u8>),
    /// Timestamp with an offset.
    Timestamp(DateTime<FixedOffset>),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// JSON document.
    Json(serde_json::Value),
    /// Array of values.
    Array(Vec<Value>),
    /// Range: two bounds, or none for the empty range.
    Range(Vec<RangeBound>),
}

/// One side of a range value.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeBound {
    /// A bare value: inclusive when it is the lower bound, exclusive when
    /// it is the upper bound.
    Value(Value),
    /// A value with explicit inclusivity.
    Bound {
        /// The bound. `Null` means unbounded.
        value: Value,
        /// Whether the bound belongs to the range.
        inclusive: bool,
    },
}

impl RangeBound {
    /// Builds an inclusive bound.
    #[must_use]
    pub fn inclusive(value: impl ToValue) -> Self {
        Self::Bound {
            value: value.to_value(),
            inclusive: true,
        }
    }

    /// Builds an exclusive bound.
    #[must_use]
    pub fn exclusive(value: impl ToValue) -> Self {
        Self::Bound {
            value: value.to_value(),
            inclusive: false,
        }
    }

    /// Builds an unbounded side.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::Value(Value::Null)
    }

    /// Returns the bound value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        match self {
            Self::Value(value) | Self::Bound { value, .. } => value,
        }
    }

    /// Returns the inclusivity, applying the default for bare values.
    #[must_use]
    pub const fn is_inclusive(&self, lower: bool) -> bool {
        match self {
            Self::Value(_) => lower,
            Self::Bound { inclusive, .. } => *inclusive,
        }
    }
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Decimal(_) => "decimal",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Timestamp(_) => "timestamp",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::Json(_) => "json",
            Self::Array(_) => "array",
            Self::Range(_) => "range",
        }
    }

    /// Builds a range from two bare bounds.
    #[must_use]
    pub fn range(low: impl ToValue, high: impl ToValue) -> Self {
        Self::Range(vec![
            RangeBound::Value(low.to_value()),
            RangeBound::Value(high.to_value()),
        ])
    }

    /// The empty range.
    #[must_use]
    pub const fn empty_range() -> Self {
        Self::Range(Vec::new())
    }
}

/// Conversion of Rust values into [`Value`].
pub trait ToValue {
    /// Converts the value.
    fn to_value(self) -> Value;
}

impl ToValue for Value {
    fn to_value(self) -> Value {
        self
    }
}

impl ToValue for bool {
    fn to_value(self) -> Value {
        Value::Bool(self)
    }
}

impl ToValue for i64 {
    fn to_value(self) -> Value {
        Value::Int(self)
    }
}

impl ToValue for i32 {
    fn to_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl ToValue for i16 {
    fn to_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl ToValue for u32 {
    fn to_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl ToValue for u64 {
    fn to_value(self) -> Value {
        i64::try_from(self).map_or_else(|_| Value::Decimal(self.to_string()), Value::Int)
    }
}

impl ToValue for f64 {
    fn to_value(self) -> Value {
        Value::Float(self)
    }
}

impl ToValue for f32 {
    fn to_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl ToValue for String {
    fn to_value(self) -> Value {
        Value::Text(self)
    }
}

impl ToValue for &str {
    fn to_value(self) -> Value {
        Value::Text(String::from(self))
    }
}

impl ToValue for Vec<u8> {
    fn to_value(self) -> Value {
        Value::Bytes(self)
    }
}

impl ToValue for &[u8] {
    fn to_value(self) -> Value {
        Value::Bytes(self.to_vec())
    }
}

impl ToValue for DateTime<FixedOffset> {
    fn to_value(self) -> Value {
        Value::Timestamp(self)
    }
}

impl ToValue for NaiveDate {
    fn to_value(self) -> Value {
        Value::Date(self)
    }
}

impl ToValue for NaiveTime {
    fn to_value(self) -> Value {
        Value::Time(self)
    }
}

impl ToValue for serde_json::Value {
    fn to_value(self) -> Value {
        Value::Json(self)
    }
}

impl ToValue for uuid::Uuid {
    fn to_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(self) -> Value {
        self.map_or(Value::Null, ToValue::to_value)
    }
}
