//! TIME, DATE (timestamps) and DATEONLY.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use tracing::warn;

use super::{invalid_value, LogicalType, TypeKey};
use crate::error::{DialectError, Result};
use crate::escape::{format_date, format_time, Escaper};
use crate::value::Value;

const TIMESTAMP_TZ_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f %#z",
];

const TIMESTAMP_NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses the timestamp spellings databases return. Naive timestamps are
/// read in `offset`.
pub(crate) fn parse_timestamp(raw: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    for format in TIMESTAMP_TZ_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }
    TIMESTAMP_NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(|naive| offset.from_local_datetime(&naive).single())
}

pub(crate) fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// `Some(+1)` for `infinity`, `Some(-1)` for `-infinity`.
fn infinity_sign(value: &Value) -> Option<i8> {
    match value {
        Value::Float(f) if f.is_infinite() => Some(if f.is_sign_positive() { 1 } else { -1 }),
        Value::Text(s) => match s.trim() {
            "infinity" | "Infinity" => Some(1),
            "-infinity" | "-Infinity" => Some(-1),
            _ => None,
        },
        _ => None,
    }
}

fn infinity_value(sign: i8) -> Value {
    Value::Text(String::from(if sign > 0 { "infinity" } else { "-infinity" }))
}

fn check_infinity(value: &Value, dialect: &Escaper<'_>, type_name: &str) -> Result<Option<i8>> {
    let sign = infinity_sign(value);
    if sign.is_some() && !dialect.capabilities().data_types.date_infinity {
        return Err(DialectError::validation(format!(
            "{} does not support infinite {type_name} values",
            dialect.dialect_name()
        )));
    }
    Ok(sign)
}

/// Time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeType {
    /// Fractional second digits.
    pub precision: Option<u32>,
}

impl TimeType {
    /// A `TIME`.
    #[must_use]
    pub const fn new() -> Self {
        Self { precision: None }
    }

    /// Sets the fractional second digits.
    #[must_use]
    pub const fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    fn as_time(value: &Value) -> Option<NaiveTime> {
        match value {
            Value::Time(t) => Some(*t),
            Value::Text(s) => parse_time(s),
            Value::Timestamp(ts) => Some(ts.time()),
            _ => None,
        }
    }
}

impl LogicalType for TimeType {
    fn key(&self) -> TypeKey {
        TypeKey::Time
    }

    fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        match self.precision {
            Some(p) if dialect.capabilities().data_types.time_precision => Ok(format!("TIME({p})")),
            Some(_) => {
                warn!(
                    dialect = dialect.dialect_name(),
                    "TIME precision is not supported and was removed"
                );
                Ok(String::from("TIME"))
            }
            None => Ok(String::from("TIME")),
        }
    }

    fn validate(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<()> {
        Self::as_time(value)
            .map(|_| ())
            .ok_or_else(|| invalid_value(value, "TIME"))
    }

    fn sanitize(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        Ok(Self::as_time(&value).map_or(value, Value::Time))
    }

    fn to_bindable_value(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        Self::as_time(value)
            .map(|t| Value::Text(format_time(t)))
            .ok_or_else(|| invalid_value(value, "TIME"))
    }

    fn parse_database_value(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        Self::as_time(&value)
            .map(Value::Time)
            .ok_or_else(|| DialectError::parse(format!("{value:?} is not a valid TIME")))
    }
}

/// A point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateType {
    /// Fractional second digits.
    pub precision: Option<u32>,
}

impl DateType {
    /// A timestamp.
    #[must_use]
    pub const fn new() -> Self {
        Self { precision: None }
    }

    /// Sets the fractional second digits.
    #[must_use]
    pub const fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Renders `name` with the precision suffix.
    #[must_use]
    pub fn with_precision(&self, name: &str) -> String {
        self.precision
            .map_or_else(|| name.to_string(), |p| format!("{name}({p})"))
    }

    fn as_timestamp(value: &Value, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
        match value {
            Value::Timestamp(ts) => Some(*ts),
            Value::Text(s) => parse_timestamp(s, offset),
            Value::Date(d) => offset
                .from_local_datetime(&d.and_time(NaiveTime::MIN))
                .single(),
            _ => None,
        }
    }

    /// Formats a value for binding, with or without the offset.
    pub(crate) fn bindable(
        value: &Value,
        dialect: &Escaper<'_>,
        with_offset: bool,
    ) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        if let Some(sign) = infinity_sign(value) {
            return Ok(infinity_value(sign));
        }
        let offset = dialect.options().offset()?;
        let ts = Self::as_timestamp(value, offset).ok_or_else(|| invalid_value(value, "DATE"))?;
        Ok(Value::Text(dialect.format_timestamp(&ts, with_offset)?))
    }
}

impl LogicalType for DateType {
    fn key(&self) -> TypeKey {
        TypeKey::Date
    }

    fn to_sql(&self, _dialect: &Escaper<'_>) -> Result<String> {
        Ok(self.with_precision("DATETIME"))
    }

    fn validate(&self, value: &Value, dialect: &Escaper<'_>) -> Result<()> {
        if check_infinity(value, dialect, "DATE")?.is_some() {
            return Ok(());
        }
        Self::as_timestamp(value, dialect.options().offset()?)
            .map(|_| ())
            .ok_or_else(|| invalid_value(value, "DATE"))
    }

    fn sanitize(&self, value: Value, dialect: &Escaper<'_>) -> Result<Value> {
        if infinity_sign(&value).is_some() {
            return Ok(value);
        }
        let offset = dialect.options().offset()?;
        Ok(Self::as_timestamp(&value, offset).map_or(value, Value::Timestamp))
    }

    fn to_bindable_value(&self, value: &Value, dialect: &Escaper<'_>) -> Result<Value> {
        Self::bindable(value, dialect, true)
    }

    fn parse_database_value(&self, value: Value, dialect: &Escaper<'_>) -> Result<Value> {
        if let Some(sign) = infinity_sign(&value) {
            return Ok(Value::Float(if sign > 0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            }));
        }
        Self::as_timestamp(&value, dialect.options().offset()?)
            .map(Value::Timestamp)
            .ok_or_else(|| DialectError::parse(format!("{value:?} is not a valid DATE")))
    }
}

/// A calendar date without time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateOnlyType;

impl DateOnlyType {
    fn as_date(value: &Value) -> Option<NaiveDate> {
        match value {
            Value::Date(d) => Some(*d),
            Value::Text(s) => parse_date(s),
            Value::Timestamp(ts) => Some(ts.date_naive()),
            _ => None,
        }
    }
}

impl LogicalType for DateOnlyType {
    fn key(&self) -> TypeKey {
        TypeKey::DateOnly
    }

    fn to_sql(&self, _dialect: &Escaper<'_>) -> Result<String> {
        Ok(String::from("DATE"))
    }

    fn validate(&self, value: &Value, dialect: &Escaper<'_>) -> Result<()> {
        if check_infinity(value, dialect, "DATEONLY")?.is_some() {
            return Ok(());
        }
        Self::as_date(value)
            .map(|_| ())
            .ok_or_else(|| invalid_value(value, "DATEONLY"))
    }

    fn sanitize(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        if infinity_sign(&value).is_some() {
            return Ok(value);
        }
        Ok(Self::as_date(&value).map_or(value, Value::Date))
    }

    fn to_bindable_value(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        if let Some(sign) = infinity_sign(value) {
            return Ok(infinity_value(sign));
        }
        Self::as_date(value)
            .map(|d| Value::Text(format_date(d)))
            .ok_or_else(|| invalid_value(value, "DATEONLY"))
    }

    fn parse_database_value(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        if let Some(sign) = infinity_sign(&value) {
            return Ok(infinity_value(sign));
        }
        Self::as_date(&value)
            .map(Value::Date)
            .ok_or_else(|| DialectError::parse(format!("{value:?} is not a valid DATEONLY")))
    }
}
