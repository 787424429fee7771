//! RANGE types and the range literal format.
//!
//! A range value has two bounds or none. Bare bounds follow the canonical
//! `[low, high)` form; `Null` leaves a side unbounded and infinite floats
//! become `infinity` / `-infinity`. The empty range is `empty`.

use super::{require_support, DataType, IntegerKind, LogicalType, TypeKey};
use crate::error::{DialectError, Result};
use crate::escape::Escaper;
use crate::value::{RangeBound, Value};

/// One bound of a parsed range literal, still as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBound {
    /// The bound text, `None` when unbounded.
    pub text: Option<String>,
    /// Whether the bracket is inclusive.
    pub inclusive: bool,
}

/// A range of a scalar subtype.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeType {
    /// Element type.
    pub subtype: Box<DataType>,
}

impl RangeType {
    /// A range of `subtype`.
    #[must_use]
    pub fn new(subtype: DataType) -> Self {
        Self {
            subtype: Box::new(subtype),
        }
    }

    /// The database range type matching the subtype.
    pub fn range_type_name(&self, dialect: &Escaper<'_>) -> Result<&'static str> {
        match self.subtype.as_ref() {
            DataType::Integer(int) if int.kind == IntegerKind::BigInt => Ok("int8range"),
            DataType::Integer(_) => Ok("int4range"),
            DataType::Decimal(_) => Ok("numrange"),
            DataType::Date(_) => Ok("tstzrange"),
            DataType::DateOnly(_) => Ok("daterange"),
            other => Err(DialectError::unsupported(
                dialect.dialect_name(),
                format!("RANGE of {}", other.key().name()),
            )),
        }
    }

    fn bounds(value: &Value) -> Result<Vec<RangeBound>> {
        match value {
            Value::Range(bounds) => Ok(bounds.clone()),
            Value::Array(items) => Ok(items.iter().cloned().map(RangeBound::Value).collect()),
            Value::Text(text) => Ok(parse_range_literal(text)?
                .into_iter()
                .map(|bound| RangeBound::Bound {
                    value: bound.text.map_or(Value::Null, Value::Text),
                    inclusive: bound.inclusive,
                })
                .collect()),
            other => Err(DialectError::validation(format!(
                "a {} value is not a valid RANGE",
                other.kind_name()
            ))),
        }
    }

    fn parse_bound(&self, raw: RawBound, dialect: &Escaper<'_>) -> Result<RangeBound> {
        let value = match raw.text.as_deref() {
            None => Value::Null,
            Some("infinity") => Value::Float(f64::INFINITY),
            Some("-infinity") => Value::Float(f64::NEG_INFINITY),
            Some(text) => self
                .subtype
                .parse_database_value(Value::Text(text.to_string()), dialect)?,
        };
        Ok(RangeBound::Bound {
            value,
            inclusive: raw.inclusive,
        })
    }
}

fn is_infinite(value: &Value) -> bool {
    matches!(value, Value::Float(f) if f.is_infinite())
}

fn check_len(bounds: &[RangeBound]) -> Result<()> {
    if bounds.is_empty() || bounds.len() == 2 {
        Ok(())
    } else {
        Err(DialectError::validation(format!(
            "a range must have either 0 or 2 bounds, got {}",
            bounds.len()
        )))
    }
}

fn quote_bound(text: &str) -> String {
    let needs_quotes = text.is_empty()
        || text
            .chars()
            .any(|c| matches!(c, '"' | '\\' | ',' | '(' | ')' | '[' | ']') || c.is_whitespace());
    if !needs_quotes {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn bound_text(value: &Value, subtype: &DataType, dialect: &Escaper<'_>) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Float(f) if f.is_infinite() => Ok(String::from(if *f > 0.0 {
            "infinity"
        } else {
            "-infinity"
        })),
        other => match subtype.to_bindable_value(other, dialect)? {
            Value::Int(n) => Ok(n.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Decimal(s) => Ok(s),
            Value::Text(s) => Ok(quote_bound(&s)),
            unexpected => Err(DialectError::Escaping(format!(
                "a {} value cannot be a range bound",
                unexpected.kind_name()
            ))),
        },
    }
}

/// Renders range bounds as a range literal such as `[1,2)` or `empty`.
///
/// Each finite bound goes through the subtype's bindable conversion.
pub fn stringify_range(
    bounds: &[RangeBound],
    subtype: &DataType,
    dialect: &Escaper<'_>,
) -> Result<String> {
    check_len(bounds)?;
    let [low, high] = bounds else {
        return Ok(String::from("empty"));
    };
    let open = if low.is_inclusive(true) { '[' } else { '(' };
    let close = if high.is_inclusive(false) { ']' } else { ')' };
    Ok(format!(
        "{open}{},{}{close}",
        bound_text(low.value(), subtype, dialect)?,
        bound_text(high.value(), subtype, dialect)?
    ))
}

/// Parses a range literal into its raw bounds. `empty` yields no bounds.
pub fn parse_range_literal(raw: &str) -> Result<Vec<RawBound>> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("empty") {
        return Ok(Vec::new());
    }
    let malformed = || DialectError::parse(format!("'{raw}' is not a range literal"));
    let lower_inclusive = match raw.chars().next() {
        Some('[') => true,
        Some('(') => false,
        _ => return Err(malformed()),
    };
    let upper_inclusive = match raw.chars().last() {
        Some(']') => true,
        Some(')') => false,
        _ => return Err(malformed()),
    };
    if raw.len() < 2 {
        return Err(malformed());
    }

    let mut parts: Vec<Option<String>> = Vec::with_capacity(2);
    let mut current = String::new();
    let mut quoted = false;
    let mut was_quoted = false;
    let mut chars = raw[1..raw.len() - 1].chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => {
                quoted = !quoted;
                was_quoted = true;
            }
            '\\' => current.push(chars.next().ok_or_else(malformed)?),
            ',' if !quoted => {
                parts.push(
                    (was_quoted || !current.is_empty()).then(|| std::mem::take(&mut current)),
                );
                was_quoted = false;
            }
            other => current.push(other),
        }
    }
    if quoted {
        return Err(malformed());
    }
    parts.push((was_quoted || !current.is_empty()).then_some(current));

    let [lower, upper]: [Option<String>; 2] = parts.try_into().map_err(|_| malformed())?;
    Ok(vec![
        RawBound {
            text: lower,
            inclusive: lower_inclusive,
        },
        RawBound {
            text: upper,
            inclusive: upper_inclusive,
        },
    ])
}

impl LogicalType for RangeType {
    fn key(&self) -> TypeKey {
        TypeKey::Range
    }

    fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        require_support(dialect.capabilities().data_types.range, dialect, "RANGE")?;
        Ok(self.range_type_name(dialect)?.to_uppercase())
    }

    fn validate(&self, value: &Value, dialect: &Escaper<'_>) -> Result<()> {
        let bounds = Self::bounds(value)?;
        check_len(&bounds)?;
        for bound in &bounds {
            let value = bound.value();
            if value.is_null() || is_infinite(value) {
                continue;
            }
            self.subtype.validate(value, dialect)?;
        }
        Ok(())
    }

    fn sanitize(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        let bounds = Self::bounds(&value)?;
        let explicit = bounds
            .iter()
            .enumerate()
            .map(|(i, bound)| RangeBound::Bound {
                value: bound.value().clone(),
                inclusive: bound.is_inclusive(i == 0),
            })
            .collect();
        Ok(Value::Range(explicit))
    }

    fn to_bindable_value(&self, value: &Value, dialect: &Escaper<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let bounds = Self::bounds(value)?;
        Ok(Value::Text(stringify_range(&bounds, &self.subtype, dialect)?))
    }

    fn escape(&self, value: &Value, dialect: &Escaper<'_>) -> Result<String> {
        if value.is_null() {
            return Ok(String::from("NULL"));
        }
        let bounds = Self::bounds(value)?;
        let literal = stringify_range(&bounds, &self.subtype, dialect)?;
        Ok(format!(
            "{}::{}",
            dialect.escape_string(&literal)?,
            self.range_type_name(dialect)?
        ))
    }

    fn parse_database_value(&self, value: Value, dialect: &Escaper<'_>) -> Result<Value> {
        match value {
            Value::Text(text) => {
                let bounds = parse_range_literal(&text)?
                    .into_iter()
                    .map(|raw| self.parse_bound(raw, dialect))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Range(bounds))
            }
            other => Ok(other),
        }
    }
}
