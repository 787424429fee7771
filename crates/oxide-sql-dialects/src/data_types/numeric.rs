//! Integer, floating point and decimal types.

use std::fmt::Write as _;

use tracing::warn;

use super::{invalid_value, LogicalType, TypeKey};
use crate::error::{DialectError, Result};
use crate::escape::{is_decimal_literal, non_finite_text, Escaper};
use crate::value::Value;

/// The integer widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerKind {
    /// 8 bits.
    TinyInt,
    /// 16 bits.
    SmallInt,
    /// 24 bits.
    MediumInt,
    /// 32 bits.
    Integer,
    /// 64 bits.
    BigInt,
}

impl IntegerKind {
    /// The generic SQL name.
    #[must_use]
    pub const fn sql_name(self) -> &'static str {
        match self {
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::MediumInt => "MEDIUMINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
        }
    }

    /// The next wider kind, able to hold the unsigned range of `self`.
    #[must_use]
    pub const fn widened(self) -> Self {
        match self {
            Self::TinyInt => Self::SmallInt,
            Self::SmallInt | Self::MediumInt => Self::Integer,
            Self::Integer | Self::BigInt => Self::BigInt,
        }
    }

    const fn bits(self) -> u32 {
        match self {
            Self::TinyInt => 8,
            Self::SmallInt => 16,
            Self::MediumInt => 24,
            Self::Integer => 32,
            Self::BigInt => 64,
        }
    }

    /// Inclusive bounds of the kind.
    #[must_use]
    pub const fn bounds(self, unsigned: bool) -> (i128, i128) {
        let bits = self.bits();
        if unsigned {
            (0, (1_i128 << bits) - 1)
        } else {
            (-(1_i128 << (bits - 1)), (1_i128 << (bits - 1)) - 1)
        }
    }
}

/// TINYINT, SMALLINT, MEDIUMINT, INTEGER or BIGINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerType {
    /// Width.
    pub kind: IntegerKind,
    /// Display width (MySQL).
    pub length: Option<u32>,
    /// Unsigned.
    pub unsigned: bool,
    /// Zero-filled display (MySQL).
    pub zerofill: bool,
}

impl IntegerType {
    /// An integer of the given width.
    #[must_use]
    pub const fn new(kind: IntegerKind) -> Self {
        Self {
            kind,
            length: None,
            unsigned: false,
            zerofill: false,
        }
    }

    /// `TINYINT`.
    #[must_use]
    pub const fn tinyint() -> Self {
        Self::new(IntegerKind::TinyInt)
    }

    /// `SMALLINT`.
    #[must_use]
    pub const fn smallint() -> Self {
        Self::new(IntegerKind::SmallInt)
    }

    /// `MEDIUMINT`.
    #[must_use]
    pub const fn mediumint() -> Self {
        Self::new(IntegerKind::MediumInt)
    }

    /// `INTEGER`.
    #[must_use]
    pub const fn integer() -> Self {
        Self::new(IntegerKind::Integer)
    }

    /// `BIGINT`.
    #[must_use]
    pub const fn bigint() -> Self {
        Self::new(IntegerKind::BigInt)
    }

    /// Sets the display width.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Makes the type unsigned.
    #[must_use]
    pub const fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Makes the type zero-filled.
    #[must_use]
    pub const fn zerofill(mut self) -> Self {
        self.zerofill = true;
        self
    }

    /// Renders the type, naming each width through `rename`.
    ///
    /// Dialects without unsigned integers get the next wider kind.
    pub(crate) fn render(
        &self,
        dialect: &Escaper<'_>,
        rename: fn(IntegerKind) -> &'static str,
    ) -> Result<String> {
        let support = dialect.capabilities().data_types;
        let kind = if self.unsigned && !support.unsigned {
            if self.kind == IntegerKind::BigInt {
                warn!(
                    dialect = dialect.dialect_name(),
                    "unsigned BIGINT is not supported, values above the signed range will be rejected"
                );
            }
            self.kind.widened()
        } else {
            self.kind
        };

        let mut sql = String::from(rename(kind));
        if let Some(length) = self.length {
            if support.integer_display_width {
                let _ = write!(sql, "({length})");
            } else {
                warn!(
                    dialect = dialect.dialect_name(),
                    length, "integer display width is not supported and was removed"
                );
            }
        }
        if self.unsigned && support.unsigned {
            sql.push_str(" UNSIGNED");
        }
        if self.zerofill {
            if !support.zerofill {
                return Err(DialectError::unsupported(
                    dialect.dialect_name(),
                    format!("{} ZEROFILL", self.kind.sql_name()),
                ));
            }
            sql.push_str(" ZEROFILL");
        }
        Ok(sql)
    }

    fn check_bounds(&self, n: i128, value: &Value) -> Result<()> {
        let (min, max) = self.kind.bounds(self.unsigned);
        if (min..=max).contains(&n) {
            Ok(())
        } else {
            Err(invalid_value(value, self.kind.sql_name()))
        }
    }

    fn integral(value: &Value) -> Option<i128> {
        match value {
            Value::Int(n) => Some(i128::from(*n)),
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e38 => {
                #[allow(clippy::cast_possible_truncation)]
                Some(*f as i128)
            }
            Value::Decimal(s) | Value::Text(s) => parse_integer_text(s),
            _ => None,
        }
    }

    fn normalize(&self, value: &Value) -> Result<Value> {
        let n = Self::integral(value).ok_or_else(|| invalid_value(value, self.kind.sql_name()))?;
        Ok(i64::try_from(n).map_or_else(|_| Value::Decimal(n.to_string()), Value::Int))
    }
}

pub(crate) fn parse_integer_text(s: &str) -> Option<i128> {
    let s = s.trim();
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl LogicalType for IntegerType {
    fn key(&self) -> TypeKey {
        TypeKey::Integer
    }

    fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        self.render(dialect, IntegerKind::sql_name)
    }

    fn validate(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<()> {
        let n = Self::integral(value).ok_or_else(|| invalid_value(value, self.kind.sql_name()))?;
        self.check_bounds(n, value)
    }

    fn sanitize(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        match &value {
            Value::Text(_) | Value::Float(_) => self.normalize(&value).or(Ok(value)),
            _ => Ok(value),
        }
    }

    fn to_bindable_value(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        self.normalize(value)
    }

    fn parse_database_value(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        if matches!(value, Value::Bool(_)) {
            return Ok(value);
        }
        let n = Self::integral(&value).ok_or_else(|| {
            DialectError::parse(format!("{value:?} is not a valid {}", self.kind.sql_name()))
        })?;
        Ok(i64::try_from(n).map_or_else(|_| Value::Decimal(n.to_string()), Value::Int))
    }
}

/// The floating point widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    /// Single precision in most dialects.
    Float,
    /// Single precision.
    Real,
    /// Double precision.
    Double,
}

impl FloatKind {
    /// The generic SQL name.
    #[must_use]
    pub const fn sql_name(self) -> &'static str {
        match self {
            Self::Float => "FLOAT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE PRECISION",
        }
    }
}

/// FLOAT, REAL or DOUBLE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatType {
    /// Width.
    pub kind: FloatKind,
    /// Total digits (MySQL).
    pub precision: Option<u32>,
    /// Digits after the point (MySQL).
    pub scale: Option<u32>,
    /// Unsigned (MySQL).
    pub unsigned: bool,
    /// Zero-filled display (MySQL).
    pub zerofill: bool,
}

impl FloatType {
    /// A float of the given width.
    #[must_use]
    pub const fn new(kind: FloatKind) -> Self {
        Self {
            kind,
            precision: None,
            scale: None,
            unsigned: false,
            zerofill: false,
        }
    }

    /// `FLOAT`.
    #[must_use]
    pub const fn float() -> Self {
        Self::new(FloatKind::Float)
    }

    /// `REAL`.
    #[must_use]
    pub const fn real() -> Self {
        Self::new(FloatKind::Real)
    }

    /// `DOUBLE PRECISION`.
    #[must_use]
    pub const fn double() -> Self {
        Self::new(FloatKind::Double)
    }

    /// Sets precision and scale.
    #[must_use]
    pub const fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Makes the type unsigned.
    #[must_use]
    pub const fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Makes the type zero-filled.
    #[must_use]
    pub const fn zerofill(mut self) -> Self {
        self.zerofill = true;
        self
    }

    pub(crate) fn render(
        &self,
        dialect: &Escaper<'_>,
        rename: fn(FloatKind) -> &'static str,
    ) -> Result<String> {
        let support = dialect.capabilities().data_types;
        let mut sql = String::from(rename(self.kind));
        if let Some(precision) = self.precision {
            if support.integer_display_width {
                let _ = match self.scale {
                    Some(scale) => write!(sql, "({precision},{scale})"),
                    None => write!(sql, "({precision})"),
                };
            } else {
                warn!(
                    dialect = dialect.dialect_name(),
                    "floating point precision is not supported and was removed"
                );
            }
        }
        if self.unsigned {
            if support.unsigned {
                sql.push_str(" UNSIGNED");
            } else {
                warn!(
                    dialect = dialect.dialect_name(),
                    "unsigned floating point types are not supported, UNSIGNED was removed"
                );
            }
        }
        if self.zerofill {
            if !support.zerofill {
                return Err(DialectError::unsupported(
                    dialect.dialect_name(),
                    format!("{} ZEROFILL", self.kind.sql_name()),
                ));
            }
            sql.push_str(" ZEROFILL");
        }
        Ok(sql)
    }

    fn as_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(n) => Some(*n as f64),
            Value::Decimal(s) | Value::Text(s) => parse_float_text(s),
            _ => None,
        }
    }
}

pub(crate) fn parse_float_text(s: &str) -> Option<f64> {
    match s.trim() {
        "NaN" => Some(f64::NAN),
        "Infinity" | "infinity" => Some(f64::INFINITY),
        "-Infinity" | "-infinity" => Some(f64::NEG_INFINITY),
        other if is_decimal_literal(other) => other.parse().ok(),
        _ => None,
    }
}

impl LogicalType for FloatType {
    fn key(&self) -> TypeKey {
        TypeKey::Float
    }

    fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        self.render(dialect, FloatKind::sql_name)
    }

    fn validate(&self, value: &Value, dialect: &Escaper<'_>) -> Result<()> {
        let f = Self::as_f64(value).ok_or_else(|| invalid_value(value, self.kind.sql_name()))?;
        if !f.is_finite() && !dialect.capabilities().data_types.float_non_finite {
            return Err(DialectError::validation(format!(
                "{} does not support {f} in {}",
                dialect.dialect_name(),
                self.kind.sql_name()
            )));
        }
        if self.unsigned && f < 0.0 {
            return Err(invalid_value(value, self.kind.sql_name()));
        }
        Ok(())
    }

    fn sanitize(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        match &value {
            Value::Text(s) => Ok(parse_float_text(s).map_or(value, Value::Float)),
            _ => Ok(value),
        }
    }

    fn to_bindable_value(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let f = Self::as_f64(value).ok_or_else(|| invalid_value(value, self.kind.sql_name()))?;
        if f.is_finite() {
            Ok(Value::Float(f))
        } else {
            Ok(Value::Text(String::from(non_finite_text(f))))
        }
    }

    fn parse_database_value(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        Self::as_f64(&value)
            .map(Value::Float)
            .ok_or_else(|| DialectError::parse(format!("{value:?} is not a valid number")))
    }
}

/// Exact numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecimalType {
    /// Total digits.
    pub precision: Option<u32>,
    /// Digits after the point.
    pub scale: Option<u32>,
    /// Unsigned (MySQL).
    pub unsigned: bool,
    /// Zero-filled display (MySQL).
    pub zerofill: bool,
}

impl DecimalType {
    /// An unconstrained `DECIMAL`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            precision: None,
            scale: None,
            unsigned: false,
            zerofill: false,
        }
    }

    /// Sets the precision.
    #[must_use]
    pub const fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Sets the scale.
    #[must_use]
    pub const fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Makes the type unsigned.
    #[must_use]
    pub const fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Makes the type zero-filled.
    #[must_use]
    pub const fn zerofill(mut self) -> Self {
        self.zerofill = true;
        self
    }

    fn as_text(value: &Value) -> Option<String> {
        match value {
            Value::Int(n) => Some(n.to_string()),
            Value::Float(f) if f.is_finite() => Some(f.to_string()),
            Value::Float(f) if f.is_nan() => Some(String::from("NaN")),
            Value::Decimal(s) | Value::Text(s) if is_decimal_literal(s.trim()) => {
                Some(s.trim().to_string())
            }
            Value::Decimal(s) | Value::Text(s) if s.trim() == "NaN" => Some(String::from("NaN")),
            _ => None,
        }
    }
}

impl LogicalType for DecimalType {
    fn key(&self) -> TypeKey {
        TypeKey::Decimal
    }

    fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        let support = dialect.capabilities().data_types;
        let mut sql = String::from("DECIMAL");
        match (self.precision, self.scale) {
            (Some(p), Some(s)) => {
                let _ = write!(sql, "({p},{s})");
            }
            (Some(p), None) => {
                let _ = write!(sql, "({p})");
            }
            (None, Some(_)) => {
                return Err(DialectError::invalid(
                    "DECIMAL scale requires a precision",
                ));
            }
            (None, None) if !support.decimal_unconstrained => {
                return Err(DialectError::unsupported(
                    dialect.dialect_name(),
                    "DECIMAL without precision",
                ));
            }
            (None, None) => {}
        }
        if self.unsigned && support.unsigned {
            sql.push_str(" UNSIGNED");
        }
        if self.zerofill {
            if !support.zerofill {
                return Err(DialectError::unsupported(
                    dialect.dialect_name(),
                    "DECIMAL ZEROFILL",
                ));
            }
            sql.push_str(" ZEROFILL");
        }
        Ok(sql)
    }

    fn validate(&self, value: &Value, dialect: &Escaper<'_>) -> Result<()> {
        let text = Self::as_text(value).ok_or_else(|| invalid_value(value, "DECIMAL"))?;
        if text == "NaN" && !dialect.capabilities().data_types.float_non_finite {
            return Err(invalid_value(value, "DECIMAL"));
        }
        if self.unsigned && text.starts_with('-') {
            return Err(invalid_value(value, "DECIMAL"));
        }
        Ok(())
    }

    fn sanitize(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        match &value {
            Value::Text(s) if is_decimal_literal(s.trim()) => {
                Ok(Value::Decimal(s.trim().to_string()))
            }
            _ => Ok(value),
        }
    }

    fn to_bindable_value(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<Value> {
        match Self::as_text(value) {
            _ if value.is_null() => Ok(Value::Null),
            Some(text) if text == "NaN" => Ok(Value::Text(text)),
            Some(text) => Ok(Value::Decimal(text)),
            None => Err(invalid_value(value, "DECIMAL")),
        }
    }

    fn parse_database_value(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        Self::as_text(&value)
            .map(Value::Decimal)
            .ok_or_else(|| DialectError::parse(format!("{value:?} is not a valid DECIMAL")))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::dialect;
    use super::super::DataType;
    use super::*;
    use crate::capabilities::DialectKind;
    use crate::error::ErrorKind;

    #[test]
    fn test_integer_mysql_rendering() {
        let mysql = dialect(DialectKind::MySql);
        let ty = DataType::from(IntegerType::integer().length(11).unsigned().zerofill());
        assert_eq!(ty.to_sql(&mysql).unwrap(), "INTEGER(11) UNSIGNED ZEROFILL");
    }

    #[test]
    fn test_integer_postgres_rendering() {
        let pg = dialect(DialectKind::Postgres);
        assert_eq!(
            DataType::from(IntegerType::tinyint()).to_sql(&pg).unwrap(),
            "SMALLINT"
        );
        assert_eq!(
            DataType::from(IntegerType::smallint().unsigned())
                .to_sql(&pg)
                .unwrap(),
            "INTEGER"
        );
        assert_eq!(
            DataType::from(IntegerType::mediumint()).to_sql(&pg).unwrap(),
            "INTEGER"
        );
        assert_eq!(
            DataType::from(IntegerType::integer().unsigned())
                .to_sql(&pg)
                .unwrap(),
            "BIGINT"
        );
        assert_eq!(
            DataType::from(IntegerType::integer().length(11))
                .to_sql(&pg)
                .unwrap(),
            "INTEGER"
        );
        assert_eq!(
            DataType::from(IntegerType::integer().zerofill())
                .to_sql(&pg)
                .unwrap_err()
                .kind(),
            ErrorKind::UnsupportedFeature
        );
    }

    #[test]
    fn test_mssql_tinyint_is_unsigned() {
        let mssql = dialect(DialectKind::MsSql);
        assert_eq!(
            DataType::from(IntegerType::tinyint().unsigned())
                .to_sql(&mssql)
                .unwrap(),
            "TINYINT"
        );
        assert_eq!(
            DataType::from(IntegerType::tinyint()).to_sql(&mssql).unwrap(),
            "SMALLINT"
        );
    }

    #[test]
    fn test_integer_validation_bounds() {
        let mysql = dialect(DialectKind::MySql);
        let tiny = DataType::from(IntegerType::tinyint());
        assert!(tiny.validate(&Value::Int(127), &mysql).is_ok());
        assert!(tiny.validate(&Value::Int(128), &mysql).is_err());
        let utiny = DataType::from(IntegerType::tinyint().unsigned());
        assert!(utiny.validate(&Value::Int(255), &mysql).is_ok());
        assert!(utiny.validate(&Value::Int(-1), &mysql).is_err());
        let int = DataType::integer();
        assert!(int.validate(&Value::Text(String::from("12")), &mysql).is_ok());
        assert!(int.validate(&Value::Float(1.5), &mysql).is_err());
        assert!(int.validate(&Value::Text(String::from("1e3")), &mysql).is_err());
    }

    #[test]
    fn test_bigint_keeps_large_values_as_text() {
        let pg = dialect(DialectKind::Postgres);
        let ty = DataType::from(IntegerType::bigint().unsigned());
        let parsed = ty
            .parse_database_value(Value::Text(String::from("18446744073709551615")), &pg)
            .unwrap();
        assert_eq!(parsed, Value::Decimal(String::from("18446744073709551615")));
        let parsed = ty
            .parse_database_value(Value::Text(String::from("42")), &pg)
            .unwrap();
        assert_eq!(parsed, Value::Int(42));
    }

    #[test]
    fn test_float_non_finite() {
        let pg = dialect(DialectKind::Postgres);
        let mysql = dialect(DialectKind::MySql);
        let ty = DataType::float();
        assert_eq!(
            ty.to_bindable_value(&Value::Float(f64::NAN), &pg).unwrap(),
            Value::Text(String::from("NaN"))
        );
        assert_eq!(
            ty.to_bindable_value(&Value::Float(f64::NEG_INFINITY), &pg)
                .unwrap(),
            Value::Text(String::from("-Infinity"))
        );
        assert_eq!(ty.escape(&Value::Float(f64::INFINITY), &pg).unwrap(), "'Infinity'");
        assert!(ty.escape(&Value::Float(f64::INFINITY), &mysql).is_err());
        assert!(matches!(
            ty.parse_database_value(Value::Text(String::from("NaN")), &pg)
                .unwrap(),
            Value::Float(f) if f.is_nan()
        ));
    }

    #[test]
    fn test_float_names() {
        assert_eq!(
            DataType::float()
                .to_sql(&dialect(DialectKind::Postgres))
                .unwrap(),
            "REAL"
        );
        assert_eq!(
            DataType::double()
                .to_sql(&dialect(DialectKind::MsSql))
                .unwrap(),
            "FLOAT"
        );
        assert_eq!(
            DataType::from(FloatType::float().precision(10, 2))
                .to_sql(&dialect(DialectKind::MySql))
                .unwrap(),
            "FLOAT(10,2)"
        );
    }

    #[test]
    fn test_decimal() {
        let mysql = dialect(DialectKind::MySql);
        let pg = dialect(DialectKind::Postgres);
        assert_eq!(DataType::decimal(10, 2).to_sql(&mysql).unwrap(), "DECIMAL(10,2)");
        assert_eq!(
            DataType::from(DecimalType::new()).to_sql(&pg).unwrap(),
            "DECIMAL"
        );
        assert_eq!(
            DataType::from(DecimalType::new())
                .to_sql(&mysql)
                .unwrap_err()
                .kind(),
            ErrorKind::UnsupportedFeature
        );
        let ty = DataType::decimal(10, 2);
        assert_eq!(
            ty.escape(&Value::Text(String::from("12.50")), &mysql).unwrap(),
            "12.50"
        );
        assert!(ty
            .escape(&Value::Text(String::from("1; DROP TABLE x")), &mysql)
            .is_err());
        assert_eq!(
            ty.parse_database_value(Value::Text(String::from("3.10")), &mysql)
                .unwrap(),
            Value::Decimal(String::from("3.10"))
        );
    }
}
