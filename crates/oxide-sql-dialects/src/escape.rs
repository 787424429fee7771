//! Identifier quoting, literal escaping and bind parameters.
//!
//! Every identifier in generated SQL goes through [`Escaper::quote_identifier`]
//! or [`Escaper::quote_table`], and every value through [`Escaper::escape`] or
//! [`BindParams::bind`]. Nothing else writes user input into SQL text.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use crate::capabilities::{
    BinaryLiteralStyle, BindParamStyle, BooleanLiteralStyle, DialectCapabilities, SchemaStrategy,
    StringLiteralStyle,
};
use crate::config::DialectOptions;
use crate::data_types::DataType;
use crate::error::{DialectError, Result};
use crate::table::TableReference;
use crate::value::Value;

/// Dialect-aware quoting and escaping.
///
/// An escaper is a pair of borrowed references and is cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct Escaper<'a> {
    capabilities: &'static DialectCapabilities,
    options: &'a DialectOptions,
}

impl<'a> Escaper<'a> {
    /// Creates an escaper for a dialect.
    #[must_use]
    pub const fn new(
        capabilities: &'static DialectCapabilities,
        options: &'a DialectOptions,
    ) -> Self {
        Self {
            capabilities,
            options,
        }
    }

    /// Returns the capability table.
    #[must_use]
    pub const fn capabilities(&self) -> &'static DialectCapabilities {
        self.capabilities
    }

    /// Returns the dialect options.
    #[must_use]
    pub const fn options(&self) -> &'a DialectOptions {
        self.options
    }

    /// Returns the dialect name.
    #[must_use]
    pub const fn dialect_name(&self) -> &'static str {
        self.capabilities.name
    }

    /// Returns the effective maximum identifier length.
    #[must_use]
    pub fn max_identifier_length(&self) -> Option<usize> {
        self.options
            .identifier_max_length_override
            .or(self.capabilities.max_identifier_length)
    }

    /// Returns the schema used when a table reference carries none.
    #[must_use]
    pub fn default_schema(&self) -> Option<&'a str> {
        self.options
            .schema
            .as_deref()
            .or(self.capabilities.default_schema)
    }

    /// Quotes an identifier, doubling embedded closing quotes.
    ///
    /// `*` is returned unquoted.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        if name == "*" {
            return String::from("*");
        }
        let quote = self.capabilities.identifier_quote;
        let mut out = String::with_capacity(name.len() + 2);
        out.push(quote.open);
        for c in name.chars() {
            if c == quote.close {
                out.push(c);
            }
            out.push(c);
        }
        out.push(quote.close);
        out
    }

    /// Quotes a dotted path such as `users.id` segment by segment.
    #[must_use]
    pub fn quote_identifiers(&self, path: &str) -> String {
        path.split('.')
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quotes a table reference.
    ///
    /// A schema equal to the dialect default is omitted. Dialects without
    /// schemas fold the schema into the table name using the reference's
    /// delimiter.
    #[must_use]
    pub fn quote_table(&self, table: &TableReference) -> String {
        let schema = table
            .schema
            .as_deref()
            .or(self.options.schema.as_deref())
            .filter(|schema| Some(*schema) != self.capabilities.default_schema);

        match (schema, self.capabilities.schema_strategy) {
            (None, _) => self.quote_identifier(&table.table_name),
            (Some(schema), SchemaStrategy::Qualified) => format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(&table.table_name)
            ),
            (Some(schema), SchemaStrategy::Folded) => self.quote_identifier(&format!(
                "{schema}{}{}",
                table.delimiter(),
                table.table_name
            )),
        }
    }

    /// Escapes a string literal.
    pub fn escape_string(&self, value: &str) -> Result<String> {
        match self.capabilities.string_literals {
            StringLiteralStyle::Standard => Ok(quote_doubled("", value)),
            StringLiteralStyle::NoNul => {
                if value.contains('\0') {
                    return Err(DialectError::Escaping(format!(
                        "{} does not support the NUL character in strings",
                        self.dialect_name()
                    )));
                }
                Ok(quote_doubled("", value))
            }
            StringLiteralStyle::National => Ok(quote_doubled("N", value)),
            StringLiteralStyle::Backslash => Ok(quote_backslash(value)),
        }
    }

    /// Escapes a byte string.
    #[must_use]
    pub fn escape_buffer(&self, bytes: &[u8]) -> String {
        let hex = hex(bytes);
        match self.capabilities.binary_literals {
            BinaryLiteralStyle::HexString => format!("X'{hex}'"),
            BinaryLiteralStyle::Bytea => format!("'\\x{hex}'"),
            BinaryLiteralStyle::HexNumber => format!("0x{hex}"),
        }
    }

    /// Renders a boolean literal.
    #[must_use]
    pub const fn escape_bool(&self, value: bool) -> &'static str {
        match (self.capabilities.boolean_literals, value) {
            (BooleanLiteralStyle::Keywords, true) => "true",
            (BooleanLiteralStyle::Keywords, false) => "false",
            (BooleanLiteralStyle::Integers, true) => "1",
            (BooleanLiteralStyle::Integers, false) => "0",
        }
    }

    /// Renders a floating point literal.
    ///
    /// Non-finite values become `'NaN'`, `'Infinity'` or `'-Infinity'` on
    /// dialects that store them, and fail elsewhere.
    pub fn escape_float(&self, value: f64) -> Result<String> {
        if value.is_finite() {
            return Ok(value.to_string());
        }
        if !self.capabilities.data_types.float_non_finite {
            return Err(DialectError::Escaping(format!(
                "{} cannot represent {value}",
                self.dialect_name()
            )));
        }
        self.escape_string(non_finite_text(value))
    }

    /// Renders a decimal literal, refusing anything that is not a number.
    pub fn escape_decimal(&self, value: &str) -> Result<String> {
        if is_decimal_literal(value) {
            Ok(value.to_string())
        } else {
            Err(DialectError::Escaping(format!(
                "'{value}' is not a decimal number"
            )))
        }
    }

    /// Escapes a JSON document as a string literal.
    pub fn escape_json(&self, value: &serde_json::Value) -> Result<String> {
        self.escape_string(&serde_json::to_string(value)?)
    }

    /// Formats a timestamp in the configured timezone.
    ///
    /// `YYYY-MM-DD HH:MM:SS.mmm +HH:MM`, or without the offset.
    pub fn format_timestamp(
        &self,
        value: &DateTime<FixedOffset>,
        with_offset: bool,
    ) -> Result<String> {
        let local = value.with_timezone(&self.options.offset()?);
        let format = if with_offset {
            "%Y-%m-%d %H:%M:%S%.3f %:z"
        } else {
            "%Y-%m-%d %H:%M:%S%.3f"
        };
        Ok(local.format(format).to_string())
    }

    /// Escapes a value for inline use.
    ///
    /// With a data type, the type decides the representation. Without one,
    /// only scalar values are accepted.
    pub fn escape(&self, value: &Value, data_type: Option<&DataType>) -> Result<String> {
        match data_type {
            Some(data_type) => data_type.escape(value, self),
            None => self.escape_primitive(value),
        }
    }

    /// Escapes a scalar value.
    pub fn escape_primitive(&self, value: &Value) -> Result<String> {
        match value {
            Value::Null => Ok(String::from("NULL")),
            Value::Bool(b) => Ok(self.escape_bool(*b).to_string()),
            Value::Int(n) => Ok(n.to_string()),
            Value::Float(f) => self.escape_float(*f),
            Value::Decimal(d) => self.escape_decimal(d),
            Value::Text(s) => self.escape_string(s),
            Value::Bytes(b) => Ok(self.escape_buffer(b)),
            Value::Timestamp(ts) => self.escape_string(&self.format_timestamp(ts, true)?),
            Value::Date(d) => self.escape_string(&format_date(*d)),
            Value::Time(t) => self.escape_string(&format_time(*t)),
            Value::Json(json) => self.escape_json(json),
            Value::Array(_) | Value::Range(_) => Err(DialectError::Escaping(format!(
                "a {} value needs a data type to be escaped",
                value.kind_name()
            ))),
        }
    }

    /// Escapes a list of values as `(a, b, c)`.
    pub fn escape_list(&self, values: &[Value], data_type: Option<&DataType>) -> Result<String> {
        let escaped = values
            .iter()
            .map(|value| self.escape(value, data_type))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("({})", escaped.join(", ")))
    }

    /// Creates an empty bind-parameter collector in the dialect's style.
    #[must_use]
    pub const fn bind_params(&self) -> BindParams {
        BindParams::new(self.capabilities.bind_params)
    }
}

/// Ordered bind parameters of one query.
#[derive(Debug, Clone, PartialEq)]
pub struct BindParams {
    style: BindParamStyle,
    values: Vec<Value>,
}

impl BindParams {
    /// Creates an empty collector.
    #[must_use]
    pub const fn new(style: BindParamStyle) -> Self {
        Self {
            style,
            values: Vec::new(),
        }
    }

    /// Records `value` and returns its placeholder.
    ///
    /// Every call allocates a new position, even for equal values.
    pub fn bind(&mut self, value: Value) -> String {
        self.values.push(value);
        let index = self.values.len();
        match self.style {
            BindParamStyle::Dollar => format!("${index}"),
            BindParamStyle::Question => String::from("?"),
            BindParamStyle::AtNamed => format!("@p{index}"),
        }
    }

    /// Returns the values bound so far.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the values, in placeholder order.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

fn quote_doubled(prefix: &str, value: &str) -> String {
    format!("{prefix}'{}'", value.replace('\'', "''"))
}

fn quote_backslash(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\x08' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

pub(crate) fn non_finite_text(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}

pub(crate) fn is_decimal_literal(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let (mantissa, exponent) = match digits.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (digits, None),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let exponent_ok = exponent.is_none_or(|e| {
        let e = e.strip_prefix(['+', '-']).unwrap_or(e);
        !e.is_empty() && all_digits(e)
    });
    !int_part.is_empty()
        && all_digits(int_part)
        && all_digits(frac_part)
        && !(mantissa.ends_with('.'))
        && exponent_ok
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S%.f").to_string()
}
