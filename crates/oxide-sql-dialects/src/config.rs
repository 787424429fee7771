//! Per-dialect configuration.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DialectError, Result};

/// How a JSON `null` is stored in a JSON column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullJsonStringification {
    /// As the JSON text `null`.
    #[default]
    Json,
    /// As SQL `NULL`.
    Sql,
    /// Refuse to guess; the caller must say which one it means.
    Explicit,
}

/// SQLite transaction locking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// `BEGIN DEFERRED TRANSACTION`
    Deferred,
    /// `BEGIN IMMEDIATE TRANSACTION`
    Immediate,
    /// `BEGIN EXCLUSIVE TRANSACTION`
    Exclusive,
}

impl TransactionType {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Deferred => "DEFERRED",
            Self::Immediate => "IMMEDIATE",
            Self::Exclusive => "EXCLUSIVE",
        }
    }
}

/// Options shared by every generator of a dialect instance.
///
/// ```
/// use oxide_sql_dialects::DialectOptions;
///
/// let options: DialectOptions =
///     serde_json::from_str(r#"{"schema": "app", "timezone": "+02:00"}"#).unwrap();
/// assert_eq!(options.schema.as_deref(), Some("app"));
/// assert!(options.bind_parameters);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DialectOptions {
    /// Schema used instead of the dialect default.
    pub schema: Option<String>,
    /// Offset used when rendering timestamps, as `+HH:MM`.
    pub timezone: String,
    /// Storage of JSON `null`.
    pub null_json_stringification: NullJsonStringification,
    /// Default SQLite transaction type.
    pub transaction_type: Option<TransactionType>,
    /// Replaces the dialect's maximum identifier length.
    pub identifier_max_length_override: Option<usize>,
    /// Whether DML uses bind parameters instead of inline literals.
    pub bind_parameters: bool,
}

impl Default for DialectOptions {
    fn default() -> Self {
        Self {
            schema: None,
            timezone: "+00:00".to_string(),
            null_json_stringification: NullJsonStringification::default(),
            transaction_type: None,
            identifier_max_length_override: None,
            bind_parameters: true,
        }
    }
}

impl DialectOptions {
    /// Sets the default schema.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Sets the timezone offset.
    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Disables bind parameters; values are escaped inline.
    #[must_use]
    pub const fn inline_values(mut self) -> Self {
        self.bind_parameters = false;
        self
    }

    /// Parses [`Self::timezone`] into a fixed offset.
    ///
    /// Accepts `+HH:MM`, `-HH:MM`, `Z` and `UTC`.
    pub fn offset(&self) -> Result<FixedOffset> {
        parse_offset(&self.timezone)
    }
}

pub(crate) fn parse_offset(raw: &str) -> Result<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(utc());
    }
    let invalid = || DialectError::invalid(format!("invalid timezone offset '{raw}'"));
    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

pub(crate) fn utc() -> FixedOffset {
    Utc.fix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DialectOptions::default();
        assert_eq!(options.timezone, "+00:00");
        assert_eq!(
            options.null_json_stringification,
            NullJsonStringification::Json
        );
        assert!(options.bind_parameters);
        assert_eq!(options.offset().unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let options: DialectOptions = serde_json::from_str(
            r#"{"nullJsonStringification": "sql", "transactionType": "IMMEDIATE", "bindParameters": false}"#,
        )
        .unwrap();
        assert_eq!(
            options.null_json_stringification,
            NullJsonStringification::Sql
        );
        assert_eq!(options.transaction_type, Some(TransactionType::Immediate));
        assert!(!options.bind_parameters);
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("+05:30").unwrap().local_minus_utc(), 19800);
        assert_eq!(parse_offset("-08:00").unwrap().local_minus_utc(), -28800);
        assert_eq!(parse_offset("UTC").unwrap().local_minus_utc(), 0);
        assert!(parse_offset("Europe/Paris").is_err());
        assert!(parse_offset("+25:00").is_err());
    }
}
