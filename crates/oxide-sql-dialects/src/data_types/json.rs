//! JSON and JSONB.

use super::{require_support, LogicalType, TypeKey};
use crate::config::NullJsonStringification;
use crate::error::{DialectError, Result};
use crate::escape::Escaper;
use crate::value::Value;

/// A JSON document column.
///
/// `Value::Json(serde_json::Value::Null)` is always the JSON `null`.
/// A bare `Value::Null` is stored according to
/// [`NullJsonStringification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonType {
    /// JSONB instead of JSON.
    pub binary: bool,
}

impl JsonType {
    /// `JSON`.
    #[must_use]
    pub const fn json() -> Self {
        Self { binary: false }
    }

    /// `JSONB`.
    #[must_use]
    pub const fn jsonb() -> Self {
        Self { binary: true }
    }

    const fn name(self) -> &'static str {
        if self.binary {
            "JSONB"
        } else {
            "JSON"
        }
    }

    fn null_json(self, dialect: &Escaper<'_>) -> Result<Option<serde_json::Value>> {
        match dialect.options().null_json_stringification {
            NullJsonStringification::Json => Ok(Some(serde_json::Value::Null)),
            NullJsonStringification::Sql => Ok(None),
            NullJsonStringification::Explicit => Err(DialectError::validation(format!(
                "a NULL {} value is ambiguous: pass a JSON null or use SQL NULL explicitly",
                self.name()
            ))),
        }
    }

    /// Converts an application value into the JSON document to store.
    /// `None` means SQL `NULL`.
    pub(crate) fn document(
        self,
        value: &Value,
        dialect: &Escaper<'_>,
    ) -> Result<Option<serde_json::Value>> {
        use serde_json::Value as Json;
        Ok(Some(match value {
            Value::Null => return self.null_json(dialect),
            Value::Json(json) => json.clone(),
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(n) => Json::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .ok_or_else(|| DialectError::validation(format!("{f} is not valid JSON")))?,
            Value::Decimal(s) | Value::Text(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(
                items
                    .iter()
                    .map(|item| {
                        self.document(item, dialect)
                            .map(|doc| doc.unwrap_or(Json::Null))
                    })
                    .collect::<Result<_>>()?,
            ),
            other => {
                return Err(DialectError::validation(format!(
                    "a {} value cannot be stored as {}",
                    other.kind_name(),
                    self.name()
                )))
            }
        }))
    }
}

impl LogicalType for JsonType {
    fn key(&self) -> TypeKey {
        if self.binary {
            TypeKey::Jsonb
        } else {
            TypeKey::Json
        }
    }

    fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        let support = dialect.capabilities().data_types;
        let supported = if self.binary {
            support.jsonb
        } else {
            support.json
        };
        require_support(supported, dialect, self.name())?;
        Ok(String::from(self.name()))
    }

    fn validate(&self, value: &Value, dialect: &Escaper<'_>) -> Result<()> {
        self.document(value, dialect).map(|_| ())
    }

    fn to_bindable_value(&self, value: &Value, dialect: &Escaper<'_>) -> Result<Value> {
        match self.document(value, dialect)? {
            Some(doc) => Ok(Value::Text(serde_json::to_string(&doc)?)),
            None => Ok(Value::Null),
        }
    }

    fn escape(&self, value: &Value, dialect: &Escaper<'_>) -> Result<String> {
        self.document(value, dialect)?
            .map_or_else(|| Ok(String::from("NULL")), |doc| dialect.escape_json(&doc))
    }

    fn parse_database_value(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        match value {
            Value::Text(text) => Ok(Value::Json(serde_json::from_str(&text)?)),
            Value::Bytes(bytes) => Ok(Value::Json(serde_json::from_slice(&bytes)?)),
            other => Ok(other),
        }
    }
}
