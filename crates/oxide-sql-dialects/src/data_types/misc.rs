//! BOOLEAN, UUID, BLOB, ENUM and ARRAY.

use super::{invalid_value, require_support, DataType, LogicalType, TypeKey};
use crate::capabilities::EnumStrategy;
use crate::error::{DialectError, Result};
use crate::escape::Escaper;
use crate::value::Value;

/// Boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BooleanType;

impl BooleanType {
    fn as_bool(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            Value::Text(s) | Value::Decimal(s) => match s.trim() {
                "true" | "t" | "1" => Some(true),
                "false" | "f" | "0" => Some(false),
                _ => None,
            },
            Value::Bytes(bytes) if bytes.len() == 1 => Some(bytes[0] != 0),
            _ => None,
        }
    }
}

impl LogicalType for BooleanType {
    fn key(&self) -> TypeKey {
        TypeKey::Boolean
    }

    fn to_sql(&self, _dialect: &Escaper<'_>) -> Result<String> {
        Ok(String::from("BOOLEAN"))
    }

    fn validate(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<()> {
        match value {
            Value::Bool(_) => Ok(()),
            other => Err(invalid_value(other, "BOOLEAN")),
        }
    }

    fn sanitize(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        Ok(Self::as_bool(&value).map_or(value, Value::Bool))
    }

    fn escape(&self, value: &Value, dialect: &Escaper<'_>) -> Result<String> {
        match value {
            Value::Bool(b) => Ok(dialect.escape_bool(*b).to_string()),
            other => dialect.escape_primitive(other),
        }
    }

    fn parse_database_value(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        Self::as_bool(&value)
            .map(Value::Bool)
            .ok_or_else(|| DialectError::parse(format!("{value:?} is not a valid BOOLEAN")))
    }
}

/// A UUID, optionally restricted to one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UuidType {
    /// Accepted version, any when `None`.
    pub version: Option<usize>,
}

impl UuidType {
    /// A UUID of any version.
    #[must_use]
    pub const fn new() -> Self {
        Self { version: None }
    }

    /// Restricts the accepted version.
    #[must_use]
    pub const fn version(mut self, version: usize) -> Self {
        self.version = Some(version);
        self
    }
}

impl LogicalType for UuidType {
    fn key(&self) -> TypeKey {
        TypeKey::Uuid
    }

    fn to_sql(&self, _dialect: &Escaper<'_>) -> Result<String> {
        Ok(String::from("CHAR(36)"))
    }

    fn validate(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<()> {
        let Value::Text(text) = value else {
            return Err(invalid_value(value, "UUID"));
        };
        let uuid = uuid::Uuid::parse_str(text).map_err(|_| invalid_value(value, "UUID"))?;
        match self.version {
            Some(version) if uuid.get_version_num() != version => Err(DialectError::validation(
                format!("{text} is not a valid UUID v{version}"),
            )),
            _ => Ok(()),
        }
    }

    fn to_bindable_value(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<Value> {
        match value {
            Value::Text(text) => Ok(uuid::Uuid::parse_str(text).map_or_else(
                |_| value.clone(),
                |uuid| Value::Text(uuid.hyphenated().to_string()),
            )),
            other => Ok(other.clone()),
        }
    }

    fn parse_database_value(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        match value {
            Value::Bytes(bytes) => uuid::Uuid::from_slice(&bytes)
                .map(|uuid| Value::Text(uuid.hyphenated().to_string()))
                .map_err(|e| DialectError::parse(e.to_string())),
            Value::Text(text) => Ok(Value::Text(text.to_lowercase())),
            other => Ok(other),
        }
    }
}

/// Size variants of BLOB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobSize {
    /// Up to 255 bytes.
    Tiny,
    /// Up to 16 MiB.
    Medium,
    /// Up to 4 GiB.
    Long,
}

/// Binary large object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlobType {
    /// Size hint.
    pub size: Option<BlobSize>,
}

impl BlobType {
    /// A plain `BLOB`.
    #[must_use]
    pub const fn new() -> Self {
        Self { size: None }
    }

    /// Sets the size hint.
    #[must_use]
    pub const fn size(mut self, size: BlobSize) -> Self {
        self.size = Some(size);
        self
    }
}

pub(crate) fn decode_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(text.get(i..i + 2)?, 16).ok())
        .collect()
}

impl LogicalType for BlobType {
    fn key(&self) -> TypeKey {
        TypeKey::Blob
    }

    fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        if !dialect.capabilities().data_types.sized_lobs {
            return Ok(String::from("BLOB"));
        }
        Ok(String::from(match self.size {
            Some(BlobSize::Tiny) => "TINYBLOB",
            Some(BlobSize::Medium) => "MEDIUMBLOB",
            Some(BlobSize::Long) => "LONGBLOB",
            None => "BLOB",
        }))
    }

    fn validate(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<()> {
        match value {
            Value::Bytes(_) | Value::Text(_) => Ok(()),
            other => Err(invalid_value(other, "BLOB")),
        }
    }

    fn to_bindable_value(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<Value> {
        match value {
            Value::Text(text) => Ok(Value::Bytes(text.as_bytes().to_vec())),
            other => Ok(other.clone()),
        }
    }

    fn parse_database_value(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        match value {
            Value::Text(text) => Ok(Value::Bytes(
                text.strip_prefix("\\x")
                    .and_then(decode_hex)
                    .unwrap_or_else(|| text.into_bytes()),
            )),
            other => Ok(other),
        }
    }
}

/// An enumeration of string values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    values: Vec<String>,
    /// Name of the database type, for dialects with named enum types.
    pub name: Option<String>,
}

impl EnumType {
    /// Creates an enum. At least one value is required.
    pub fn new<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(DialectError::invalid("ENUM requires at least one value"));
        }
        Ok(Self { values, name: None })
    }

    /// Sets the database type name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The allowed values.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// The allowed values as `('a', 'b')`.
    pub fn escaped_values(&self, dialect: &Escaper<'_>) -> Result<String> {
        let escaped = self
            .values
            .iter()
            .map(|v| dialect.escape_string(v))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("({})", escaped.join(", ")))
    }
}

impl LogicalType for EnumType {
    fn key(&self) -> TypeKey {
        TypeKey::Enum
    }

    /// `ENUM('a', 'b')` inline, the quoted type name for named enum types,
    /// or the dialect's string type when membership is a CHECK constraint.
    fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        match dialect.capabilities().data_types.enums {
            EnumStrategy::Inline => Ok(format!("ENUM{}", self.escaped_values(dialect)?)),
            EnumStrategy::NamedType => self
                .name
                .as_deref()
                .map(|name| dialect.quote_identifier(name))
                .ok_or_else(|| {
                    DialectError::invalid(format!(
                        "ENUM columns in {} need a type name",
                        dialect.dialect_name()
                    ))
                }),
            EnumStrategy::Check => DataType::string().to_sql(dialect),
        }
    }

    fn validate(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<()> {
        match value {
            Value::Text(text) if self.values.contains(text) => Ok(()),
            other => Err(DialectError::validation(format!(
                "{other:?} is not a valid choice for ENUM{:?}",
                self.values
            ))),
        }
    }
}

/// An array of an element type.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    /// Element type.
    pub element: Box<DataType>,
}

impl ArrayType {
    /// An array of `element`.
    #[must_use]
    pub fn new(element: DataType) -> Self {
        Self {
            element: Box::new(element),
        }
    }

    /// Whether literals need an explicit `::type[]` cast.
    fn needs_cast(&self, empty: bool) -> bool {
        empty
            || !matches!(
                self.element.as_ref(),
                DataType::Text(_) | DataType::Integer(super::IntegerType {
                    kind: super::IntegerKind::Integer,
                    ..
                })
            )
    }
}

fn split_array_literal(text: &str) -> Option<Vec<Option<String>>> {
    let inner = text.trim().strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() {
        return Some(Vec::new());
    }
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut was_quoted = false;
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                quoted = !quoted;
                was_quoted = true;
            }
            '\\' => current.push(chars.next()?),
            ',' if !quoted => {
                let item = std::mem::take(&mut current);
                items.push((was_quoted || item != "NULL").then_some(item));
                was_quoted = false;
            }
            other => current.push(other),
        }
    }
    items.push((was_quoted || current != "NULL").then_some(current));
    Some(items)
}

impl LogicalType for ArrayType {
    fn key(&self) -> TypeKey {
        TypeKey::Array
    }

    fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        require_support(dialect.capabilities().data_types.array, dialect, "ARRAY")?;
        Ok(format!("{}[]", self.element.to_sql(dialect)?))
    }

    fn validate(&self, value: &Value, dialect: &Escaper<'_>) -> Result<()> {
        let Value::Array(items) = value else {
            return Err(invalid_value(value, "ARRAY"));
        };
        items
            .iter()
            .try_for_each(|item| self.element.validate(item, dialect))
    }

    fn to_bindable_value(&self, value: &Value, dialect: &Escaper<'_>) -> Result<Value> {
        match value {
            Value::Array(items) => Ok(Value::Array(
                items
                    .iter()
                    .map(|item| self.element.to_bindable_value(item, dialect))
                    .collect::<Result<_>>()?,
            )),
            other => Ok(other.clone()),
        }
    }

    fn escape(&self, value: &Value, dialect: &Escaper<'_>) -> Result<String> {
        let Value::Array(items) = value else {
            return dialect.escape_primitive(value);
        };
        let escaped = items
            .iter()
            .map(|item| self.element.escape(item, dialect))
            .collect::<Result<Vec<_>>>()?;
        let mut sql = format!("ARRAY[{}]", escaped.join(","));
        if self.needs_cast(items.is_empty()) {
            sql.push_str("::");
            sql.push_str(&self.to_sql(dialect)?);
        }
        Ok(sql)
    }

    fn parse_database_value(&self, value: Value, dialect: &Escaper<'_>) -> Result<Value> {
        let items = match value {
            Value::Array(items) => items,
            Value::Text(text) => split_array_literal(&text)
                .ok_or_else(|| DialectError::parse(format!("'{text}' is not an array literal")))?
                .into_iter()
                .map(|item| item.map_or(Value::Null, Value::Text))
                .collect(),
            other => return Ok(other),
        };
        Ok(Value::Array(
            items
                .into_iter()
                .map(|item| self.element.parse_database_value(item, dialect))
                .collect::<Result<_>>()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::dialect;
    use super::*;
    use crate::capabilities::DialectKind;
    use crate::error::ErrorKind;

    #[test]
    fn test_boolean_rendering() {
        let ty = DataType::boolean();
        assert_eq!(ty.to_sql(&dialect(DialectKind::Postgres)).unwrap(), "BOOLEAN");
        assert_eq!(ty.to_sql(&dialect(DialectKind::MySql)).unwrap(), "TINYINT(1)");
        assert_eq!(ty.to_sql(&dialect(DialectKind::MsSql)).unwrap(), "BIT");
        assert_eq!(
            ty.escape(&Value::Bool(true), &dialect(DialectKind::Postgres))
                .unwrap(),
            "true"
        );
        assert_eq!(
            ty.escape(&Value::Bool(false), &dialect(DialectKind::MsSql))
                .unwrap(),
            "0"
        );
    }

    #[test]
    fn test_boolean_parse_database_value() {
        let d = dialect(DialectKind::MySql);
        let ty = DataType::boolean();
        assert_eq!(ty.parse_database_value(Value::Int(1), &d).unwrap(), Value::Bool(true));
        assert_eq!(
            ty.parse_database_value(Value::Bytes(vec![0]), &d).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            ty.parse_database_value(Value::Bool(true), &d).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            ty.parse_database_value(Value::Int(2), &d).unwrap_err().kind(),
            ErrorKind::Parse
        );
        assert!(ty.validate(&Value::Int(1), &d).is_err());
        assert_eq!(
            ty.sanitize(Value::Text(String::from("t")), &d).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_uuid_validation() {
        let d = dialect(DialectKind::Postgres);
        let v4 = Value::Text(String::from("a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11"));
        assert!(DataType::uuid().validate(&v4, &d).is_ok());
        assert!(DataType::from(UuidType::new().version(4))
            .validate(&v4, &d)
            .is_ok());
        assert!(DataType::from(UuidType::new().version(1))
            .validate(&v4, &d)
            .is_err());
        assert!(DataType::uuid()
            .validate(&Value::Text(String::from("not-a-uuid")), &d)
            .is_err());
    }

    #[test]
    fn test_uuid_names() {
        let ty = DataType::uuid();
        assert_eq!(ty.to_sql(&dialect(DialectKind::Postgres)).unwrap(), "UUID");
        assert_eq!(
            ty.to_sql(&dialect(DialectKind::MySql)).unwrap(),
            "CHAR(36) BINARY"
        );
        assert_eq!(
            ty.to_sql(&dialect(DialectKind::MsSql)).unwrap(),
            "UNIQUEIDENTIFIER"
        );
    }

    #[test]
    fn test_blob() {
        let mysql = dialect(DialectKind::MySql);
        assert_eq!(
            DataType::from(BlobType::new().size(BlobSize::Long))
                .to_sql(&mysql)
                .unwrap(),
            "LONGBLOB"
        );
        assert_eq!(
            DataType::blob()
                .escape(&Value::Bytes(vec![0xde, 0xad]), &mysql)
                .unwrap(),
            "X'dead'"
        );
        assert_eq!(
            DataType::blob()
                .parse_database_value(
                    Value::Text(String::from("\\xdead")),
                    &dialect(DialectKind::Postgres)
                )
                .unwrap(),
            Value::Bytes(vec![0xde, 0xad])
        );
    }

    #[test]
    fn test_enum() {
        assert_eq!(
            EnumType::new(Vec::<String>::new()).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        let ty = DataType::enumeration(["a", "b'c"]).unwrap();
        let mysql = dialect(DialectKind::MySql);
        assert_eq!(ty.to_sql(&mysql).unwrap(), "ENUM('a', 'b\\'c')");
        assert!(ty.validate(&Value::Text(String::from("a")), &mysql).is_ok());
        assert!(ty.validate(&Value::Text(String::from("z")), &mysql).is_err());
    }

    #[test]
    fn test_enum_strategies() {
        let ty = DataType::from(EnumType::new(["a"]).unwrap().named("enum_users_status"));
        assert_eq!(
            ty.to_sql(&dialect(DialectKind::Postgres)).unwrap(),
            "\"enum_users_status\""
        );
        assert_eq!(
            ty.to_sql(&dialect(DialectKind::MsSql)).unwrap(),
            "NVARCHAR(255)"
        );
        assert_eq!(
            DataType::enumeration(["a"])
                .unwrap()
                .to_sql(&dialect(DialectKind::Postgres))
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_array_escape() {
        let pg = dialect(DialectKind::Postgres);
        let ints = DataType::array(DataType::integer());
        assert_eq!(ints.to_sql(&pg).unwrap(), "INTEGER[]");
        assert_eq!(
            ints.escape(&Value::Array(vec![Value::Int(1), Value::Int(2)]), &pg)
                .unwrap(),
            "ARRAY[1,2]"
        );
        assert_eq!(
            ints.escape(&Value::Array(vec![]), &pg).unwrap(),
            "ARRAY[]::INTEGER[]"
        );
        let strings = DataType::array(DataType::string());
        assert_eq!(
            strings
                .escape(&Value::Array(vec![Value::Text(String::from("a"))]), &pg)
                .unwrap(),
            "ARRAY['a']::VARCHAR(255)[]"
        );
        assert_eq!(
            ints.to_sql(&dialect(DialectKind::MySql)).unwrap_err().kind(),
            ErrorKind::UnsupportedFeature
        );
    }

    #[test]
    fn test_array_parse_literal() {
        let pg = dialect(DialectKind::Postgres);
        let ints = DataType::array(DataType::integer());
        assert_eq!(
            ints.parse_database_value(Value::Text(String::from("{1,2,NULL}")), &pg)
                .unwrap(),
            Value::Array(vec![Value::Int(1), Value::Int(2), Value::Null])
        );
        let strings = DataType::array(DataType::text());
        assert_eq!(
            strings
                .parse_database_value(Value::Text(String::from("{\"a,b\",c}")), &pg)
                .unwrap(),
            Value::Array(vec![
                Value::Text(String::from("a,b")),
                Value::Text(String::from("c"))
            ])
        );
    }
}
