//! STRING, CHAR, TEXT and CITEXT.

use tracing::warn;

use super::{invalid_value, require_support, LogicalType, TypeKey};
use crate::error::Result;
use crate::escape::Escaper;
use crate::value::Value;

pub(crate) const DEFAULT_LENGTH: u32 = 255;

fn validate_string(value: &Value, binary: bool, type_name: &str) -> Result<()> {
    match value {
        Value::Text(_) => Ok(()),
        Value::Bytes(_) if binary => Ok(()),
        other => Err(invalid_value(other, type_name)),
    }
}

/// `VARCHAR(length)`, 255 when no length is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringType {
    /// Maximum length.
    pub length: Option<u32>,
    /// Binary collation / byte storage.
    pub binary: bool,
}

impl StringType {
    /// A `VARCHAR(255)`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            length: None,
            binary: false,
        }
    }

    /// Sets the length.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Stores bytes instead of characters.
    #[must_use]
    pub const fn binary(mut self) -> Self {
        self.binary = true;
        self
    }

    /// The length used in SQL.
    #[must_use]
    pub fn effective_length(&self) -> u32 {
        self.length.unwrap_or(DEFAULT_LENGTH)
    }
}

impl LogicalType for StringType {
    fn key(&self) -> TypeKey {
        TypeKey::String
    }

    fn to_sql(&self, _dialect: &Escaper<'_>) -> Result<String> {
        let binary = if self.binary { " BINARY" } else { "" };
        Ok(format!("VARCHAR({}){binary}", self.effective_length()))
    }

    fn validate(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<()> {
        validate_string(value, self.binary, "STRING")
    }
}

/// `CHAR(length)`, 255 when no length is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharType {
    /// Fixed length.
    pub length: Option<u32>,
    /// Binary collation / byte storage.
    pub binary: bool,
}

impl CharType {
    /// A `CHAR(255)`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            length: None,
            binary: false,
        }
    }

    /// Sets the length.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Stores bytes instead of characters.
    #[must_use]
    pub const fn binary(mut self) -> Self {
        self.binary = true;
        self
    }

    /// The length used in SQL.
    #[must_use]
    pub fn effective_length(&self) -> u32 {
        self.length.unwrap_or(DEFAULT_LENGTH)
    }
}

impl LogicalType for CharType {
    fn key(&self) -> TypeKey {
        TypeKey::Char
    }

    fn to_sql(&self, _dialect: &Escaper<'_>) -> Result<String> {
        let binary = if self.binary { " BINARY" } else { "" };
        Ok(format!("CHAR({}){binary}", self.effective_length()))
    }

    fn validate(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<()> {
        validate_string(value, self.binary, "CHAR")
    }
}

/// Size variants of TEXT and BLOB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    /// Up to 255 bytes.
    Tiny,
    /// Up to 16 MiB.
    Medium,
    /// Up to 4 GiB.
    Long,
}

/// Unbounded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextType {
    /// Size hint; only some dialects use it.
    pub size: Option<TextSize>,
}

impl TextType {
    /// A plain `TEXT`.
    #[must_use]
    pub const fn new() -> Self {
        Self { size: None }
    }

    /// Sets the size hint.
    #[must_use]
    pub const fn size(mut self, size: TextSize) -> Self {
        self.size = Some(size);
        self
    }
}

impl LogicalType for TextType {
    fn key(&self) -> TypeKey {
        TypeKey::Text
    }

    fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        // Size variants are a MySQL vocabulary; elsewhere TEXT is unbounded.
        if dialect.capabilities().data_types.sized_lobs {
            return Ok(String::from(match self.size {
                Some(TextSize::Tiny) => "TINYTEXT",
                Some(TextSize::Medium) => "MEDIUMTEXT",
                Some(TextSize::Long) => "LONGTEXT",
                None => "TEXT",
            }));
        }
        if self.size.is_some() {
            warn!(
                dialect = dialect.dialect_name(),
                "TEXT size is not supported, plain TEXT is used instead"
            );
        }
        Ok(String::from("TEXT"))
    }

    fn validate(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<()> {
        validate_string(value, false, "TEXT")
    }
}

/// Case-insensitive text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CitextType;

impl LogicalType for CitextType {
    fn key(&self) -> TypeKey {
        TypeKey::Citext
    }

    fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        require_support(dialect.capabilities().data_types.citext, dialect, "CITEXT")?;
        Ok(String::from("CITEXT"))
    }

    fn validate(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<()> {
        validate_string(value, false, "CITEXT")
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
    fn test_string_sql() {
        let mysql = dialect(DialectKind::MySql);
        assert_eq!(DataType::string().to_sql(&mysql).unwrap(), "VARCHAR(255)");
        assert_eq!(
            DataType::from(StringType::new().length(10).binary())
                .to_sql(&mysql)
                .unwrap(),
            "VARCHAR(10) BINARY"
        );
    }

    #[test]
    fn test_string_validation() {
        let mysql = dialect(DialectKind::MySql);
        let ty = DataType::string();
        assert!(ty.validate(&Value::Text(String::from("a")), &mysql).is_ok());
        assert!(ty.validate(&Value::Int(1), &mysql).is_err());
        assert!(ty.validate(&Value::Bytes(vec![1]), &mysql).is_err());
        let binary = DataType::from(StringType::new().binary());
        assert!(binary.validate(&Value::Bytes(vec![1]), &mysql).is_ok());
    }

    #[test]
    fn test_text_sizes() {
        let ty = DataType::from(TextType::new().size(TextSize::Medium));
        assert_eq!(
            ty.to_sql(&dialect(DialectKind::MySql)).unwrap(),
            "MEDIUMTEXT"
        );
        assert_eq!(ty.to_sql(&dialect(DialectKind::Postgres)).unwrap(), "TEXT");
        assert_eq!(
            ty.to_sql(&dialect(DialectKind::MsSql)).unwrap(),
            "NVARCHAR(MAX)"
        );
    }

    #[test]
    fn test_citext_support() {
        let ty = DataType::citext();
        assert_eq!(ty.to_sql(&dialect(DialectKind::Postgres)).unwrap(), "CITEXT");
        assert_eq!(
            ty.to_sql(&dialect(DialectKind::Sqlite)).unwrap(),
            "TEXT COLLATE NOCASE"
        );
        assert_eq!(
            ty.to_sql(&dialect(DialectKind::MySql)).unwrap_err().kind(),
            ErrorKind::UnsupportedFeature
        );
    }

    #[test]
    fn test_string_dialect_names() {
        let ty = DataType::varchar(20);
        assert_eq!(
            ty.to_sql(&dialect(DialectKind::MsSql)).unwrap(),
            "NVARCHAR(20)"
        );
        assert_eq!(ty.to_sql(&dialect(DialectKind::Hana)).unwrap(), "NVARCHAR(20)");
        let binary = DataType::from(StringType::new().length(20).binary());
        assert_eq!(
            binary.to_sql(&dialect(DialectKind::Db2)).unwrap(),
            "VARCHAR(20) FOR BIT DATA"
        );
        assert_eq!(
            binary.to_sql(&dialect(DialectKind::Postgres)).unwrap(),
            "BYTEA"
        );
    }
}
