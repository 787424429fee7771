//! Data Type Registry.
//!
//! Each logical type is a struct implementing [`LogicalType`]. The generic
//! implementation is the one most dialects share; a dialect that renders,
//! binds or parses a type differently lists a [`TypeOverride`] for that
//! type in its capability table. Resolution is a lookup by [`TypeKey`].
//!
//! ```
//! use oxide_sql_dialects::data_types::{DataType, IntegerType};
//! use oxide_sql_dialects::{DialectKind, DialectOptions, Escaper};
//!
//! let options = DialectOptions::default();
//! let pg = Escaper::new(DialectKind::Postgres.capabilities(), &options);
//! let mysql = Escaper::new(DialectKind::MySql.capabilities(), &options);
//!
//! let ty = DataType::from(IntegerType::tinyint().unsigned());
//! assert_eq!(ty.to_sql(&pg).unwrap(), "SMALLINT");
//! assert_eq!(ty.to_sql(&mysql).unwrap(), "TINYINT UNSIGNED");
//! ```

mod default_value;
mod json;
mod misc;
mod numeric;
pub(crate) mod overrides;
mod range;
mod string;
mod temporal;

pub use default_value::DefaultValue;
pub use json::JsonType;
pub use misc::{ArrayType, BlobSize, BlobType, BooleanType, EnumType, UuidType};
pub use numeric::{DecimalType, FloatKind, FloatType, IntegerKind, IntegerType};
pub use overrides::{BindFn, EscapeFn, ParseFn, SqlFn, TypeOverride, ValidateFn};
pub use range::{parse_range_literal, stringify_range, RangeType, RawBound};
pub use string::{CharType, CitextType, StringType, TextSize, TextType};
pub use temporal::{DateOnlyType, DateType, TimeType};

use crate::error::{DialectError, Result};
use crate::escape::Escaper;
use crate::value::Value;

/// Identity of a logical type, used to look up dialect overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// STRING.
    String,
    /// CHAR.
    Char,
    /// TEXT.
    Text,
    /// CITEXT.
    Citext,
    /// TINYINT, SMALLINT, MEDIUMINT, INTEGER and BIGINT.
    Integer,
    /// FLOAT, REAL and DOUBLE.
    Float,
    /// DECIMAL.
    Decimal,
    /// BOOLEAN.
    Boolean,
    /// TIME.
    Time,
    /// DATE (a timestamp).
    Date,
    /// DATEONLY.
    DateOnly,
    /// UUID.
    Uuid,
    /// BLOB.
    Blob,
    /// JSON.
    Json,
    /// JSONB.
    Jsonb,
    /// ENUM.
    Enum,
    /// RANGE.
    Range,
    /// ARRAY.
    Array,
}

impl TypeKey {
    /// Upper-case name of the logical type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Char => "CHAR",
            Self::Text => "TEXT",
            Self::Citext => "CITEXT",
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::Decimal => "DECIMAL",
            Self::Boolean => "BOOLEAN",
            Self::Time => "TIME",
            Self::Date => "DATE",
            Self::DateOnly => "DATEONLY",
            Self::Uuid => "UUID",
            Self::Blob => "BLOB",
            Self::Json => "JSON",
            Self::Jsonb => "JSONB",
            Self::Enum => "ENUM",
            Self::Range => "RANGE",
            Self::Array => "ARRAY",
        }
    }
}

/// Behaviour shared by every logical type.
///
/// `dialect` is the only source of dialect variance; implementations keep
/// no state keyed by dialect.
pub trait LogicalType {
    /// Identity used for override lookup.
    fn key(&self) -> TypeKey;

    /// Renders the column type.
    fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String>;

    /// Rejects values the type cannot store. `Null` never reaches this.
    fn validate(&self, value: &Value, dialect: &Escaper<'_>) -> Result<()>;

    /// Normalizes loosely typed input, e.g. numeric strings.
    fn sanitize(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        Ok(value)
    }

    /// Converts a value into the primitive handed to the driver.
    fn to_bindable_value(&self, value: &Value, _dialect: &Escaper<'_>) -> Result<Value> {
        Ok(value.clone())
    }

    /// Renders a value as an inline literal.
    fn escape(&self, value: &Value, dialect: &Escaper<'_>) -> Result<String> {
        let bindable = self.to_bindable_value(value, dialect)?;
        dialect.escape_primitive(&bindable)
    }

    /// Converts a raw value read from the database.
    fn parse_database_value(&self, value: Value, _dialect: &Escaper<'_>) -> Result<Value> {
        Ok(value)
    }
}

/// A logical column type with its options.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    /// Variable length string.
    String(StringType),
    /// Fixed length string.
    Char(CharType),
    /// Unbounded text.
    Text(TextType),
    /// Case-insensitive text.
    Citext(CitextType),
    /// Integer family.
    Integer(IntegerType),
    /// Floating point family.
    Float(FloatType),
    /// Exact numeric.
    Decimal(DecimalType),
    /// Boolean.
    Boolean(BooleanType),
    /// Time of day.
    Time(TimeType),
    /// Timestamp.
    Date(DateType),
    /// Calendar date.
    DateOnly(DateOnlyType),
    /// UUID.
    Uuid(UuidType),
    /// Binary large object.
    Blob(BlobType),
    /// JSON or JSONB.
    Json(JsonType),
    /// Enumeration.
    Enum(EnumType),
    /// Range of a subtype.
    Range(RangeType),
    /// Array of a subtype.
    Array(ArrayType),
}

macro_rules! impl_from_type {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for DataType {
                fn from(ty: $ty) -> Self {
                    Self::$variant(ty)
                }
            }
        )*
    };
}

impl_from_type!(
    String(StringType),
    Char(CharType),
    Text(TextType),
    Citext(CitextType),
    Integer(IntegerType),
    Float(FloatType),
    Decimal(DecimalType),
    Boolean(BooleanType),
    Time(TimeType),
    Date(DateType),
    DateOnly(DateOnlyType),
    Uuid(UuidType),
    Blob(BlobType),
    Json(JsonType),
    Enum(EnumType),
    Range(RangeType),
    Array(ArrayType),
);

impl DataType {
    /// `VARCHAR(255)`.
    #[must_use]
    pub const fn string() -> Self {
        Self::String(StringType::new())
    }

    /// `VARCHAR(length)`.
    #[must_use]
    pub const fn varchar(length: u32) -> Self {
        Self::String(StringType::new().length(length))
    }

    /// `CHAR(length)`.
    #[must_use]
    pub const fn char(length: u32) -> Self {
        Self::Char(CharType::new().length(length))
    }

    /// `TEXT`.
    #[must_use]
    pub const fn text() -> Self {
        Self::Text(TextType::new())
    }

    /// `CITEXT`.
    #[must_use]
    pub const fn citext() -> Self {
        Self::Citext(CitextType)
    }

    /// `SMALLINT`.
    #[must_use]
    pub const fn smallint() -> Self {
        Self::Integer(IntegerType::smallint())
    }

    /// `INTEGER`.
    #[must_use]
    pub const fn integer() -> Self {
        Self::Integer(IntegerType::integer())
    }

    /// `BIGINT`.
    #[must_use]
    pub const fn bigint() -> Self {
        Self::Integer(IntegerType::bigint())
    }

    /// `FLOAT`.
    #[must_use]
    pub const fn float() -> Self {
        Self::Float(FloatType::float())
    }

    /// `DOUBLE PRECISION`.
    #[must_use]
    pub const fn double() -> Self {
        Self::Float(FloatType::double())
    }

    /// `DECIMAL(precision, scale)`.
    #[must_use]
    pub const fn decimal(precision: u32, scale: u32) -> Self {
        Self::Decimal(DecimalType::new().precision(precision).scale(scale))
    }

    /// `BOOLEAN`.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::Boolean(BooleanType)
    }

    /// `TIME`.
    #[must_use]
    pub const fn time() -> Self {
        Self::Time(TimeType::new())
    }

    /// Timestamp with time zone where available.
    #[must_use]
    pub const fn date() -> Self {
        Self::Date(DateType::new())
    }

    /// Calendar date.
    #[must_use]
    pub const fn date_only() -> Self {
        Self::DateOnly(DateOnlyType)
    }

    /// UUID of any version.
    #[must_use]
    pub const fn uuid() -> Self {
        Self::Uuid(UuidType::new())
    }

    /// `BLOB`.
    #[must_use]
    pub const fn blob() -> Self {
        Self::Blob(BlobType::new())
    }

    /// `JSON`.
    #[must_use]
    pub const fn json() -> Self {
        Self::Json(JsonType::json())
    }

    /// `JSONB`.
    #[must_use]
    pub const fn jsonb() -> Self {
        Self::Json(JsonType::jsonb())
    }

    /// `ENUM(values)`.
    pub fn enumeration<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnumType::new(values).map(Self::Enum)
    }

    /// `RANGE(subtype)`.
    #[must_use]
    pub fn range(subtype: Self) -> Self {
        Self::Range(RangeType::new(subtype))
    }

    /// `ARRAY(element)`.
    #[must_use]
    pub fn array(element: Self) -> Self {
        Self::Array(ArrayType::new(element))
    }

    /// Returns the override lookup key.
    #[must_use]
    pub fn key(&self) -> TypeKey {
        self.logical().key()
    }

    fn logical(&self) -> &dyn LogicalType {
        match self {
            Self::String(ty) => ty,
            Self::Char(ty) => ty,
            Self::Text(ty) => ty,
            Self::Citext(ty) => ty,
            Self::Integer(ty) => ty,
            Self::Float(ty) => ty,
            Self::Decimal(ty) => ty,
            Self::Boolean(ty) => ty,
            Self::Time(ty) => ty,
            Self::Date(ty) => ty,
            Self::DateOnly(ty) => ty,
            Self::Uuid(ty) => ty,
            Self::Blob(ty) => ty,
            Self::Json(ty) => ty,
            Self::Enum(ty) => ty,
            Self::Range(ty) => ty,
            Self::Array(ty) => ty,
        }
    }

    fn type_override(&self, dialect: &Escaper<'_>) -> Option<&'static TypeOverride> {
        let key = self.key();
        dialect
            .capabilities()
            .type_overrides
            .iter()
            .find(|o| o.key == key)
    }

    /// Renders the column type for `dialect`.
    pub fn to_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        self.type_override(dialect)
            .and_then(|o| o.to_sql)
            .map_or_else(|| self.logical().to_sql(dialect), |to_sql| to_sql(self, dialect))
    }

    /// Rejects a value the type cannot store. `Null` is accepted; whether
    /// a column allows it is the attribute's concern.
    pub fn validate(&self, value: &Value, dialect: &Escaper<'_>) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        self.type_override(dialect)
            .and_then(|o| o.validate)
            .map_or_else(
                || self.logical().validate(value, dialect),
                |validate| validate(self, value, dialect),
            )
    }

    /// Normalizes loosely typed input.
    pub fn sanitize(&self, value: Value, dialect: &Escaper<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(value);
        }
        self.logical().sanitize(value, dialect)
    }

    /// Converts a value into the primitive handed to the driver.
    pub fn to_bindable_value(&self, value: &Value, dialect: &Escaper<'_>) -> Result<Value> {
        self.type_override(dialect)
            .and_then(|o| o.to_bindable_value)
            .map_or_else(
                || self.logical().to_bindable_value(value, dialect),
                |to_bindable| to_bindable(self, value, dialect),
            )
    }

    /// Validates `value`, then renders it as an inline literal.
    pub fn escape(&self, value: &Value, dialect: &Escaper<'_>) -> Result<String> {
        self.validate(value, dialect)?;
        self.type_override(dialect)
            .and_then(|o| o.escape)
            .map_or_else(
                || self.logical().escape(value, dialect),
                |escape| escape(self, value, dialect),
            )
    }

    /// Converts a raw value read from the database.
    pub fn parse_database_value(&self, value: Value, dialect: &Escaper<'_>) -> Result<Value> {
        if value.is_null() {
            return Ok(value);
        }
        match self
            .type_override(dialect)
            .and_then(|o| o.parse_database_value)
        {
            Some(parse) => parse(self, value, dialect),
            None => self.logical().parse_database_value(value, dialect),
        }
    }

    /// Interprets a default value captured from the schema catalog.
    ///
    /// Returns `None` when no usable default can be determined.
    #[must_use]
    pub fn parse_default_value(
        &self,
        raw: Option<&str>,
        allow_null: bool,
        dialect: &Escaper<'_>,
    ) -> Option<DefaultValue> {
        default_value::parse_default_value(self, raw, allow_null, dialect)
    }

    /// Renders the generic, non-overridden column type.
    pub(crate) fn generic_sql(&self, dialect: &Escaper<'_>) -> Result<String> {
        self.logical().to_sql(dialect)
    }

    pub(crate) fn generic_to_bindable_value(
        &self,
        value: &Value,
        dialect: &Escaper<'_>,
    ) -> Result<Value> {
        self.logical().to_bindable_value(value, dialect)
    }
}

pub(crate) fn invalid_value(value: &Value, type_name: &str) -> DialectError {
    DialectError::validation(format!("{value:?} is not a valid {type_name}"))
}

pub(crate) fn require_support(
    supported: bool,
    dialect: &Escaper<'_>,
    feature: &str,
) -> Result<()> {
    if supported {
        Ok(())
    } else {
        Err(DialectError::unsupported(dialect.dialect_name(), feature))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::dialect;
    use super::*;
    use crate::capabilities::DialectKind;

    #[test]
    fn test_null_is_valid_for_every_type() {
        let pg = dialect(DialectKind::Postgres);
        for ty in [DataType::integer(), DataType::string(), DataType::json()] {
            assert!(ty.validate(&Value::Null, &pg).is_ok());
        }
    }

    #[test]
    fn test_override_lookup_changes_rendering_only_for_that_dialect() {
        let ty = DataType::blob();
        assert_eq!(ty.to_sql(&dialect(DialectKind::Postgres)).unwrap(), "BYTEA");
        assert_eq!(ty.to_sql(&dialect(DialectKind::MySql)).unwrap(), "BLOB");
        assert_eq!(
            ty.to_sql(&dialect(DialectKind::MsSql)).unwrap(),
            "VARBINARY(MAX)"
        );
    }

    #[test]
    fn test_escape_validates_first() {
        let pg = dialect(DialectKind::Postgres);
        let err = DataType::integer()
            .escape(&Value::Text(String::from("abc")), &pg)
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    }
}
