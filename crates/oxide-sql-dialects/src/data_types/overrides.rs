//! Per-dialect data type overrides.
//!
//! Each table is referenced from a dialect's capabilities. An override
//! replaces single behaviours of one logical type; whatever it leaves as
//! `None` falls through to the generic implementation.

use super::{BlobSize, DataType, DateType, FloatKind, IntegerKind, TextSize, TypeKey};
use crate::error::Result;
use crate::escape::Escaper;
use crate::value::Value;

/// Renders a column type.
pub type SqlFn = fn(&DataType, &Escaper<'_>) -> Result<String>;
/// Validates a non-null value.
pub type ValidateFn = fn(&DataType, &Value, &Escaper<'_>) -> Result<()>;
/// Converts a value for binding.
pub type BindFn = fn(&DataType, &Value, &Escaper<'_>) -> Result<Value>;
/// Renders a value inline.
pub type EscapeFn = fn(&DataType, &Value, &Escaper<'_>) -> Result<String>;
/// Converts a raw database value.
pub type ParseFn = fn(&DataType, Value, &Escaper<'_>) -> Result<Value>;

/// Dialect replacements for the behaviour of one logical type.
#[derive(Debug, Clone, Copy)]
pub struct TypeOverride {
    /// The overridden type.
    pub key: TypeKey,
    /// Column type rendering.
    pub to_sql: Option<SqlFn>,
    /// Value validation.
    pub validate: Option<ValidateFn>,
    /// Bindable conversion.
    pub to_bindable_value: Option<BindFn>,
    /// Inline literal rendering.
    pub escape: Option<EscapeFn>,
    /// Database value parsing.
    pub parse_database_value: Option<ParseFn>,
}

impl TypeOverride {
    /// An override that changes nothing yet.
    #[must_use]
    pub const fn new(key: TypeKey) -> Self {
        Self {
            key,
            to_sql: None,
            validate: None,
            to_bindable_value: None,
            escape: None,
            parse_database_value: None,
        }
    }

    /// Replaces column type rendering.
    #[must_use]
    pub const fn with_sql(mut self, f: SqlFn) -> Self {
        self.to_sql = Some(f);
        self
    }

    /// Replaces validation.
    #[must_use]
    pub const fn with_validate(mut self, f: ValidateFn) -> Self {
        self.validate = Some(f);
        self
    }

    /// Replaces the bindable conversion.
    #[must_use]
    pub const fn with_bindable(mut self, f: BindFn) -> Self {
        self.to_bindable_value = Some(f);
        self
    }

    /// Replaces inline rendering.
    #[must_use]
    pub const fn with_escape(mut self, f: EscapeFn) -> Self {
        self.escape = Some(f);
        self
    }

    /// Replaces database value parsing.
    #[must_use]
    pub const fn with_parse(mut self, f: ParseFn) -> Self {
        self.parse_database_value = Some(f);
        self
    }
}

const fn narrow_integer_name(kind: IntegerKind) -> &'static str {
    match kind {
        IntegerKind::TinyInt => "SMALLINT",
        IntegerKind::MediumInt => "INTEGER",
        other => other.sql_name(),
    }
}

fn narrow_integer_sql(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
    match ty {
        DataType::Integer(int) => int.render(d, narrow_integer_name),
        other => other.generic_sql(d),
    }
}

/// TINYINT is unsigned (0..=255) in SQL Server and HANA.
fn unsigned_tinyint_sql(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
    match ty {
        DataType::Integer(int) if int.kind == IntegerKind::TinyInt && int.unsigned => {
            Ok(String::from("TINYINT"))
        }
        other => narrow_integer_sql(other, d),
    }
}

const fn single_real(kind: FloatKind) -> &'static str {
    match kind {
        FloatKind::Float | FloatKind::Real => "REAL",
        FloatKind::Double => "DOUBLE PRECISION",
    }
}

const fn mssql_float_name(kind: FloatKind) -> &'static str {
    match kind {
        FloatKind::Float | FloatKind::Real => "REAL",
        FloatKind::Double => "FLOAT",
    }
}

const fn plain_double_name(kind: FloatKind) -> &'static str {
    match kind {
        FloatKind::Float | FloatKind::Real => "REAL",
        FloatKind::Double => "DOUBLE",
    }
}

fn float_sql(
    ty: &DataType,
    d: &Escaper<'_>,
    rename: fn(FloatKind) -> &'static str,
) -> Result<String> {
    match ty {
        DataType::Float(float) => float.render(d, rename),
        other => other.generic_sql(d),
    }
}

fn postgres_float_sql(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
    float_sql(ty, d, single_real)
}

fn mssql_float_sql(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
    float_sql(ty, d, mssql_float_name)
}

fn plain_double_sql(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
    float_sql(ty, d, plain_double_name)
}

fn fixed(sql: &'static str) -> Result<String> {
    Ok(String::from(sql))
}

fn date_sql(ty: &DataType, d: &Escaper<'_>, name: &str) -> Result<String> {
    match ty {
        DataType::Date(date) => Ok(date.with_precision(name)),
        other => other.generic_sql(d),
    }
}

fn naive_date_bindable(_ty: &DataType, value: &Value, d: &Escaper<'_>) -> Result<Value> {
    DateType::bindable(value, d, false)
}

fn string_length(ty: &DataType) -> (u32, bool) {
    match ty {
        DataType::String(s) => (s.effective_length(), s.binary),
        DataType::Char(c) => (c.effective_length(), c.binary),
        _ => (super::string::DEFAULT_LENGTH, false),
    }
}

fn text_size(ty: &DataType) -> Option<TextSize> {
    match ty {
        DataType::Text(text) => text.size,
        _ => None,
    }
}

fn blob_size(ty: &DataType) -> Option<BlobSize> {
    match ty {
        DataType::Blob(blob) => blob.size,
        _ => None,
    }
}

mod postgres {
    use super::{date_sql, fixed, Result};
    use crate::data_types::DataType;
    use crate::escape::Escaper;

    pub fn string(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
        match ty {
            DataType::String(s) if s.binary => fixed("BYTEA"),
            DataType::Char(c) if c.binary => fixed("BYTEA"),
            other => other.generic_sql(d),
        }
    }

    pub fn date(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
        Ok(format!("{} WITH TIME ZONE", date_sql(ty, d, "TIMESTAMP")?))
    }

    pub fn bytea(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("BYTEA")
    }

    pub fn uuid(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("UUID")
    }
}

pub(crate) const POSTGRES: &[TypeOverride] = &[
    TypeOverride::new(TypeKey::String).with_sql(postgres::string),
    TypeOverride::new(TypeKey::Char).with_sql(postgres::string),
    TypeOverride::new(TypeKey::Integer).with_sql(narrow_integer_sql),
    TypeOverride::new(TypeKey::Float).with_sql(postgres_float_sql),
    TypeOverride::new(TypeKey::Date).with_sql(postgres::date),
    TypeOverride::new(TypeKey::Blob).with_sql(postgres::bytea),
    TypeOverride::new(TypeKey::Uuid).with_sql(postgres::uuid),
];

mod mysql {
    use super::{fixed, Result};
    use crate::data_types::DataType;
    use crate::escape::Escaper;

    pub fn boolean(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("TINYINT(1)")
    }

    pub fn uuid(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("CHAR(36) BINARY")
    }
}

pub(crate) const MYSQL: &[TypeOverride] = &[
    TypeOverride::new(TypeKey::Boolean).with_sql(mysql::boolean),
    TypeOverride::new(TypeKey::Uuid).with_sql(mysql::uuid),
    TypeOverride::new(TypeKey::Date).with_bindable(naive_date_bindable),
];

mod mssql {
    use super::{date_sql, fixed, string_length, text_size, Result};
    use crate::data_types::{BlobSize, DataType, TextSize};
    use crate::escape::Escaper;

    pub fn string(ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        let (length, binary) = string_length(ty);
        Ok(match (ty, binary) {
            (DataType::Char(_), true) => format!("BINARY({length})"),
            (DataType::Char(_), false) => format!("NCHAR({length})"),
            (_, true) => format!("VARBINARY({length})"),
            (_, false) => format!("NVARCHAR({length})"),
        })
    }

    pub fn text(ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        match text_size(ty) {
            Some(TextSize::Tiny) => fixed("NVARCHAR(256)"),
            _ => fixed("NVARCHAR(MAX)"),
        }
    }

    pub fn boolean(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("BIT")
    }

    pub fn date(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
        date_sql(ty, d, "DATETIMEOFFSET")
    }

    pub fn blob(ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        match super::blob_size(ty) {
            Some(BlobSize::Tiny) => fixed("VARBINARY(256)"),
            _ => fixed("VARBINARY(MAX)"),
        }
    }

    pub fn uuid(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("UNIQUEIDENTIFIER")
    }

    pub fn json(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("NVARCHAR(MAX)")
    }
}

pub(crate) const MSSQL: &[TypeOverride] = &[
    TypeOverride::new(TypeKey::String).with_sql(mssql::string),
    TypeOverride::new(TypeKey::Char).with_sql(mssql::string),
    TypeOverride::new(TypeKey::Text).with_sql(mssql::text),
    TypeOverride::new(TypeKey::Integer).with_sql(unsigned_tinyint_sql),
    TypeOverride::new(TypeKey::Float).with_sql(mssql_float_sql),
    TypeOverride::new(TypeKey::Boolean).with_sql(mssql::boolean),
    TypeOverride::new(TypeKey::Date).with_sql(mssql::date),
    TypeOverride::new(TypeKey::Blob).with_sql(mssql::blob),
    TypeOverride::new(TypeKey::Uuid).with_sql(mssql::uuid),
    TypeOverride::new(TypeKey::Json).with_sql(mssql::json),
];

mod sqlite {
    use super::{fixed, string_length, Result};
    use crate::data_types::DataType;
    use crate::escape::Escaper;

    pub fn string(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
        match (ty, string_length(ty)) {
            (DataType::String(_), (length, true)) => Ok(format!("VARCHAR BINARY({length})")),
            (other, _) => other.generic_sql(d),
        }
    }

    pub fn boolean(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("TINYINT(1)")
    }

    pub fn date(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("DATETIME")
    }

    pub fn text(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("TEXT")
    }

    pub fn citext(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("TEXT COLLATE NOCASE")
    }
}

pub(crate) const SQLITE: &[TypeOverride] = &[
    TypeOverride::new(TypeKey::String).with_sql(sqlite::string),
    TypeOverride::new(TypeKey::Boolean).with_sql(sqlite::boolean),
    TypeOverride::new(TypeKey::Date).with_sql(sqlite::date),
    TypeOverride::new(TypeKey::Uuid).with_sql(sqlite::text),
    TypeOverride::new(TypeKey::Json).with_sql(sqlite::text),
    TypeOverride::new(TypeKey::Citext).with_sql(sqlite::citext),
];

/// Shared by Db2 for LUW and Db2 for IBM i.
mod db2 {
    use super::{blob_size, date_sql, fixed, string_length, text_size, Result};
    use crate::data_types::{BlobSize, DataType, TextSize};
    use crate::escape::Escaper;
    use crate::value::Value;

    pub fn string(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
        match string_length(ty) {
            (length, true) => Ok(match ty {
                DataType::Char(_) => format!("CHAR({length}) FOR BIT DATA"),
                _ => format!("VARCHAR({length}) FOR BIT DATA"),
            }),
            _ => ty.generic_sql(d),
        }
    }

    pub fn text(ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        match text_size(ty) {
            Some(TextSize::Tiny) => fixed("VARCHAR(256)"),
            Some(TextSize::Medium) => fixed("CLOB(16M)"),
            Some(TextSize::Long) => fixed("CLOB(2G)"),
            None => fixed("VARCHAR(32672)"),
        }
    }

    pub fn blob(ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        match blob_size(ty) {
            Some(BlobSize::Tiny) => fixed("BLOB(255)"),
            Some(BlobSize::Medium) => fixed("BLOB(16M)"),
            Some(BlobSize::Long) => fixed("BLOB(2G)"),
            None => fixed("BLOB(1M)"),
        }
    }

    pub fn uuid(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("CHAR(36) FOR BIT DATA")
    }

    pub fn date(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
        date_sql(ty, d, "TIMESTAMP")
    }

    /// Db2 for LUW stores booleans as `SMALLINT` 0/1.
    pub fn boolean(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("SMALLINT")
    }

    pub fn boolean_bindable(_ty: &DataType, value: &Value, _d: &Escaper<'_>) -> Result<Value> {
        Ok(match value {
            Value::Bool(b) => Value::Int(i64::from(*b)),
            other => other.clone(),
        })
    }

    pub fn escape_boolean(ty: &DataType, value: &Value, d: &Escaper<'_>) -> Result<String> {
        d.escape_primitive(&boolean_bindable(ty, value, d)?)
    }
}

macro_rules! db2_family {
    ($($extra:expr),* $(,)?) => {
        &[
            TypeOverride::new(TypeKey::String).with_sql(db2::string),
            TypeOverride::new(TypeKey::Char).with_sql(db2::string),
            TypeOverride::new(TypeKey::Text).with_sql(db2::text),
            TypeOverride::new(TypeKey::Integer).with_sql(narrow_integer_sql),
            TypeOverride::new(TypeKey::Float).with_sql(plain_double_sql),
            TypeOverride::new(TypeKey::Blob).with_sql(db2::blob),
            TypeOverride::new(TypeKey::Uuid).with_sql(db2::uuid),
            TypeOverride::new(TypeKey::Date)
                .with_sql(db2::date)
                .with_bindable(naive_date_bindable),
            $($extra,)*
        ]
    };
}

pub(crate) const DB2: &[TypeOverride] = db2_family![TypeOverride::new(TypeKey::Boolean)
    .with_sql(db2::boolean)
    .with_bindable(db2::boolean_bindable)
    .with_escape(db2::escape_boolean)];

pub(crate) const IBMI: &[TypeOverride] = db2_family![];

mod snowflake {
    use super::{date_sql, fixed, Result};
    use crate::data_types::{DataType, IntegerKind};
    use crate::escape::Escaper;
    use crate::value::Value;

    pub fn integer(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
        const fn rename(kind: IntegerKind) -> &'static str {
            match kind {
                IntegerKind::MediumInt => "INTEGER",
                other => other.sql_name(),
            }
        }
        match ty {
            DataType::Integer(int) => int.render(d, rename),
            other => other.generic_sql(d),
        }
    }

    pub fn blob(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("BINARY")
    }

    pub fn uuid(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("VARCHAR(36)")
    }

    pub fn json(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("VARIANT")
    }

    /// VARIANT literals are strings passed through `PARSE_JSON`.
    pub fn escape_json(ty: &DataType, value: &Value, d: &Escaper<'_>) -> Result<String> {
        match ty.to_bindable_value(value, d)? {
            Value::Text(text) => Ok(format!("PARSE_JSON({})", d.escape_string(&text)?)),
            other => d.escape_primitive(&other),
        }
    }

    pub fn date(ty: &DataType, d: &Escaper<'_>) -> Result<String> {
        date_sql(ty, d, "TIMESTAMP")
    }
}

pub(crate) const SNOWFLAKE: &[TypeOverride] = &[
    TypeOverride::new(TypeKey::Integer).with_sql(snowflake::integer),
    TypeOverride::new(TypeKey::Blob).with_sql(snowflake::blob),
    TypeOverride::new(TypeKey::Uuid).with_sql(snowflake::uuid),
    TypeOverride::new(TypeKey::Json)
        .with_sql(snowflake::json)
        .with_escape(snowflake::escape_json),
    TypeOverride::new(TypeKey::Date)
        .with_sql(snowflake::date)
        .with_bindable(naive_date_bindable),
];

mod hana {
    use super::{fixed, string_length, Result};
    use crate::data_types::DataType;
    use crate::escape::Escaper;

    pub fn string(ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        let (length, binary) = string_length(ty);
        Ok(match (ty, binary) {
            (DataType::Char(_), true) => format!("BINARY({length})"),
            (DataType::Char(_), false) => format!("NCHAR({length})"),
            (_, true) => format!("VARBINARY({length})"),
            (_, false) => format!("NVARCHAR({length})"),
        })
    }

    pub fn text(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("NCLOB")
    }

    pub fn blob(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("BLOB")
    }

    pub fn uuid(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("NVARCHAR(36)")
    }

    pub fn date(_ty: &DataType, _d: &Escaper<'_>) -> Result<String> {
        fixed("TIMESTAMP")
    }
}

pub(crate) const HANA: &[TypeOverride] = &[
    TypeOverride::new(TypeKey::String).with_sql(hana::string),
    TypeOverride::new(TypeKey::Char).with_sql(hana::string),
    TypeOverride::new(TypeKey::Text).with_sql(hana::text),
    TypeOverride::new(TypeKey::Integer).with_sql(unsigned_tinyint_sql),
    TypeOverride::new(TypeKey::Float).with_sql(plain_double_sql),
    TypeOverride::new(TypeKey::Blob).with_sql(hana::blob),
    TypeOverride::new(TypeKey::Uuid).with_sql(hana::uuid),
    TypeOverride::new(TypeKey::Date)
        .with_sql(hana::date)
        .with_bindable(naive_date_bindable),
];

#[cfg(test)]
mod tests {
    use super::super::test_support::dialect;
    use super::super::{BlobType, CharType, IntegerType, TextType};
    use super::*;
    use crate::capabilities::DialectKind;

    #[test]
    fn test_every_table_has_unique_keys() {
        for table in [POSTGRES, MYSQL, MSSQL, SQLITE, DB2, SNOWFLAKE, IBMI, HANA] {
            for (i, o) in table.iter().enumerate() {
                assert!(table[i + 1..].iter().all(|other| other.key != o.key));
            }
        }
    }

    #[test]
    fn test_mssql_names() {
        let mssql = dialect(DialectKind::MsSql);
        assert_eq!(
            DataType::from(TextType::new().size(TextSize::Tiny))
                .to_sql(&mssql)
                .unwrap(),
            "NVARCHAR(256)"
        );
        assert_eq!(
            DataType::from(CharType::new().length(4).binary())
                .to_sql(&mssql)
                .unwrap(),
            "BINARY(4)"
        );
        assert_eq!(DataType::json().to_sql(&mssql).unwrap(), "NVARCHAR(MAX)");
    }

    #[test]
    fn test_db2_family_names() {
        for kind in [DialectKind::Db2, DialectKind::Ibmi] {
            let d = dialect(kind);
            assert_eq!(DataType::blob().to_sql(&d).unwrap(), "BLOB(1M)");
            assert_eq!(
                DataType::from(BlobType::new().size(BlobSize::Long))
                    .to_sql(&d)
                    .unwrap(),
                "BLOB(2G)"
            );
            assert_eq!(DataType::text().to_sql(&d).unwrap(), "VARCHAR(32672)");
            assert_eq!(
                DataType::from(IntegerType::mediumint()).to_sql(&d).unwrap(),
                "INTEGER"
            );
            assert_eq!(DataType::double().to_sql(&d).unwrap(), "DOUBLE");
            assert_eq!(
                DataType::from(DateType::new().precision(6)).to_sql(&d).unwrap(),
                "TIMESTAMP(6)"
            );
        }
    }

    #[test]
    fn test_naive_timestamps_drop_offset() {
        let value = Value::Text(String::from("2024-01-02 03:04:05+00:00"));
        for kind in [DialectKind::Db2, DialectKind::Snowflake, DialectKind::Hana] {
            assert_eq!(
                DataType::date()
                    .to_bindable_value(&value, &dialect(kind))
                    .unwrap(),
                Value::Text(String::from("2024-01-02 03:04:05.000"))
            );
        }
    }

    #[test]
    fn test_db2_boolean_is_smallint() {
        let db2 = dialect(DialectKind::Db2);
        assert_eq!(DataType::boolean().to_sql(&db2).unwrap(), "SMALLINT");
        assert_eq!(DataType::boolean().escape(&Value::Bool(true), &db2).unwrap(), "1");
        assert_eq!(
            DataType::boolean()
                .to_sql(&dialect(DialectKind::Ibmi))
                .unwrap(),
            "BOOLEAN"
        );
    }

    #[test]
    fn test_snowflake_variant() {
        let d = dialect(DialectKind::Snowflake);
        assert_eq!(DataType::json().to_sql(&d).unwrap(), "VARIANT");
        assert_eq!(
            DataType::json()
                .escape(&Value::Json(serde_json::json!([1, 2])), &d)
                .unwrap(),
            "PARSE_JSON('[1,2]')"
        );
    }

    #[test]
    fn test_hana_names() {
        let d = dialect(DialectKind::Hana);
        assert_eq!(DataType::text().to_sql(&d).unwrap(), "NCLOB");
        assert_eq!(DataType::uuid().to_sql(&d).unwrap(), "NVARCHAR(36)");
        assert_eq!(
            DataType::from(IntegerType::tinyint().unsigned())
                .to_sql(&d)
                .unwrap(),
            "TINYINT"
        );
    }

    #[test]
    fn test_sqlite_binary_string() {
        let d = dialect(DialectKind::Sqlite);
        assert_eq!(
            DataType::from(super::super::StringType::new().length(8).binary())
                .to_sql(&d)
                .unwrap(),
            "VARCHAR BINARY(8)"
        );
        assert_eq!(DataType::uuid().to_sql(&d).unwrap(), "TEXT");
    }
}
