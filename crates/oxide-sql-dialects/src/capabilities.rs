//! Per-dialect capability registry.
//!
//! Every difference between backends that can be expressed as data lives
//! here: quote characters, literal styles, schema handling, feature flags
//! and the option keys each operation accepts. Generators and the option
//! validator read these tables and never branch on the dialect name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data_types::overrides;
use crate::data_types::TypeOverride;
use crate::error::DialectError;

/// The SQL backends this crate generates SQL for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    /// PostgreSQL.
    Postgres,
    /// MySQL.
    #[serde(rename = "mysql")]
    MySql,
    /// MariaDB.
    #[serde(rename = "mariadb")]
    MariaDb,
    /// Microsoft SQL Server.
    #[serde(rename = "mssql")]
    MsSql,
    /// SQLite.
    Sqlite,
    /// IBM Db2 for LUW.
    Db2,
    /// Snowflake.
    Snowflake,
    /// Db2 for IBM i.
    Ibmi,
    /// SAP HANA.
    Hana,
}

impl DialectKind {
    /// All known dialects.
    pub const ALL: [Self; 9] = [
        Self::Postgres,
        Self::MySql,
        Self::MariaDb,
        Self::MsSql,
        Self::Sqlite,
        Self::Db2,
        Self::Snowflake,
        Self::Ibmi,
        Self::Hana,
    ];

    /// Returns the dialect name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::MariaDb => "mariadb",
            Self::MsSql => "mssql",
            Self::Sqlite => "sqlite",
            Self::Db2 => "db2",
            Self::Snowflake => "snowflake",
            Self::Ibmi => "ibmi",
            Self::Hana => "hana",
        }
    }

    /// Returns the static capability table of this dialect.
    #[must_use]
    pub fn capabilities(self) -> &'static DialectCapabilities {
        match self {
            Self::Postgres => &POSTGRES,
            Self::MySql => &MYSQL,
            Self::MariaDb => &MARIADB,
            Self::MsSql => &MSSQL,
            Self::Sqlite => &SQLITE,
            Self::Db2 => &DB2,
            Self::Snowflake => &SNOWFLAKE,
            Self::Ibmi => &IBMI,
            Self::Hana => &HANA,
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialectKind {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DialectError::invalid(format!("unknown dialect '{s}'")))
    }
}

/// Opening and closing identifier quote characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteStyle {
    /// Opening quote.
    pub open: char,
    /// Closing quote. Embedded occurrences are doubled.
    pub close: char,
}

impl QuoteStyle {
    /// Same character on both sides.
    #[must_use]
    pub const fn symmetric(quote: char) -> Self {
        Self {
            open: quote,
            close: quote,
        }
    }
}

/// How a table reference with a schema is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStrategy {
    /// `"schema"."table"`.
    Qualified,
    /// The schema is prefixed onto the table name inside one identifier:
    /// `` `schema.table` ``.
    Folded,
}

/// How string literals are escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringLiteralStyle {
    /// Single quotes doubled.
    Standard,
    /// Single quotes doubled; NUL bytes rejected.
    NoNul,
    /// MySQL-style backslash escapes.
    Backslash,
    /// Single quotes doubled inside an `N'...'` literal.
    National,
}

/// How byte strings are rendered inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryLiteralStyle {
    /// `X'0a0b'`.
    HexString,
    /// `'\x0a0b'`.
    Bytea,
    /// `0x0a0b`.
    HexNumber,
}

/// How booleans are rendered inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanLiteralStyle {
    /// `true` / `false`.
    Keywords,
    /// `1` / `0`.
    Integers,
}

/// Placeholder syntax for bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindParamStyle {
    /// `$1`, `$2`, ...
    Dollar,
    /// `?`
    Question,
    /// `@p1`, `@p2`, ...
    AtNamed,
}

/// Row-returning clause of INSERT/UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturningStyle {
    /// Not available.
    Unsupported,
    /// `RETURNING *`
    Returning,
    /// `OUTPUT INSERTED.*`
    Output,
}

/// Upsert syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStyle {
    /// Not available.
    Unsupported,
    /// `ON CONFLICT (...) DO UPDATE SET c=EXCLUDED.c`
    OnConflict,
    /// `ON DUPLICATE KEY UPDATE c=VALUES(c)`
    OnDuplicateKey,
}

/// How an INSERT that skips duplicate rows is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreDuplicatesStyle {
    /// Not available.
    Unsupported,
    /// A keyword placed after `INSERT`, e.g. `IGNORE` or `OR IGNORE`.
    Keyword(&'static str),
    /// `ON CONFLICT DO NOTHING`
    OnConflictDoNothing,
}

/// How an INSERT without any value is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyInsertStyle {
    /// `DEFAULT VALUES`
    DefaultValues,
    /// `VALUES ()`
    EmptyValues,
    /// Not available.
    Unsupported,
}

/// LIMIT / OFFSET syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitStyle {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    OffsetFetch,
}

/// JSON path extraction syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonExtractionStyle {
    /// No JSON operations.
    Unsupported,
    /// `->`, `->>`, `#>`, `#>>`
    PathOperators,
    /// `json_extract(col, '$.a')`, unquoted through `json_unquote(...)`.
    ExtractUnquoteFunction,
    /// `json_extract(col, '$.a')`, unquoted through `col->>'$.a'`.
    ExtractArrow,
    /// `JSON_VALUE(col, '$.a')`, only available unquoted.
    JsonValue,
}

/// How auto-increment columns are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoIncrementStyle {
    /// A keyword appended to the column, e.g. `AUTO_INCREMENT`.
    Keyword(&'static str),
    /// The integer type is replaced by `SERIAL` / `BIGSERIAL`.
    Serial,
    /// `INTEGER PRIMARY KEY AUTOINCREMENT`.
    RowidAlias,
    /// An identity clause appended to the column.
    Identity(&'static str),
}

/// How ENUM columns are declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumStrategy {
    /// `ENUM('a', 'b')`.
    Inline,
    /// A separately created named type.
    NamedType,
    /// A string column with a `CHECK (col IN (...))` constraint.
    Check,
}

/// How transactions are controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionControl {
    /// Through SQL statements; `use_begin` selects `BEGIN` over `START`.
    Statements {
        /// Whether `BEGIN TRANSACTION` is used instead of `START TRANSACTION`.
        use_begin: bool,
    },
    /// Through the driver's connection API; no SQL is generated.
    Connection,
}

/// Data-type related feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct DataTypeSupport {
    /// `UNSIGNED` on numeric types.
    pub unsigned: bool,
    /// `ZEROFILL` on numeric types.
    pub zerofill: bool,
    /// A JSON type.
    pub json: bool,
    /// A JSONB type.
    pub jsonb: bool,
    /// Range types.
    pub range: bool,
    /// Array types.
    pub array: bool,
    /// CITEXT.
    pub citext: bool,
    /// `TIME(p)`.
    pub time_precision: bool,
    /// `infinity` in date columns.
    pub date_infinity: bool,
    /// NaN and infinities in floating point columns.
    pub float_non_finite: bool,
    /// DECIMAL without precision.
    pub decimal_unconstrained: bool,
    /// Display width on integers, e.g. `INTEGER(11)`, and precision on
    /// floats.
    pub integer_display_width: bool,
    /// TINY / MEDIUM / LONG variants of TEXT and BLOB.
    pub sized_lobs: bool,
    /// ENUM declaration strategy.
    pub enums: EnumStrategy,
}

/// An operation that accepts an options bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// CREATE TABLE.
    CreateTable,
    /// ALTER TABLE ... ADD COLUMN.
    AddColumn,
    /// DROP TABLE.
    DropTable,
    /// List user tables.
    ListTables,
    /// List user schemas.
    ListSchemas,
    /// List databases.
    ListDatabases,
    /// ALTER TABLE ... DROP COLUMN.
    RemoveColumn,
    /// ALTER TABLE ... ADD CONSTRAINT.
    AddConstraint,
    /// ALTER TABLE ... DROP CONSTRAINT.
    RemoveConstraint,
    /// CREATE INDEX.
    AddIndex,
    /// DROP INDEX.
    RemoveIndex,
    /// Rename a table.
    RenameTable,
    /// List constraints of a table.
    ShowConstraints,
    /// Start a transaction.
    StartTransaction,
    /// TRUNCATE.
    Truncate,
    /// Quote a table reference.
    QuoteTable,
    /// CREATE SCHEMA.
    CreateSchema,
    /// DROP SCHEMA.
    DropSchema,
    /// INSERT.
    Insert,
    /// UPDATE.
    Update,
    /// DELETE.
    BulkDelete,
}

impl Operation {
    /// Name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateTable => "createTableQuery",
            Self::AddColumn => "addColumnQuery",
            Self::DropTable => "dropTableQuery",
            Self::ListTables => "listTablesQuery",
            Self::ListSchemas => "listSchemasQuery",
            Self::ListDatabases => "listDatabasesQuery",
            Self::RemoveColumn => "removeColumnQuery",
            Self::AddConstraint => "addConstraintQuery",
            Self::RemoveConstraint => "removeConstraintQuery",
            Self::AddIndex => "addIndexQuery",
            Self::RemoveIndex => "removeIndexQuery",
            Self::RenameTable => "renameTableQuery",
            Self::ShowConstraints => "showConstraintsQuery",
            Self::StartTransaction => "startTransactionQuery",
            Self::Truncate => "truncateTableQuery",
            Self::QuoteTable => "quoteTable",
            Self::CreateSchema => "createSchemaQuery",
            Self::DropSchema => "dropSchemaQuery",
            Self::Insert => "insertQuery",
            Self::Update => "updateQuery",
            Self::BulkDelete => "bulkDeleteQuery",
        }
    }
}

/// A key of an options bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// Collation.
    Collate,
    /// Character set.
    Charset,
    /// Storage engine.
    Engine,
    /// Row format.
    RowFormat,
    /// Comment.
    Comment,
    /// Initial AUTO_INCREMENT value.
    InitialAutoIncrement,
    /// Composite unique keys.
    UniqueKeys,
    /// IF NOT EXISTS.
    IfNotExists,
    /// IF EXISTS.
    IfExists,
    /// CASCADE.
    Cascade,
    /// Schema filter.
    Schema,
    /// Names to skip.
    Skip,
    /// Allow moving a table to another schema.
    ChangeSchema,
    /// Column filter.
    ColumnName,
    /// Constraint name filter.
    ConstraintName,
    /// Constraint type filter.
    ConstraintType,
    /// READ ONLY transaction.
    ReadOnly,
    /// DEFERRED / IMMEDIATE / EXCLUSIVE transaction.
    TransactionType,
    /// RESTART IDENTITY.
    RestartIdentity,
    /// MySQL index hints.
    IndexHints,
    /// MSSQL table hints.
    TableHints,
    /// Schema owner.
    Authorization,
    /// OR REPLACE.
    Replace,
    /// CONCURRENTLY.
    Concurrently,
    /// Index method (USING).
    Using,
    /// Index operator class.
    Operator,
    /// Partial index predicate.
    Where,
    /// Covering index columns.
    Include,
    /// Index type (FULLTEXT, SPATIAL).
    Type,
    /// Full-text parser.
    Parser,
    /// Index prefix length on fields.
    Length,
    /// RETURNING.
    Returning,
    /// Skip duplicate rows.
    IgnoreDuplicates,
    /// Upsert columns.
    UpdateOnDuplicate,
    /// Upsert conflict target columns.
    ConflictFields,
    /// Upsert conflict predicate.
    ConflictWhere,
    /// LIMIT.
    Limit,
    /// DEFERRABLE constraint.
    Deferrable,
}

impl OptionKey {
    /// Name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Collate => "collate",
            Self::Charset => "charset",
            Self::Engine => "engine",
            Self::RowFormat => "rowFormat",
            Self::Comment => "comment",
            Self::InitialAutoIncrement => "initialAutoIncrement",
            Self::UniqueKeys => "uniqueKeys",
            Self::IfNotExists => "ifNotExists",
            Self::IfExists => "ifExists",
            Self::Cascade => "cascade",
            Self::Schema => "schema",
            Self::Skip => "skip",
            Self::ChangeSchema => "changeSchema",
            Self::ColumnName => "columnName",
            Self::ConstraintName => "constraintName",
            Self::ConstraintType => "constraintType",
            Self::ReadOnly => "readOnly",
            Self::TransactionType => "transactionType",
            Self::RestartIdentity => "restartIdentity",
            Self::IndexHints => "indexHints",
            Self::TableHints => "tableHints",
            Self::Authorization => "authorization",
            Self::Replace => "replace",
            Self::Concurrently => "concurrently",
            Self::Using => "using",
            Self::Operator => "operator",
            Self::Where => "where",
            Self::Include => "include",
            Self::Type => "type",
            Self::Parser => "parser",
            Self::Length => "length",
            Self::Returning => "returning",
            Self::IgnoreDuplicates => "ignoreDuplicates",
            Self::UpdateOnDuplicate => "updateOnDuplicate",
            Self::ConflictFields => "conflictFields",
            Self::ConflictWhere => "conflictWhere",
            Self::Limit => "limit",
            Self::Deferrable => "deferrable",
        }
    }
}

/// Immutable description of what a dialect supports.
#[derive(Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct DialectCapabilities {
    /// Dialect name.
    pub name: &'static str,
    /// Identifier quotes.
    pub identifier_quote: QuoteStyle,
    /// String literal escaping.
    pub string_literals: StringLiteralStyle,
    /// Byte string literals.
    pub binary_literals: BinaryLiteralStyle,
    /// Boolean literals.
    pub boolean_literals: BooleanLiteralStyle,
    /// Bind parameter placeholders.
    pub bind_params: BindParamStyle,
    /// Whether schemas exist as namespaces.
    pub schemas: bool,
    /// How schema-qualified table references are rendered.
    pub schema_strategy: SchemaStrategy,
    /// Schema used when none is given. `None` means the connection's
    /// current schema.
    pub default_schema: Option<&'static str>,
    /// SQL expression evaluating to the current schema.
    pub current_schema_sql: &'static str,
    /// Schemas owned by the database itself.
    pub technical_schemas: &'static [&'static str],
    /// Databases owned by the server itself.
    pub technical_databases: &'static [&'static str],
    /// Whether databases can be listed and created.
    pub multi_databases: bool,
    /// Maximum identifier length, if the dialect enforces one.
    pub max_identifier_length: Option<usize>,
    /// RETURNING clause.
    pub returning: ReturningStyle,
    /// Upserts.
    pub upserts: UpsertStyle,
    /// Duplicate skipping inserts.
    pub ignore_duplicates: IgnoreDuplicatesStyle,
    /// Inserts without values.
    pub empty_insert: EmptyInsertStyle,
    /// LIMIT / OFFSET.
    pub limit: LimitStyle,
    /// LIMIT in UPDATE.
    pub update_limit: bool,
    /// LIMIT in DELETE.
    pub delete_limit: bool,
    /// JSON path extraction.
    pub json_extraction: JsonExtractionStyle,
    /// Auto-increment columns.
    pub auto_increment: AutoIncrementStyle,
    /// Transaction statements.
    pub transactions: TransactionControl,
    /// SAVEPOINT.
    pub savepoints: bool,
    /// SET TRANSACTION ISOLATION LEVEL.
    pub isolation_levels: bool,
    /// DEFERRABLE constraints.
    pub deferrable_constraints: bool,
    /// ALTER TABLE ... ADD CONSTRAINT.
    pub add_constraint: bool,
    /// ALTER TABLE ... DROP CONSTRAINT.
    pub remove_constraint: bool,
    /// ALTER TABLE ... DROP COLUMN.
    pub remove_column: bool,
    /// DEFAULT constraints (`CONSTRAINT n DEFAULT v FOR c`).
    pub default_constraint: bool,
    /// ON UPDATE on foreign keys.
    pub foreign_key_on_update: bool,
    /// Indexes at all.
    pub indexes: bool,
    /// Whether `USING method` follows the table name (otherwise the name).
    pub index_using_after_table: bool,
    /// Data type features.
    pub data_types: DataTypeSupport,
    /// Data type overrides, looked up by type key.
    pub type_overrides: &'static [TypeOverride],
    /// Supported option keys, per operation.
    pub options: &'static [(Operation, &'static [OptionKey])],
}

impl DialectCapabilities {
    /// Returns the option keys the dialect accepts for `operation`.
    #[must_use]
    pub fn supported_options(&self, operation: Operation) -> &'static [OptionKey] {
        self.options
            .iter()
            .find(|(op, _)| *op == operation)
            .map_or(&[], |(_, keys)| *keys)
    }

    /// Returns whether the dialect accepts `key` for `operation`.
    #[must_use]
    pub fn supports(&self, operation: Operation, key: OptionKey) -> bool {
        self.supported_options(operation).contains(&key)
    }

    /// Returns the identifier quote characters.
    #[must_use]
    pub const fn identifier_quote_style(&self) -> QuoteStyle {
        self.identifier_quote
    }
}

const BASE_DATA_TYPES: DataTypeSupport = DataTypeSupport {
    unsigned: false,
    zerofill: false,
    json: false,
    jsonb: false,
    range: false,
    array: false,
    citext: false,
    time_precision: true,
    date_infinity: false,
    float_non_finite: false,
    decimal_unconstrained: false,
    integer_display_width: false,
    sized_lobs: false,
    enums: EnumStrategy::Check,
};

const BASE: DialectCapabilities = DialectCapabilities {
    name: "abstract",
    identifier_quote: QuoteStyle::symmetric('"'),
    string_literals: StringLiteralStyle::Standard,
    binary_literals: BinaryLiteralStyle::HexString,
    boolean_literals: BooleanLiteralStyle::Keywords,
    bind_params: BindParamStyle::Question,
    schemas: true,
    schema_strategy: SchemaStrategy::Qualified,
    default_schema: None,
    current_schema_sql: "CURRENT SCHEMA",
    technical_schemas: &[],
    technical_databases: &[],
    multi_databases: false,
    max_identifier_length: Some(128),
    returning: ReturningStyle::Unsupported,
    upserts: UpsertStyle::Unsupported,
    ignore_duplicates: IgnoreDuplicatesStyle::Unsupported,
    empty_insert: EmptyInsertStyle::DefaultValues,
    limit: LimitStyle::LimitOffset,
    update_limit: false,
    delete_limit: false,
    json_extraction: JsonExtractionStyle::Unsupported,
    auto_increment: AutoIncrementStyle::Identity(
        "GENERATED BY DEFAULT AS IDENTITY(START WITH 1, INCREMENT BY 1)",
    ),
    transactions: TransactionControl::Statements { use_begin: false },
    savepoints: true,
    isolation_levels: true,
    deferrable_constraints: false,
    add_constraint: true,
    remove_constraint: true,
    remove_column: true,
    default_constraint: false,
    foreign_key_on_update: true,
    indexes: true,
    index_using_after_table: true,
    data_types: BASE_DATA_TYPES,
    type_overrides: &[],
    options: &[],
};

const SHOW_CONSTRAINTS_FILTERS: &[OptionKey] = &[
    OptionKey::ColumnName,
    OptionKey::ConstraintName,
    OptionKey::ConstraintType,
];

/// PostgreSQL.
pub static POSTGRES: DialectCapabilities = DialectCapabilities {
    name: "postgres",
    string_literals: StringLiteralStyle::NoNul,
    binary_literals: BinaryLiteralStyle::Bytea,
    bind_params: BindParamStyle::Dollar,
    default_schema: Some("public"),
    current_schema_sql: "CURRENT_SCHEMA()",
    technical_schemas: &["information_schema", "tiger", "tiger_data", "topology"],
    technical_databases: &["postgres"],
    multi_databases: true,
    max_identifier_length: Some(63),
    returning: ReturningStyle::Returning,
    upserts: UpsertStyle::OnConflict,
    ignore_duplicates: IgnoreDuplicatesStyle::OnConflictDoNothing,
    json_extraction: JsonExtractionStyle::PathOperators,
    auto_increment: AutoIncrementStyle::Serial,
    deferrable_constraints: true,
    data_types: DataTypeSupport {
        json: true,
        jsonb: true,
        range: true,
        array: true,
        citext: true,
        date_infinity: true,
        float_non_finite: true,
        decimal_unconstrained: true,
        enums: EnumStrategy::NamedType,
        ..BASE_DATA_TYPES
    },
    type_overrides: overrides::POSTGRES,
    options: &[
        (
            Operation::CreateTable,
            &[OptionKey::Comment, OptionKey::UniqueKeys],
        ),
        (Operation::AddColumn, &[OptionKey::IfNotExists]),
        (Operation::DropTable, &[OptionKey::Cascade]),
        (Operation::ListTables, &[OptionKey::Schema]),
        (Operation::ListSchemas, &[OptionKey::Skip]),
        (Operation::ListDatabases, &[OptionKey::Skip]),
        (
            Operation::RemoveColumn,
            &[OptionKey::IfExists, OptionKey::Cascade],
        ),
        (Operation::AddConstraint, &[OptionKey::Deferrable]),
        (
            Operation::RemoveConstraint,
            &[OptionKey::IfExists, OptionKey::Cascade],
        ),
        (
            Operation::AddIndex,
            &[
                OptionKey::Concurrently,
                OptionKey::IfNotExists,
                OptionKey::Using,
                OptionKey::Operator,
                OptionKey::Where,
                OptionKey::Include,
                OptionKey::Collate,
            ],
        ),
        (
            Operation::RemoveIndex,
            &[
                OptionKey::Concurrently,
                OptionKey::IfExists,
                OptionKey::Cascade,
            ],
        ),
        (Operation::RenameTable, &[OptionKey::ChangeSchema]),
        (Operation::ShowConstraints, SHOW_CONSTRAINTS_FILTERS),
        (Operation::StartTransaction, &[OptionKey::ReadOnly]),
        (
            Operation::Truncate,
            &[OptionKey::Cascade, OptionKey::RestartIdentity],
        ),
        (
            Operation::CreateSchema,
            &[OptionKey::Authorization, OptionKey::IfNotExists],
        ),
        (
            Operation::DropSchema,
            &[OptionKey::Cascade, OptionKey::IfExists],
        ),
        (
            Operation::Insert,
            &[
                OptionKey::Returning,
                OptionKey::IgnoreDuplicates,
                OptionKey::UpdateOnDuplicate,
                OptionKey::ConflictFields,
                OptionKey::ConflictWhere,
            ],
        ),
        (Operation::Update, &[OptionKey::Returning]),
    ],
    ..BASE
};

const MYSQL_TECHNICAL_SCHEMAS: &[&str] = &[
    "MYSQL",
    "INFORMATION_SCHEMA",
    "PERFORMANCE_SCHEMA",
    "SYS",
    "mysql",
    "information_schema",
    "performance_schema",
    "sys",
];

const MYSQL_DATA_TYPES: DataTypeSupport = DataTypeSupport {
    unsigned: true,
    zerofill: true,
    json: true,
    integer_display_width: true,
    sized_lobs: true,
    enums: EnumStrategy::Inline,
    ..BASE_DATA_TYPES
};

const MYSQL_BASE: DialectCapabilities = DialectCapabilities {
    name: "mysql",
    identifier_quote: QuoteStyle::symmetric('`'),
    string_literals: StringLiteralStyle::Backslash,
    current_schema_sql: "DATABASE()",
    technical_schemas: MYSQL_TECHNICAL_SCHEMAS,
    max_identifier_length: Some(64),
    upserts: UpsertStyle::OnDuplicateKey,
    ignore_duplicates: IgnoreDuplicatesStyle::Keyword("IGNORE"),
    empty_insert: EmptyInsertStyle::EmptyValues,
    update_limit: true,
    delete_limit: true,
    json_extraction: JsonExtractionStyle::ExtractUnquoteFunction,
    auto_increment: AutoIncrementStyle::Keyword("AUTO_INCREMENT"),
    default_constraint: false,
    index_using_after_table: false,
    data_types: MYSQL_DATA_TYPES,
    type_overrides: overrides::MYSQL,
    options: &[
        (
            Operation::CreateTable,
            &[
                OptionKey::Collate,
                OptionKey::Charset,
                OptionKey::Engine,
                OptionKey::RowFormat,
                OptionKey::Comment,
                OptionKey::InitialAutoIncrement,
                OptionKey::UniqueKeys,
            ],
        ),
        (Operation::ListTables, &[OptionKey::Schema]),
        (Operation::ListSchemas, &[OptionKey::Skip]),
        (
            Operation::AddIndex,
            &[
                OptionKey::Type,
                OptionKey::Using,
                OptionKey::Parser,
                OptionKey::Length,
            ],
        ),
        (Operation::RenameTable, &[OptionKey::ChangeSchema]),
        (Operation::ShowConstraints, SHOW_CONSTRAINTS_FILTERS),
        (Operation::StartTransaction, &[OptionKey::ReadOnly]),
        (Operation::QuoteTable, &[OptionKey::IndexHints]),
        (
            Operation::CreateSchema,
            &[
                OptionKey::Charset,
                OptionKey::Collate,
                OptionKey::IfNotExists,
            ],
        ),
        (Operation::DropSchema, &[OptionKey::IfExists]),
        (
            Operation::Insert,
            &[OptionKey::IgnoreDuplicates, OptionKey::UpdateOnDuplicate],
        ),
        (Operation::Update, &[OptionKey::Limit]),
        (Operation::BulkDelete, &[OptionKey::Limit]),
    ],
    ..BASE
};

/// MySQL.
pub static MYSQL: DialectCapabilities = MYSQL_BASE;

/// MariaDB.
pub static MARIADB: DialectCapabilities = DialectCapabilities {
    name: "mariadb",
    returning: ReturningStyle::Returning,
    options: &[
        (
            Operation::CreateTable,
            &[
                OptionKey::Collate,
                OptionKey::Charset,
                OptionKey::Engine,
                OptionKey::RowFormat,
                OptionKey::Comment,
                OptionKey::InitialAutoIncrement,
                OptionKey::UniqueKeys,
            ],
        ),
        (Operation::AddColumn, &[OptionKey::IfNotExists]),
        (Operation::ListTables, &[OptionKey::Schema]),
        (Operation::ListSchemas, &[OptionKey::Skip]),
        (Operation::RemoveColumn, &[OptionKey::IfExists]),
        (Operation::RemoveConstraint, &[OptionKey::IfExists]),
        (
            Operation::AddIndex,
            &[
                OptionKey::Type,
                OptionKey::Using,
                OptionKey::Parser,
                OptionKey::Length,
                OptionKey::IfNotExists,
            ],
        ),
        (Operation::RemoveIndex, &[OptionKey::IfExists]),
        (Operation::RenameTable, &[OptionKey::ChangeSchema]),
        (Operation::ShowConstraints, SHOW_CONSTRAINTS_FILTERS),
        (Operation::StartTransaction, &[OptionKey::ReadOnly]),
        (Operation::QuoteTable, &[OptionKey::IndexHints]),
        (
            Operation::CreateSchema,
            &[
                OptionKey::Charset,
                OptionKey::Collate,
                OptionKey::IfNotExists,
                OptionKey::Replace,
                OptionKey::Comment,
            ],
        ),
        (Operation::DropSchema, &[OptionKey::IfExists]),
        (
            Operation::Insert,
            &[
                OptionKey::Returning,
                OptionKey::IgnoreDuplicates,
                OptionKey::UpdateOnDuplicate,
            ],
        ),
        (Operation::Update, &[OptionKey::Limit]),
        (Operation::BulkDelete, &[OptionKey::Limit]),
    ],
    ..MYSQL_BASE
};

/// Microsoft SQL Server.
pub static MSSQL: DialectCapabilities = DialectCapabilities {
    name: "mssql",
    identifier_quote: QuoteStyle {
        open: '[',
        close: ']',
    },
    string_literals: StringLiteralStyle::National,
    binary_literals: BinaryLiteralStyle::HexNumber,
    boolean_literals: BooleanLiteralStyle::Integers,
    bind_params: BindParamStyle::AtNamed,
    default_schema: Some("dbo"),
    current_schema_sql: "SCHEMA_NAME()",
    technical_schemas: &[
        "db_accessadmin",
        "db_backupoperator",
        "db_datareader",
        "db_datawriter",
        "db_ddladmin",
        "db_denydatareader",
        "db_denydatawriter",
        "db_owner",
        "db_securityadmin",
        "INFORMATION_SCHEMA",
        "sys",
    ],
    technical_databases: &["master", "model", "msdb", "tempdb"],
    multi_databases: true,
    returning: ReturningStyle::Output,
    limit: LimitStyle::OffsetFetch,
    json_extraction: JsonExtractionStyle::JsonValue,
    auto_increment: AutoIncrementStyle::Identity("IDENTITY(1,1)"),
    transactions: TransactionControl::Connection,
    default_constraint: true,
    data_types: DataTypeSupport {
        json: true,
        ..BASE_DATA_TYPES
    },
    type_overrides: overrides::MSSQL,
    options: &[
        (Operation::CreateTable, &[OptionKey::UniqueKeys]),
        (Operation::ListTables, &[OptionKey::Schema]),
        (Operation::ListSchemas, &[OptionKey::Skip]),
        (Operation::ListDatabases, &[OptionKey::Skip]),
        (Operation::RemoveColumn, &[OptionKey::IfExists]),
        (Operation::RemoveConstraint, &[OptionKey::IfExists]),
        (
            Operation::AddIndex,
            &[OptionKey::Include, OptionKey::Where],
        ),
        (Operation::RemoveIndex, &[OptionKey::IfExists]),
        (Operation::RenameTable, &[OptionKey::ChangeSchema]),
        (Operation::ShowConstraints, SHOW_CONSTRAINTS_FILTERS),
        (Operation::QuoteTable, &[OptionKey::TableHints]),
        (Operation::DropSchema, &[OptionKey::IfExists]),
        (Operation::Insert, &[OptionKey::Returning]),
        (Operation::Update, &[OptionKey::Returning]),
    ],
    ..BASE
};

/// SQLite.
pub static SQLITE: DialectCapabilities = DialectCapabilities {
    name: "sqlite",
    identifier_quote: QuoteStyle::symmetric('`'),
    boolean_literals: BooleanLiteralStyle::Integers,
    schemas: false,
    schema_strategy: SchemaStrategy::Folded,
    current_schema_sql: "'main'",
    max_identifier_length: None,
    returning: ReturningStyle::Returning,
    upserts: UpsertStyle::OnConflict,
    ignore_duplicates: IgnoreDuplicatesStyle::Keyword("OR IGNORE"),
    update_limit: true,
    delete_limit: true,
    json_extraction: JsonExtractionStyle::ExtractArrow,
    auto_increment: AutoIncrementStyle::RowidAlias,
    transactions: TransactionControl::Statements { use_begin: true },
    add_constraint: false,
    remove_constraint: false,
    remove_column: false,
    data_types: DataTypeSupport {
        json: true,
        ..BASE_DATA_TYPES
    },
    type_overrides: overrides::SQLITE,
    options: &[
        (Operation::CreateTable, &[OptionKey::UniqueKeys]),
        (
            Operation::AddIndex,
            &[OptionKey::Collate, OptionKey::Where, OptionKey::IfNotExists],
        ),
        (Operation::RemoveIndex, &[OptionKey::IfExists]),
        (Operation::StartTransaction, &[OptionKey::TransactionType]),
        (Operation::Truncate, &[OptionKey::RestartIdentity]),
        (
            Operation::Insert,
            &[
                OptionKey::Returning,
                OptionKey::IgnoreDuplicates,
                OptionKey::UpdateOnDuplicate,
                OptionKey::ConflictFields,
                OptionKey::ConflictWhere,
            ],
        ),
        (
            Operation::Update,
            &[
                OptionKey::Returning,
                OptionKey::Limit,
                OptionKey::IgnoreDuplicates,
            ],
        ),
        (Operation::BulkDelete, &[OptionKey::Limit]),
    ],
    ..BASE
};

/// IBM Db2 for LUW.
pub static DB2: DialectCapabilities = DialectCapabilities {
    name: "db2",
    technical_schemas: &["ERRORSCHEMA", "NULLID", "SQLJ"],
    limit: LimitStyle::OffsetFetch,
    transactions: TransactionControl::Connection,
    foreign_key_on_update: false,
    type_overrides: overrides::DB2,
    options: &[
        (Operation::CreateTable, &[OptionKey::UniqueKeys]),
        (Operation::ListTables, &[OptionKey::Schema]),
        (Operation::ListSchemas, &[OptionKey::Skip]),
        (
            Operation::AddIndex,
            &[OptionKey::Include, OptionKey::Where],
        ),
        (Operation::ShowConstraints, SHOW_CONSTRAINTS_FILTERS),
    ],
    ..BASE
};

/// Snowflake.
pub static SNOWFLAKE: DialectCapabilities = DialectCapabilities {
    name: "snowflake",
    current_schema_sql: "CURRENT_SCHEMA()",
    technical_schemas: &["INFORMATION_SCHEMA"],
    max_identifier_length: Some(255),
    auto_increment: AutoIncrementStyle::Keyword("AUTOINCREMENT"),
    savepoints: false,
    isolation_levels: false,
    indexes: false,
    data_types: DataTypeSupport {
        json: true,
        decimal_unconstrained: true,
        ..BASE_DATA_TYPES
    },
    type_overrides: overrides::SNOWFLAKE,
    options: &[
        (
            Operation::CreateTable,
            &[OptionKey::Comment, OptionKey::UniqueKeys],
        ),
        (Operation::DropTable, &[OptionKey::Cascade]),
        (Operation::ListTables, &[OptionKey::Schema]),
        (Operation::ListSchemas, &[OptionKey::Skip]),
        (Operation::RenameTable, &[OptionKey::ChangeSchema]),
        (Operation::ShowConstraints, SHOW_CONSTRAINTS_FILTERS),
        (
            Operation::CreateSchema,
            &[
                OptionKey::Comment,
                OptionKey::IfNotExists,
                OptionKey::Replace,
            ],
        ),
        (
            Operation::DropSchema,
            &[OptionKey::Cascade, OptionKey::IfExists],
        ),
    ],
    ..BASE
};

/// Db2 for IBM i.
pub static IBMI: DialectCapabilities = DialectCapabilities {
    name: "ibmi",
    limit: LimitStyle::OffsetFetch,
    transactions: TransactionControl::Connection,
    foreign_key_on_update: false,
    type_overrides: overrides::IBMI,
    options: &[
        (Operation::CreateTable, &[OptionKey::UniqueKeys]),
        (Operation::ListTables, &[OptionKey::Schema]),
        (Operation::ListSchemas, &[OptionKey::Skip]),
        (
            Operation::AddIndex,
            &[OptionKey::Include, OptionKey::Where],
        ),
        (Operation::ShowConstraints, SHOW_CONSTRAINTS_FILTERS),
    ],
    ..BASE
};

/// SAP HANA.
pub static HANA: DialectCapabilities = DialectCapabilities {
    name: "hana",
    current_schema_sql: "CURRENT_SCHEMA",
    technical_schemas: &[
        "SYS",
        "SYSTEM",
        "PUBLIC",
        "_SYS_BI",
        "_SYS_BIC",
        "_SYS_REPO",
        "_SYS_STATISTICS",
    ],
    max_identifier_length: Some(127),
    json_extraction: JsonExtractionStyle::JsonValue,
    auto_increment: AutoIncrementStyle::Identity("GENERATED BY DEFAULT AS IDENTITY"),
    transactions: TransactionControl::Connection,
    foreign_key_on_update: false,
    type_overrides: overrides::HANA,
    options: &[
        (Operation::CreateTable, &[OptionKey::UniqueKeys]),
        (Operation::ListTables, &[OptionKey::Schema]),
        (Operation::ListSchemas, &[OptionKey::Skip]),
        (Operation::ShowConstraints, SHOW_CONSTRAINTS_FILTERS),
        (Operation::DropSchema, &[OptionKey::Cascade]),
    ],
    ..BASE
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_kind_round_trips_through_name() {
        for kind in DialectKind::ALL {
            assert_eq!(kind.name().parse::<DialectKind>().unwrap(), kind);
        }
        assert!("oracle".parse::<DialectKind>().is_err());
    }

    #[test]
    fn test_dialect_kind_deserializes_lowercase() {
        let kind: DialectKind = serde_json::from_str("\"mssql\"").unwrap();
        assert_eq!(kind, DialectKind::MsSql);
        let kind: DialectKind = serde_json::from_str("\"mariadb\"").unwrap();
        assert_eq!(kind, DialectKind::MariaDb);
    }

    #[test]
    fn test_supports_reads_option_table() {
        assert!(POSTGRES.supports(Operation::Truncate, OptionKey::Cascade));
        assert!(!MSSQL.supports(Operation::Truncate, OptionKey::Cascade));
        assert!(SQLITE.supports(Operation::Truncate, OptionKey::RestartIdentity));
        assert!(!SQLITE.supports(Operation::Truncate, OptionKey::Cascade));
        assert!(MYSQL.supports(Operation::QuoteTable, OptionKey::IndexHints));
        assert!(MSSQL.supports(Operation::QuoteTable, OptionKey::TableHints));
    }

    #[test]
    fn test_quote_styles() {
        assert_eq!(
            DialectKind::MsSql.capabilities().identifier_quote_style(),
            QuoteStyle {
                open: '[',
                close: ']'
            }
        );
        assert_eq!(
            DialectKind::Sqlite.capabilities().identifier_quote_style(),
            QuoteStyle::symmetric('`')
        );
        assert_eq!(
            DialectKind::Postgres.capabilities().identifier_quote_style(),
            QuoteStyle::symmetric('"')
        );
    }

    #[test]
    fn test_mariadb_inherits_mysql_literals() {
        assert_eq!(MARIADB.identifier_quote, MYSQL.identifier_quote);
        assert_eq!(MARIADB.string_literals, StringLiteralStyle::Backslash);
        assert_eq!(MARIADB.returning, ReturningStyle::Returning);
        assert_eq!(MYSQL.returning, ReturningStyle::Unsupported);
    }
}
