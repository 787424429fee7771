//! Option Validator and the per-operation option bags.
//!
//! Every operation that takes options knows a fixed *supportable* set of
//! keys. A dialect accepts a subset of it, listed in its capability table.
//! [`reject_invalid_options`] compares the keys a caller actually set
//! against both sets before any SQL is assembled.

use serde::Deserialize;

use crate::attribute::{Deferrable, ForeignKeyReference};
use crate::capabilities::{DialectCapabilities, Operation, OptionKey};
use crate::config::TransactionType;
use crate::error::{DialectError, Result};
use crate::generator::WhereClause;
use crate::value::Value;

/// Keys an operation can accept in at least one dialect.
#[must_use]
pub const fn supportable_options(operation: Operation) -> &'static [OptionKey] {
    use OptionKey as K;
    match operation {
        Operation::CreateTable => &[
            K::Collate,
            K::Charset,
            K::Engine,
            K::RowFormat,
            K::Comment,
            K::InitialAutoIncrement,
            K::UniqueKeys,
        ],
        Operation::AddColumn => &[K::IfNotExists],
        Operation::DropTable => &[K::Cascade],
        Operation::ListTables => &[K::Schema],
        Operation::ListSchemas | Operation::ListDatabases => &[K::Skip],
        Operation::AddConstraint => &[K::Deferrable],
        Operation::RemoveColumn | Operation::RemoveConstraint => &[K::IfExists, K::Cascade],
        Operation::AddIndex => &[
            K::Concurrently,
            K::IfNotExists,
            K::Using,
            K::Operator,
            K::Where,
            K::Include,
            K::Collate,
            K::Type,
            K::Parser,
            K::Length,
        ],
        Operation::RemoveIndex => &[K::Concurrently, K::IfExists, K::Cascade],
        Operation::RenameTable => &[K::ChangeSchema],
        Operation::ShowConstraints => &[K::ColumnName, K::ConstraintName, K::ConstraintType],
        Operation::StartTransaction => &[K::ReadOnly, K::TransactionType],
        Operation::Truncate => &[K::Cascade, K::RestartIdentity],
        Operation::QuoteTable => &[K::IndexHints, K::TableHints],
        Operation::CreateSchema => &[
            K::Authorization,
            K::Charset,
            K::Collate,
            K::Comment,
            K::IfNotExists,
            K::Replace,
        ],
        Operation::DropSchema => &[K::Cascade, K::IfExists],
        Operation::Insert => &[
            K::Returning,
            K::IgnoreDuplicates,
            K::UpdateOnDuplicate,
            K::ConflictFields,
            K::ConflictWhere,
        ],
        Operation::Update => &[K::Returning, K::Limit, K::IgnoreDuplicates],
        Operation::BulkDelete => &[K::Limit],
    }
}

/// Fails on the first key in `present` that the dialect does not accept.
///
/// A key outside `supportable` is [`DialectError::UnknownOption`]; a key
/// inside it but outside `supported` is [`DialectError::UnsupportedOption`].
pub fn reject_invalid_options(
    operation: Operation,
    capabilities: &DialectCapabilities,
    supportable: &[OptionKey],
    supported: &[OptionKey],
    present: &[OptionKey],
) -> Result<()> {
    for key in present {
        if !supportable.contains(key) {
            return Err(DialectError::UnknownOption {
                operation: operation.name(),
                option: key.name().to_string(),
            });
        }
        if !supported.contains(key) {
            return Err(DialectError::UnsupportedOption {
                dialect: capabilities.name,
                operation: operation.name(),
                option: key.name(),
            });
        }
    }
    Ok(())
}

/// An options bag of one operation.
pub trait OptionBag {
    /// The operation the bag belongs to.
    const OPERATION: Operation;

    /// Keys set to a non-default value.
    fn present_keys(&self) -> Vec<OptionKey>;

    /// Checks the bag against a dialect.
    fn validate(&self, capabilities: &DialectCapabilities) -> Result<()> {
        reject_invalid_options(
            Self::OPERATION,
            capabilities,
            supportable_options(Self::OPERATION),
            capabilities.supported_options(Self::OPERATION),
            &self.present_keys(),
        )
    }
}

/// Collects the keys whose condition holds.
fn keys<const N: usize>(flags: [(bool, OptionKey); N]) -> Vec<OptionKey> {
    flags
        .into_iter()
        .filter_map(|(set, key)| set.then_some(key))
        .collect()
}

macro_rules! option_bag {
    ($bag:ty, $operation:ident, |$this:ident| [$($flag:expr => $key:ident),* $(,)?]) => {
        impl OptionBag for $bag {
            const OPERATION: Operation = Operation::$operation;

            fn present_keys(&self) -> Vec<OptionKey> {
                let $this = self;
                keys([$(($flag, OptionKey::$key)),*])
            }
        }
    };
}

/// A named composite unique key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct UniqueKeyOptions {
    /// Constraint name; derived from the table and fields when absent.
    pub name: Option<String>,
    /// Columns of the key.
    pub fields: Vec<String>,
}

/// Options of `create_table_query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateTableOptions {
    /// Default collation.
    pub collate: Option<String>,
    /// Default character set.
    pub charset: Option<String>,
    /// Storage engine.
    pub engine: Option<String>,
    /// Row format.
    pub row_format: Option<String>,
    /// Table comment.
    pub comment: Option<String>,
    /// First AUTO_INCREMENT value.
    pub initial_auto_increment: Option<u64>,
    /// Composite unique keys in addition to those declared on attributes.
    pub unique_keys: Vec<UniqueKeyOptions>,
}

option_bag!(CreateTableOptions, CreateTable, |o| [
    o.collate.is_some() => Collate,
    o.charset.is_some() => Charset,
    o.engine.is_some() => Engine,
    o.row_format.is_some() => RowFormat,
    o.comment.is_some() => Comment,
    o.initial_auto_increment.is_some() => InitialAutoIncrement,
    !o.unique_keys.is_empty() => UniqueKeys,
]);

/// Options of `add_column_query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct AddColumnOptions {
    /// Skip when the column exists.
    pub if_not_exists: bool,
}

option_bag!(AddColumnOptions, AddColumn, |o| [o.if_not_exists => IfNotExists]);

/// Options of `drop_table_query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct DropTableOptions {
    /// Drop dependent objects.
    pub cascade: bool,
}

option_bag!(DropTableOptions, DropTable, |o| [o.cascade => Cascade]);

/// Options of `list_tables_query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ListTablesOptions {
    /// Only list tables of this schema.
    pub schema: Option<String>,
}

option_bag!(ListTablesOptions, ListTables, |o| [o.schema.is_some() => Schema]);

/// Options of `list_schemas_query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ListSchemasOptions {
    /// Schemas to leave out, in addition to the technical ones.
    pub skip: Vec<String>,
}

option_bag!(ListSchemasOptions, ListSchemas, |o| [!o.skip.is_empty() => Skip]);

/// Options of `list_databases_query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ListDatabasesOptions {
    /// Databases to leave out, in addition to the technical ones.
    pub skip: Vec<String>,
}

option_bag!(ListDatabasesOptions, ListDatabases, |o| [!o.skip.is_empty() => Skip]);

/// Options of `remove_column_query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RemoveColumnOptions {
    /// Skip when the column is missing.
    pub if_exists: bool,
    /// Drop dependent objects.
    pub cascade: bool,
}

option_bag!(RemoveColumnOptions, RemoveColumn, |o| [
    o.if_exists => IfExists,
    o.cascade => Cascade,
]);

/// Options of `remove_constraint_query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RemoveConstraintOptions {
    /// Skip when the constraint is missing.
    pub if_exists: bool,
    /// Drop dependent objects.
    pub cascade: bool,
}

option_bag!(RemoveConstraintOptions, RemoveConstraint, |o| [
    o.if_exists => IfExists,
    o.cascade => Cascade,
]);

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One indexed column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct IndexField {
    /// Column name.
    pub name: String,
    /// Prefix length.
    pub length: Option<u32>,
    /// Sort order.
    pub order: Option<SortOrder>,
    /// Collation.
    pub collate: Option<String>,
    /// Operator class.
    pub operator: Option<String>,
}

impl IndexField {
    /// A plain column.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the sort order.
    #[must_use]
    pub const fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets the prefix length.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the collation.
    #[must_use]
    pub fn collate(mut self, collate: impl Into<String>) -> Self {
        self.collate = Some(collate.into());
        self
    }

    /// Sets the operator class.
    #[must_use]
    pub fn operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }
}

impl From<&str> for IndexField {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Options of `add_index_query`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct AddIndexOptions {
    /// Indexed columns. Required.
    pub fields: Vec<IndexField>,
    /// Index name; derived from the table and fields when absent.
    pub name: Option<String>,
    /// Replaces the table name when deriving the index name.
    pub prefix: Option<String>,
    /// UNIQUE index.
    pub unique: bool,
    /// Build without locking writes.
    pub concurrently: bool,
    /// Skip when the index exists.
    pub if_not_exists: bool,
    /// Index method, e.g. `gin`.
    pub using: Option<String>,
    /// Operator class applied to every field without its own.
    pub operator: Option<String>,
    /// Partial index predicate.
    #[serde(skip)]
    pub where_clause: Option<WhereClause>,
    /// Covered, non-key columns.
    pub include: Vec<String>,
    /// Collation applied to every field without its own.
    pub collate: Option<String>,
    /// Index type, e.g. `FULLTEXT`.
    #[serde(rename = "type")]
    pub index_type: Option<String>,
    /// Full-text parser.
    pub parser: Option<String>,
}

impl AddIndexOptions {
    /// An index on `fields`.
    pub fn on<I, F>(fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<IndexField>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Marks the index unique.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the index name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the partial index predicate.
    #[must_use]
    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clause = Some(clause);
        self
    }
}

option_bag!(AddIndexOptions, AddIndex, |o| [
    o.concurrently => Concurrently,
    o.if_not_exists => IfNotExists,
    o.using.is_some() => Using,
    o.operator.is_some() || o.fields.iter().any(|f| f.operator.is_some()) => Operator,
    o.where_clause.is_some() => Where,
    !o.include.is_empty() => Include,
    o.collate.is_some() || o.fields.iter().any(|f| f.collate.is_some()) => Collate,
    o.index_type.is_some() => Type,
    o.parser.is_some() => Parser,
    o.fields.iter().any(|f| f.length.is_some()) => Length,
]);

/// Options of `remove_index_query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RemoveIndexOptions {
    /// Drop without locking writes.
    pub concurrently: bool,
    /// Skip when the index is missing.
    pub if_exists: bool,
    /// Drop dependent objects.
    pub cascade: bool,
}

option_bag!(RemoveIndexOptions, RemoveIndex, |o| [
    o.concurrently => Concurrently,
    o.if_exists => IfExists,
    o.cascade => Cascade,
]);

/// Options of `rename_table_query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RenameTableOptions {
    /// Allow the new name to be in another schema.
    pub change_schema: bool,
}

option_bag!(RenameTableOptions, RenameTable, |o| [o.change_schema => ChangeSchema]);

/// Constraint kinds known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintType {
    /// CHECK.
    Check,
    /// DEFAULT.
    Default,
    /// FOREIGN KEY.
    ForeignKey,
    /// PRIMARY KEY.
    PrimaryKey,
    /// UNIQUE.
    Unique,
}

impl ConstraintType {
    /// Catalog spelling.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Check => "CHECK",
            Self::Default => "DEFAULT",
            Self::ForeignKey => "FOREIGN KEY",
            Self::PrimaryKey => "PRIMARY KEY",
            Self::Unique => "UNIQUE",
        }
    }
}

/// Options of `show_constraints_query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ShowConstraintsOptions {
    /// Only constraints on this column.
    pub column_name: Option<String>,
    /// Only the constraint with this name.
    pub constraint_name: Option<String>,
    /// Only constraints of this kind.
    pub constraint_type: Option<ConstraintType>,
}

option_bag!(ShowConstraintsOptions, ShowConstraints, |o| [
    o.column_name.is_some() => ColumnName,
    o.constraint_name.is_some() => ConstraintName,
    o.constraint_type.is_some() => ConstraintType,
]);

/// Options of `start_transaction_query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct StartTransactionOptions {
    /// READ ONLY transaction.
    pub read_only: bool,
    /// SQLite locking mode; the dialect default applies when absent.
    pub transaction_type: Option<TransactionType>,
}

option_bag!(StartTransactionOptions, StartTransaction, |o| [
    o.read_only => ReadOnly,
    o.transaction_type.is_some() => TransactionType,
]);

/// Options of `truncate_table_query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct TruncateOptions {
    /// Truncate dependent tables.
    pub cascade: bool,
    /// Reset sequences owned by the table.
    pub restart_identity: bool,
}

option_bag!(TruncateOptions, Truncate, |o| [
    o.cascade => Cascade,
    o.restart_identity => RestartIdentity,
]);

/// MySQL index hint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexHintKind {
    /// USE INDEX.
    Use,
    /// FORCE INDEX.
    Force,
    /// IGNORE INDEX.
    Ignore,
}

/// A MySQL index hint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct IndexHint {
    /// Hint kind.
    #[serde(rename = "type")]
    pub kind: IndexHintKind,
    /// Index names.
    pub values: Vec<String>,
}

/// A MSSQL table hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TableHint {
    /// NOLOCK.
    NoLock,
    /// READPAST.
    ReadPast,
    /// UPDLOCK.
    UpdLock,
    /// HOLDLOCK.
    HoldLock,
    /// ROWLOCK.
    RowLock,
    /// TABLOCK.
    TabLock,
    /// TABLOCKX.
    TabLockX,
    /// XLOCK.
    XLock,
}

impl TableHint {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoLock => "NOLOCK",
            Self::ReadPast => "READPAST",
            Self::UpdLock => "UPDLOCK",
            Self::HoldLock => "HOLDLOCK",
            Self::RowLock => "ROWLOCK",
            Self::TabLock => "TABLOCK",
            Self::TabLockX => "TABLOCKX",
            Self::XLock => "XLOCK",
        }
    }
}

/// Options of `quote_table`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct QuoteTableOptions {
    /// Alias, rendered as `AS alias`.
    pub alias: Option<String>,
    /// MySQL index hints.
    pub index_hints: Vec<IndexHint>,
    /// MSSQL table hints.
    pub table_hints: Vec<TableHint>,
}

option_bag!(QuoteTableOptions, QuoteTable, |o| [
    !o.index_hints.is_empty() => IndexHints,
    !o.table_hints.is_empty() => TableHints,
]);

/// Options of `create_schema_query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateSchemaOptions {
    /// Owner of the schema.
    pub authorization: Option<String>,
    /// Default character set.
    pub charset: Option<String>,
    /// Default collation.
    pub collate: Option<String>,
    /// Schema comment.
    pub comment: Option<String>,
    /// Skip when the schema exists.
    pub if_not_exists: bool,
    /// Replace an existing schema.
    pub replace: bool,
}

option_bag!(CreateSchemaOptions, CreateSchema, |o| [
    o.authorization.is_some() => Authorization,
    o.charset.is_some() => Charset,
    o.collate.is_some() => Collate,
    o.comment.is_some() => Comment,
    o.if_not_exists => IfNotExists,
    o.replace => Replace,
]);

/// Options of `drop_schema_query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct DropSchemaOptions {
    /// Drop contained objects.
    pub cascade: bool,
    /// Skip when the schema is missing.
    pub if_exists: bool,
}

option_bag!(DropSchemaOptions, DropSchema, |o| [
    o.cascade => Cascade,
    o.if_exists => IfExists,
]);

/// Options of `insert_query` and `bulk_insert_query`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct InsertOptions {
    /// Return the inserted rows.
    pub returning: bool,
    /// Skip rows that violate a unique constraint.
    pub ignore_duplicates: bool,
    /// Columns overwritten when the row already exists.
    pub update_on_duplicate: Vec<String>,
    /// Conflict target of the upsert.
    pub conflict_fields: Vec<String>,
    /// Predicate of a partial unique index targeted by the upsert.
    #[serde(skip)]
    pub conflict_where: Option<WhereClause>,
}

option_bag!(InsertOptions, Insert, |o| [
    o.returning => Returning,
    o.ignore_duplicates => IgnoreDuplicates,
    !o.update_on_duplicate.is_empty() => UpdateOnDuplicate,
    !o.conflict_fields.is_empty() => ConflictFields,
    o.conflict_where.is_some() => ConflictWhere,
]);

/// Options of `update_query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct UpdateOptions {
    /// Return the updated rows.
    pub returning: bool,
    /// Maximum number of rows to update.
    pub limit: Option<u64>,
    /// Skip rows whose update violates a unique constraint.
    pub ignore_duplicates: bool,
}

option_bag!(UpdateOptions, Update, |o| [
    o.returning => Returning,
    o.limit.is_some() => Limit,
    o.ignore_duplicates => IgnoreDuplicates,
]);

/// Options of `bulk_delete_query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct DeleteOptions {
    /// Maximum number of rows to delete.
    pub limit: Option<u64>,
}

option_bag!(DeleteOptions, BulkDelete, |o| [o.limit.is_some() => Limit]);

/// Options of `select_query`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectOptions {
    /// Selected columns; all of them when empty.
    pub attributes: Vec<String>,
    /// Row filter.
    pub where_clause: Option<WhereClause>,
    /// Sort keys.
    pub order: Vec<(String, SortOrder)>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Rows to skip.
    pub offset: Option<u64>,
    /// Hints attached to the table reference.
    pub table: QuoteTableOptions,
}

/// The constraint added by `add_constraint_query`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintDefinition {
    /// `CHECK (predicate)`.
    Check(WhereClause),
    /// `UNIQUE (fields)`.
    Unique,
    /// `DEFAULT value FOR field`.
    Default(Value),
    /// `PRIMARY KEY (fields)`.
    PrimaryKey,
    /// `FOREIGN KEY (fields) REFERENCES ...`.
    ForeignKey(ForeignKeyReference),
}

impl ConstraintDefinition {
    /// Suffix of the derived constraint name.
    pub(crate) const fn name_suffix(&self) -> &'static str {
        match self {
            Self::Check(_) => "ck",
            Self::Unique => "uk",
            Self::Default(_) => "df",
            Self::PrimaryKey => "pk",
            Self::ForeignKey(_) => "fk",
        }
    }
}

/// Options of `add_constraint_query`.
#[derive(Debug, Clone, PartialEq)]
pub struct AddConstraintOptions {
    /// Constraint name; derived from the table and fields when absent.
    pub name: Option<String>,
    /// Constrained columns.
    pub fields: Vec<String>,
    /// The constraint.
    pub constraint: ConstraintDefinition,
    /// Deferral mode, for dialects with deferrable constraints.
    pub deferrable: Option<Deferrable>,
}

impl AddConstraintOptions {
    /// A constraint on `fields`.
    pub fn new<I, S>(constraint: ConstraintDefinition, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            fields: fields.into_iter().map(Into::into).collect(),
            constraint,
            deferrable: None,
        }
    }

    /// Sets the constraint name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Makes the constraint deferrable.
    #[must_use]
    pub const fn deferrable(mut self, deferrable: Deferrable) -> Self {
        self.deferrable = Some(deferrable);
        self
    }
}

option_bag!(AddConstraintOptions, AddConstraint, |o| [o.deferrable.is_some() => Deferrable]);

/// Which constraints `set_constraint_checking_query` affects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintChecking {
    /// Check at commit.
    Deferred(Vec<String>),
    /// Check after every statement.
    Immediate(Vec<String>),
}

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IsolationLevel {
    /// READ UNCOMMITTED.
    ReadUncommitted,
    /// READ COMMITTED.
    ReadCommitted,
    /// REPEATABLE READ.
    RepeatableRead,
    /// SERIALIZABLE.
    Serializable,
}

impl IsolationLevel {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ UNCOMMITTED",
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}
