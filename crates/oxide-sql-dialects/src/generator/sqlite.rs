//! SQLite query generation.
//!
//! SQLite has no schemas: a schema on a table reference is folded into the
//! table name. Introspection goes through `sqlite_master` and pragmas.

use std::fmt::Write as _;

use tracing::warn;

use super::{logged, QueryGenerator};
use crate::attribute::AttributeDescriptor;
use crate::capabilities::DialectKind;
use crate::config::DialectOptions;
use crate::error::Result;
use crate::escape::Escaper;
use crate::options::{
    CreateTableOptions, IsolationLevel, ListTablesOptions, OptionBag, RenameTableOptions,
    ShowConstraintsOptions, TruncateOptions,
};
use crate::table::TableReference;

/// SQLite dialect.
#[derive(Debug, Clone, Default)]
pub struct SqliteDialect {
    options: DialectOptions,
}

impl SqliteDialect {
    /// Creates a SQLite generator.
    #[must_use]
    pub const fn new(options: DialectOptions) -> Self {
        Self { options }
    }

    /// The table name as stored in `sqlite_master`.
    fn stored_name(&self, table: &TableReference) -> String {
        table
            .schema
            .as_deref()
            .or(self.options.schema.as_deref())
            .map_or_else(
                || table.table_name.clone(),
                |schema| format!("{schema}{}{}", table.delimiter(), table.table_name),
            )
    }
}

impl QueryGenerator for SqliteDialect {
    fn escaper(&self) -> Escaper<'_> {
        Escaper::new(DialectKind::Sqlite.capabilities(), &self.options)
    }

    fn version_query(&self) -> Result<String> {
        let e = self.escaper();
        logged(
            &e,
            "version query",
            format!("SELECT sqlite_version() AS {}", e.quote_identifier("version")),
        )
    }

    fn comment_statements(
        &self,
        table: &TableReference,
        attributes: &[AttributeDescriptor],
        options: &CreateTableOptions,
    ) -> Result<Vec<String>> {
        if options.comment.is_some() || attributes.iter().any(|a| a.comment.is_some()) {
            warn!(table = %table.table_name, "sqlite does not store comments; ignoring them");
        }
        Ok(Vec::new())
    }

    fn rename_table_query(
        &self,
        before: &TableReference,
        after: &TableReference,
        options: &RenameTableOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let sql = format!(
            "ALTER TABLE {} RENAME TO {}",
            e.quote_table(before),
            e.quote_table(after)
        );
        logged(&e, "rename table query", sql)
    }

    fn describe_table_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        logged(
            &e,
            "describe table query",
            format!("PRAGMA TABLE_INFO({});", e.quote_table(table)),
        )
    }

    fn list_tables_query(&self, options: &ListTablesOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let sql = format!(
            "SELECT name AS {} FROM sqlite_master WHERE type = 'table' \
             AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' ORDER BY name",
            e.quote_identifier("tableName")
        );
        logged(&e, "list tables query", sql)
    }

    fn table_exists_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = {}",
            e.escape_string(&self.stored_name(table))?
        );
        logged(&e, "table exists query", sql)
    }

    fn show_constraints_query(
        &self,
        table: &TableReference,
        options: &ShowConstraintsOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let sql = format!(
            "SELECT sql FROM sqlite_master WHERE tbl_name = {}",
            e.escape_string(&self.stored_name(table))?
        );
        logged(&e, "show constraints query", sql)
    }

    fn show_indexes_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        logged(
            &e,
            "show indexes query",
            format!("PRAGMA INDEX_LIST({})", e.quote_table(table)),
        )
    }

    fn truncate_table_query(
        &self,
        table: &TableReference,
        options: &TruncateOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let mut sql = format!("DELETE FROM {}", e.quote_table(table));
        if options.restart_identity {
            let _ = write!(
                sql,
                "; DELETE FROM {} WHERE {} = {}",
                e.quote_identifier("sqlite_sequence"),
                e.quote_identifier("name"),
                e.escape_string(&self.stored_name(table))?
            );
        }
        logged(&e, "truncate table query", sql)
    }

    fn set_isolation_level_query(&self, level: IsolationLevel) -> Result<String> {
        let e = self.escaper();
        let flag = u8::from(level == IsolationLevel::ReadUncommitted);
        logged(
            &e,
            "set isolation level query",
            format!("PRAGMA read_uncommitted = {flag}"),
        )
    }

    fn missing_value_sql(&self) -> &'static str {
        "NULL"
    }

    fn limited_rows_sql(
        &self,
        quoted_table: &str,
        predicate: Option<String>,
        limit: u64,
    ) -> String {
        let filter = predicate.map(|p| format!(" WHERE {p}")).unwrap_or_default();
        format!(" WHERE rowid IN (SELECT rowid FROM {quoted_table}{filter} LIMIT {limit})")
    }

    fn offset_without_limit_sql(&self, offset: u64) -> String {
        format!(" LIMIT -1 OFFSET {offset}")
    }
}
