//! Db2 for IBM i.
//!
//! DDL that may hit an existing (or missing) object is wrapped in a
//! compound statement with a CONTINUE handler for the matching SQLSTATE.

use super::{catalog_constraints_query, logged, schema_literal, QueryGenerator};
use crate::attribute::AttributeDescriptor;
use crate::capabilities::DialectKind;
use crate::config::DialectOptions;
use crate::error::Result;
use crate::escape::Escaper;
use crate::options::{
    CreateTableOptions, DropTableOptions, ListSchemasOptions, ListTablesOptions, OptionBag,
    RenameTableOptions, ShowConstraintsOptions,
};
use crate::table::TableReference;

/// Object already exists.
const SQLSTATE_EXISTS: &str = "42710";
/// Object not found.
const SQLSTATE_NOT_FOUND: &str = "42704";

/// Db2 for IBM i dialect.
#[derive(Debug, Clone, Default)]
pub struct IbmiDialect {
    options: DialectOptions,
}

impl IbmiDialect {
    /// Creates an IBM i generator.
    #[must_use]
    pub const fn new(options: DialectOptions) -> Self {
        Self { options }
    }
}

fn ignoring_sqlstate(state: &str, statements: &[String]) -> String {
    format!(
        "BEGIN DECLARE CONTINUE HANDLER FOR SQLSTATE VALUE '{state}' BEGIN END; {} END",
        statements.join(" ")
    )
}

fn user_schema_filter(e: &Escaper<'_>, column: &str, skip: &[String]) -> Result<String> {
    let mut filter = format!("{column} NOT LIKE 'Q%' AND {column} NOT LIKE 'SYS%'");
    if let Some(excluded) = super::excluded_names(e, column, &[], skip)? {
        filter.push_str(" AND ");
        filter.push_str(&excluded);
    }
    Ok(filter)
}

impl QueryGenerator for IbmiDialect {
    fn escaper(&self) -> Escaper<'_> {
        Escaper::new(DialectKind::Ibmi.capabilities(), &self.options)
    }

    fn version_query(&self) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT CONCAT(OS_VERSION, CONCAT('.', OS_RELEASE)) AS {} FROM SYSIBMADM.ENV_SYS_INFO",
            e.quote_identifier("version")
        );
        logged(&e, "version query", sql)
    }

    fn create_table_query(
        &self,
        table: &TableReference,
        attributes: &[AttributeDescriptor],
        options: &CreateTableOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let body = self.table_body(table, attributes, options)?;
        let mut statements = vec![format!("CREATE TABLE {} ({body});", e.quote_table(table))];
        statements.extend(self.comment_statements(table, attributes, options)?);
        logged(
            &e,
            "create table query",
            ignoring_sqlstate(SQLSTATE_EXISTS, &statements),
        )
    }

    fn drop_table_query(
        &self,
        table: &TableReference,
        options: &DropTableOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let statement = format!("DROP TABLE {};", e.quote_table(table));
        logged(
            &e,
            "drop table query",
            ignoring_sqlstate(SQLSTATE_NOT_FOUND, &[statement]),
        )
    }

    fn rename_table_query(
        &self,
        before: &TableReference,
        after: &TableReference,
        options: &RenameTableOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        super::check_schema_change(&e, before, after, options)?;
        let sql = format!(
            "RENAME TABLE {} TO {}",
            e.quote_table(before),
            e.quote_identifier(&after.table_name)
        );
        logged(&e, "rename table query", sql)
    }

    fn list_schemas_query(&self, options: &ListSchemasOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let sql = format!(
            "SELECT DISTINCT SCHEMA_NAME AS {} FROM QSYS2.SYSSCHEMAAUTH \
             WHERE GRANTEE = CURRENT USER AND {}",
            e.quote_identifier("schema"),
            user_schema_filter(&e, "SCHEMA_NAME", &options.skip)?
        );
        logged(&e, "list schemas query", sql)
    }

    fn list_tables_query(&self, options: &ListTablesOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let filter = match &options.schema {
            Some(schema) => format!("TABLE_SCHEMA = {}", e.escape_string(schema)?),
            None => user_schema_filter(&e, "TABLE_SCHEMA", &[])?,
        };
        let sql = format!(
            "SELECT TABLE_NAME AS {}, TABLE_SCHEMA AS {} FROM QSYS2.SYSTABLES \
             WHERE TABLE_TYPE = 'T' AND {filter} ORDER BY TABLE_SCHEMA, TABLE_NAME",
            e.quote_identifier("tableName"),
            e.quote_identifier("schema")
        );
        logged(&e, "list tables query", sql)
    }

    fn table_exists_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT TABLE_NAME FROM QSYS2.SYSTABLES WHERE TABLE_TYPE = 'T' \
             AND TABLE_NAME = {} AND TABLE_SCHEMA = {}",
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?
        );
        logged(&e, "table exists query", sql)
    }

    fn describe_table_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT COLUMN_NAME AS {}, DATA_TYPE AS {}, LENGTH AS {}, IS_NULLABLE AS {}, \
             COLUMN_DEFAULT AS {}, COLUMN_TEXT AS {} FROM QSYS2.SYSCOLUMNS \
             WHERE TABLE_NAME = {} AND TABLE_SCHEMA = {} ORDER BY ORDINAL_POSITION",
            e.quote_identifier("Field"),
            e.quote_identifier("Type"),
            e.quote_identifier("Length"),
            e.quote_identifier("Null"),
            e.quote_identifier("Default"),
            e.quote_identifier("Comment"),
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?
        );
        logged(&e, "describe table query", sql)
    }

    fn show_indexes_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT k.INDEX_NAME AS {}, k.COLUMN_NAME AS {}, i.IS_UNIQUE AS {} \
             FROM QSYS2.SYSKEYS k JOIN QSYS2.SYSINDEXES i \
             ON i.INDEX_NAME = k.INDEX_NAME AND i.INDEX_SCHEMA = k.INDEX_SCHEMA \
             WHERE i.TABLE_NAME = {} AND i.TABLE_SCHEMA = {} \
             ORDER BY k.INDEX_NAME, k.ORDINAL_POSITION",
            e.quote_identifier("name"),
            e.quote_identifier("column"),
            e.quote_identifier("unique"),
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?
        );
        logged(&e, "show indexes query", sql)
    }

    fn show_constraints_query(
        &self,
        table: &TableReference,
        options: &ShowConstraintsOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let sql = catalog_constraints_query(&e, table, options, "QSYS2.SYSCST", "QSYS2.SYSKEYCST")?;
        logged(&e, "show constraints query", sql)
    }

    fn create_savepoint_query(&self, name: &str) -> Result<String> {
        let e = self.escaper();
        logged(
            &e,
            "create savepoint query",
            format!("SAVEPOINT {} ON ROLLBACK RETAIN CURSORS", e.quote_identifier(name)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::DataType;
    use crate::options::ConstraintType;

    fn ibmi() -> IbmiDialect {
        IbmiDialect::default()
    }

    #[test]
    fn test_create_table_ignores_existing() {
        let sql = ibmi()
            .create_table_query(
                &TableReference::new("items").with_schema("LIB"),
                &[AttributeDescriptor::new("code", DataType::integer()).not_null()],
                &CreateTableOptions::default(),
            )
            .unwrap();
        assert_eq!(
            sql,
            "BEGIN DECLARE CONTINUE HANDLER FOR SQLSTATE VALUE '42710' BEGIN END; \
             CREATE TABLE \"LIB\".\"items\" (\"code\" INTEGER NOT NULL); END"
        );
    }

    #[test]
    fn test_drop_table_ignores_missing() {
        assert_eq!(
            ibmi()
                .drop_table_query(&TableReference::new("items"), &DropTableOptions::default())
                .unwrap(),
            "BEGIN DECLARE CONTINUE HANDLER FOR SQLSTATE VALUE '42704' BEGIN END; \
             DROP TABLE \"items\"; END"
        );
    }

    #[test]
    fn test_catalog_queries() {
        assert_eq!(
            ibmi()
                .table_exists_query(&TableReference::new("items").with_schema("LIB"))
                .unwrap(),
            "SELECT TABLE_NAME FROM QSYS2.SYSTABLES WHERE TABLE_TYPE = 'T' \
             AND TABLE_NAME = 'items' AND TABLE_SCHEMA = 'LIB'"
        );
        let options = ShowConstraintsOptions {
            constraint_type: Some(ConstraintType::Unique),
            column_name: Some(String::from("code")),
            ..ShowConstraintsOptions::default()
        };
        let sql = ibmi()
            .show_constraints_query(&TableReference::new("items"), &options)
            .unwrap();
        assert!(sql.contains("FROM QSYS2.SYSCST c"));
        assert!(sql.contains("AND c.CONSTRAINT_TYPE = 'UNIQUE'"));
        assert!(sql.contains("FROM QSYS2.SYSKEYCST k"));
        assert!(sql.contains("k.COLUMN_NAME = 'code'"));
    }

    #[test]
    fn test_savepoints_retain_cursors() {
        assert_eq!(
            ibmi().create_savepoint_query("sp").unwrap(),
            "SAVEPOINT \"sp\" ON ROLLBACK RETAIN CURSORS"
        );
        assert_eq!(
            ibmi().rollback_savepoint_query("sp").unwrap(),
            "ROLLBACK TO SAVEPOINT \"sp\""
        );
    }
}
