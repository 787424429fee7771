//! Db2 for Linux, Unix and Windows.

use std::fmt::Write as _;

use super::{excluded_names, logged, schema_literal, QueryGenerator};
use crate::attribute::AttributeDescriptor;
use crate::capabilities::DialectKind;
use crate::config::DialectOptions;
use crate::error::{DialectError, Result};
use crate::escape::Escaper;
use crate::options::{
    ConstraintType, CreateTableOptions, IsolationLevel, ListSchemasOptions, ListTablesOptions,
    OptionBag, RenameTableOptions, ShowConstraintsOptions, TruncateOptions,
};
use crate::table::TableReference;

/// Db2 dialect.
#[derive(Debug, Clone, Default)]
pub struct Db2Dialect {
    options: DialectOptions,
}

impl Db2Dialect {
    /// Creates a Db2 generator.
    #[must_use]
    pub const fn new(options: DialectOptions) -> Self {
        Self { options }
    }
}

/// Catalog code of a constraint type in `SYSCAT.TABCONST`.
pub(crate) fn constraint_type_code(kind: ConstraintType) -> Result<&'static str> {
    match kind {
        ConstraintType::PrimaryKey => Ok("P"),
        ConstraintType::Unique => Ok("U"),
        ConstraintType::ForeignKey => Ok("F"),
        ConstraintType::Check => Ok("K"),
        ConstraintType::Default => Err(DialectError::unsupported(
            "db2",
            "listing DEFAULT constraints",
        )),
    }
}

fn user_schema_filter(e: &Escaper<'_>, column: &str, skip: &[String]) -> Result<String> {
    let mut filter = format!("{column} NOT LIKE 'SYS%'");
    if let Some(excluded) = excluded_names(e, column, e.capabilities().technical_schemas, skip)? {
        filter.push_str(" AND ");
        filter.push_str(&excluded);
    }
    Ok(filter)
}

impl QueryGenerator for Db2Dialect {
    fn escaper(&self) -> Escaper<'_> {
        Escaper::new(DialectKind::Db2.capabilities(), &self.options)
    }

    fn version_query(&self) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT service_level AS {} FROM TABLE (sysproc.env_get_inst_info()) AS A",
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
        logged(&e, "create table query", statements.join(" "))
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
            "SELECT TRIM(SCHEMANAME) AS {} FROM SYSCAT.SCHEMATA WHERE {} ORDER BY SCHEMANAME",
            e.quote_identifier("schema"),
            user_schema_filter(&e, "SCHEMANAME", &options.skip)?
        );
        logged(&e, "list schemas query", sql)
    }

    fn list_tables_query(&self, options: &ListTablesOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let filter = match &options.schema {
            Some(schema) => format!("TABSCHEMA = {}", e.escape_string(schema)?),
            None => user_schema_filter(&e, "TABSCHEMA", &[])?,
        };
        let sql = format!(
            "SELECT TABNAME AS {}, TRIM(TABSCHEMA) AS {} FROM SYSCAT.TABLES \
             WHERE TYPE = 'T' AND {filter} ORDER BY TABSCHEMA, TABNAME",
            e.quote_identifier("tableName"),
            e.quote_identifier("schema")
        );
        logged(&e, "list tables query", sql)
    }

    fn table_exists_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT TABNAME FROM SYSCAT.TABLES WHERE TYPE = 'T' AND TABNAME = {} AND TABSCHEMA = {}",
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?
        );
        logged(&e, "table exists query", sql)
    }

    fn describe_table_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT NAME AS {}, TRIM(COLTYPE) AS {}, LENGTH AS {}, SCALE AS {}, NULLS AS {}, \
             DEFAULT AS {}, IDENTITY AS {}, KEYSEQ AS {}, REMARKS AS {} FROM SYSIBM.SYSCOLUMNS \
             WHERE TBNAME = {} AND TBCREATOR = {} ORDER BY COLNO",
            e.quote_identifier("Field"),
            e.quote_identifier("Type"),
            e.quote_identifier("Length"),
            e.quote_identifier("Scale"),
            e.quote_identifier("Null"),
            e.quote_identifier("Default"),
            e.quote_identifier("Identity"),
            e.quote_identifier("KeySeq"),
            e.quote_identifier("Comment"),
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?
        );
        logged(&e, "describe table query", sql)
    }

    fn show_indexes_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT INDNAME AS {}, UNIQUERULE AS {}, COLNAMES AS {} FROM SYSCAT.INDEXES \
             WHERE TABNAME = {} AND TABSCHEMA = {} ORDER BY INDNAME",
            e.quote_identifier("name"),
            e.quote_identifier("keyType"),
            e.quote_identifier("columns"),
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
        let mut sql = format!(
            "SELECT CONSTNAME AS {}, TRIM(TABSCHEMA) AS {}, TABNAME AS {}, TYPE AS {} \
             FROM SYSCAT.TABCONST c WHERE TABNAME = {} AND TABSCHEMA = {}",
            e.quote_identifier("constraintName"),
            e.quote_identifier("tableSchema"),
            e.quote_identifier("tableName"),
            e.quote_identifier("constraintType"),
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?
        );
        if let Some(name) = &options.constraint_name {
            sql.push_str(" AND CONSTNAME = ");
            sql.push_str(&e.escape_string(name)?);
        }
        if let Some(kind) = options.constraint_type {
            let _ = write!(sql, " AND TYPE = '{}'", constraint_type_code(kind)?);
        }
        if let Some(column) = &options.column_name {
            let _ = write!(
                sql,
                " AND EXISTS (SELECT 1 FROM SYSCAT.KEYCOLUSE k WHERE k.CONSTNAME = c.CONSTNAME \
                 AND k.TABNAME = c.TABNAME AND k.TABSCHEMA = c.TABSCHEMA AND k.COLNAME = {})",
                e.escape_string(column)?
            );
        }
        sql.push_str(" ORDER BY CONSTNAME");
        logged(&e, "show constraints query", sql)
    }

    fn truncate_table_query(
        &self,
        table: &TableReference,
        options: &TruncateOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        logged(
            &e,
            "truncate table query",
            format!("TRUNCATE TABLE {} IMMEDIATE", e.quote_table(table)),
        )
    }

    fn set_isolation_level_query(&self, level: IsolationLevel) -> Result<String> {
        let e = self.escaper();
        let code = match level {
            IsolationLevel::ReadUncommitted => "UR",
            IsolationLevel::ReadCommitted => "CS",
            IsolationLevel::RepeatableRead => "RS",
            IsolationLevel::Serializable => "RR",
        };
        logged(
            &e,
            "set isolation level query",
            format!("SET CURRENT ISOLATION = {code}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{ForeignKeyReference, ReferentialAction};
    use crate::data_types::DataType;
    use crate::error::ErrorKind;
    use crate::options::SelectOptions;

    fn db2() -> Db2Dialect {
        Db2Dialect::default()
    }

    #[test]
    fn test_create_table_with_identity_and_enum_check() {
        let attributes = [
            AttributeDescriptor::new("id", DataType::integer())
                .primary_key()
                .auto_increment(),
            AttributeDescriptor::new("size", DataType::enumeration(["S", "M"]).unwrap()),
        ];
        let sql = db2()
            .create_table_query(
                &TableReference::new("shirts"),
                &attributes,
                &CreateTableOptions::default(),
            )
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE \"shirts\" (\"id\" INTEGER NOT NULL \
             GENERATED BY DEFAULT AS IDENTITY(START WITH 1, INCREMENT BY 1), \
             \"size\" VARCHAR(255) CHECK (\"size\" IN ('S', 'M')), PRIMARY KEY (\"id\"));"
        );
    }

    #[test]
    fn test_on_update_is_rejected() {
        let attributes = [AttributeDescriptor::new("owner", DataType::integer()).references(
            ForeignKeyReference::new("owners", "id").on_update(ReferentialAction::Cascade),
        )];
        let err = db2()
            .create_table_query(
                &TableReference::new("pets"),
                &attributes,
                &CreateTableOptions::default(),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
    }

    #[test]
    fn test_table_exists_in_catalog() {
        assert_eq!(
            db2()
                .table_exists_query(&TableReference::new("myTable").with_schema("mySchema"))
                .unwrap(),
            "SELECT TABNAME FROM SYSCAT.TABLES WHERE TYPE = 'T' AND TABNAME = 'myTable' \
             AND TABSCHEMA = 'mySchema'"
        );
        assert_eq!(
            db2()
                .table_exists_query(&TableReference::new("myTable"))
                .unwrap(),
            "SELECT TABNAME FROM SYSCAT.TABLES WHERE TYPE = 'T' AND TABNAME = 'myTable' \
             AND TABSCHEMA = CURRENT SCHEMA"
        );
    }

    #[test]
    fn test_show_constraints_by_type() {
        let options = ShowConstraintsOptions {
            constraint_type: Some(ConstraintType::ForeignKey),
            ..ShowConstraintsOptions::default()
        };
        let sql = db2()
            .show_constraints_query(&TableReference::new("pets"), &options)
            .unwrap();
        assert!(sql.ends_with("AND TYPE = 'F' ORDER BY CONSTNAME"));
    }

    #[test]
    fn test_paging_and_transactions() {
        let options = SelectOptions {
            limit: Some(5),
            offset: Some(10),
            ..SelectOptions::default()
        };
        assert_eq!(
            db2()
                .select_query(&TableReference::new("t"), &options)
                .unwrap()
                .sql,
            "SELECT * FROM \"t\" OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"
        );
        assert!(db2().commit_transaction_query().is_err());
        assert_eq!(
            db2()
                .set_isolation_level_query(IsolationLevel::ReadCommitted)
                .unwrap(),
            "SET CURRENT ISOLATION = CS"
        );
    }
}
