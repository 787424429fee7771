//! SAP HANA query generation.
//!
//! Tables are column tables and the catalog lives in the `SYS` views.

use std::fmt::Write as _;

use super::{json_path, logged, schema_literal, JsonPathSegment, QueryGenerator};
use crate::attribute::AttributeDescriptor;
use crate::capabilities::DialectKind;
use crate::config::DialectOptions;
use crate::error::{DialectError, Result};
use crate::escape::Escaper;
use crate::options::{
    AddColumnOptions, CreateTableOptions, DropTableOptions, ListSchemasOptions, ListTablesOptions,
    OptionBag, RemoveColumnOptions, RenameTableOptions, ShowConstraintsOptions,
};
use crate::table::TableReference;

/// SAP HANA dialect.
#[derive(Debug, Clone, Default)]
pub struct HanaDialect {
    options: DialectOptions,
}

impl HanaDialect {
    /// Creates a HANA generator.
    #[must_use]
    pub const fn new(options: DialectOptions) -> Self {
        Self { options }
    }
}

fn user_schema_filter(e: &Escaper<'_>, column: &str, skip: &[String]) -> Result<String> {
    let mut filter = format!("{column} NOT LIKE '\\_SYS%' ESCAPE '\\'");
    if let Some(excluded) =
        super::excluded_names(e, column, e.capabilities().technical_schemas, skip)?
    {
        filter.push_str(" AND ");
        filter.push_str(&excluded);
    }
    Ok(filter)
}

impl QueryGenerator for HanaDialect {
    fn escaper(&self) -> Escaper<'_> {
        Escaper::new(DialectKind::Hana.capabilities(), &self.options)
    }

    fn version_query(&self) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT VERSION AS {} FROM SYS.M_DATABASE",
            e.quote_identifier("version")
        );
        logged(&e, "version query", sql)
    }

    fn list_schemas_query(&self, options: &ListSchemasOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let sql = format!(
            "SELECT SCHEMA_NAME AS {} FROM SYS.SCHEMAS WHERE {}",
            e.quote_identifier("schema"),
            user_schema_filter(&e, "SCHEMA_NAME", &options.skip)?
        );
        logged(&e, "list schemas query", sql)
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
        let mut statements = vec![format!(
            "CREATE COLUMN TABLE {} ({body});",
            e.quote_table(table)
        )];
        statements.extend(self.comment_statements(table, attributes, options)?);
        logged(&e, "create table query", statements.join(" "))
    }

    fn drop_table_query(
        &self,
        table: &TableReference,
        options: &DropTableOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        logged(
            &e,
            "drop table query",
            format!("DROP TABLE {}", e.quote_table(table)),
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

    fn describe_table_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT COLUMN_NAME AS {}, DATA_TYPE_NAME AS {}, LENGTH AS {}, IS_NULLABLE AS {}, \
             DEFAULT_VALUE AS {}, COMMENTS AS {} FROM SYS.TABLE_COLUMNS \
             WHERE TABLE_NAME = {} AND SCHEMA_NAME = {} ORDER BY POSITION",
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

    fn list_tables_query(&self, options: &ListTablesOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let filter = match &options.schema {
            Some(schema) => format!("SCHEMA_NAME = {}", e.escape_string(schema)?),
            None => user_schema_filter(&e, "SCHEMA_NAME", &[])?,
        };
        let sql = format!(
            "SELECT TABLE_NAME AS {}, SCHEMA_NAME AS {} FROM SYS.TABLES \
             WHERE IS_SYSTEM_TABLE = 'FALSE' AND IS_TEMPORARY = 'FALSE' AND {filter} \
             ORDER BY SCHEMA_NAME, TABLE_NAME",
            e.quote_identifier("tableName"),
            e.quote_identifier("schema")
        );
        logged(&e, "list tables query", sql)
    }

    fn table_exists_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT TABLE_NAME FROM SYS.TABLES WHERE TABLE_NAME = {} AND SCHEMA_NAME = {}",
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?
        );
        logged(&e, "table exists query", sql)
    }

    fn add_column_query(
        &self,
        table: &TableReference,
        attribute: &AttributeDescriptor,
        options: &AddColumnOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let mut statements = vec![format!(
            "ALTER TABLE {} ADD ({} {});",
            e.quote_table(table),
            e.quote_identifier(&attribute.name),
            self.attribute_sql(table, attribute, false)?
        )];
        statements.extend(self.comment_statements(
            table,
            std::slice::from_ref(attribute),
            &CreateTableOptions::default(),
        )?);
        logged(&e, "add column query", statements.join(" "))
    }

    fn remove_column_query(
        &self,
        table: &TableReference,
        column: &str,
        options: &RemoveColumnOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let sql = format!(
            "ALTER TABLE {} DROP ({});",
            e.quote_table(table),
            e.quote_identifier(column)
        );
        logged(&e, "remove column query", sql)
    }

    fn show_constraints_query(
        &self,
        table: &TableReference,
        options: &ShowConstraintsOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let q = |name: &str| e.quote_identifier(name);
        let mut sql = format!(
            "SELECT * FROM (\
             SELECT SCHEMA_NAME AS {schema}, CONSTRAINT_NAME AS {name}, \
             CASE WHEN IS_PRIMARY_KEY = 'TRUE' THEN 'PRIMARY KEY' \
             WHEN IS_UNIQUE_KEY = 'TRUE' THEN 'UNIQUE' ELSE 'CHECK' END AS {kind}, \
             SCHEMA_NAME AS {table_schema}, TABLE_NAME AS {table_name}, COLUMN_NAME AS {column} \
             FROM SYS.CONSTRAINTS \
             UNION ALL \
             SELECT SCHEMA_NAME, CONSTRAINT_NAME, 'FOREIGN KEY', SCHEMA_NAME, TABLE_NAME, COLUMN_NAME \
             FROM SYS.REFERENTIAL_CONSTRAINTS) c \
             WHERE c.{table_name} = {} AND c.{table_schema} = {}",
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?,
            schema = q("constraintSchema"),
            name = q("constraintName"),
            kind = q("constraintType"),
            table_schema = q("tableSchema"),
            table_name = q("tableName"),
            column = q("columnName"),
        );
        if let Some(name) = &options.constraint_name {
            let _ = write!(
                sql,
                " AND c.{} = {}",
                q("constraintName"),
                e.escape_string(name)?
            );
        }
        if let Some(kind) = options.constraint_type {
            let _ = write!(
                sql,
                " AND c.{} = {}",
                q("constraintType"),
                e.escape_string(kind.as_sql())?
            );
        }
        if let Some(name) = &options.column_name {
            let _ = write!(
                sql,
                " AND c.{} = {}",
                q("columnName"),
                e.escape_string(name)?
            );
        }
        let _ = write!(sql, " ORDER BY c.{}", q("constraintName"));
        logged(&e, "show constraints query", sql)
    }

    fn show_indexes_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT INDEX_NAME AS {}, COLUMN_NAME AS {}, CONSTRAINT AS {} FROM SYS.INDEX_COLUMNS \
             WHERE TABLE_NAME = {} AND SCHEMA_NAME = {} ORDER BY INDEX_NAME, POSITION",
            e.quote_identifier("name"),
            e.quote_identifier("column"),
            e.quote_identifier("constraint"),
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?
        );
        logged(&e, "show indexes query", sql)
    }

    fn json_path_extraction_query(
        &self,
        column: &str,
        path: &[JsonPathSegment],
        unquote: bool,
    ) -> Result<String> {
        let e = self.escaper();
        if path.is_empty() {
            return Err(DialectError::invalid("a JSON path needs at least one segment"));
        }
        let function = if unquote { "JSON_VALUE" } else { "JSON_QUERY" };
        Ok(format!(
            "{function}({}, {})",
            e.quote_identifiers(column),
            e.escape_string(&json_path(path))?
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::DataType;
    use crate::error::ErrorKind;
    use crate::options::{ConstraintType, StartTransactionOptions};

    fn hana() -> HanaDialect {
        HanaDialect::default()
    }

    #[test]
    fn test_create_column_table_with_identity() {
        let attributes = [
            AttributeDescriptor::new("id", DataType::integer())
                .primary_key()
                .auto_increment(),
            AttributeDescriptor::new("name", DataType::string()).comment("display name"),
        ];
        let sql = hana()
            .create_table_query(
                &TableReference::new("people").with_schema("APP"),
                &attributes,
                &CreateTableOptions::default(),
            )
            .unwrap();
        assert_eq!(
            sql,
            "CREATE COLUMN TABLE \"APP\".\"people\" (\"id\" INTEGER NOT NULL \
             GENERATED BY DEFAULT AS IDENTITY, \"name\" NVARCHAR(255), PRIMARY KEY (\"id\")); \
             COMMENT ON COLUMN \"APP\".\"people\".\"name\" IS 'display name';"
        );
    }

    #[test]
    fn test_column_alterations_use_parentheses() {
        let table = TableReference::new("people");
        assert_eq!(
            hana()
                .add_column_query(
                    &table,
                    &AttributeDescriptor::new("age", DataType::integer()),
                    &AddColumnOptions::default()
                )
                .unwrap(),
            "ALTER TABLE \"people\" ADD (\"age\" INTEGER);"
        );
        assert_eq!(
            hana()
                .remove_column_query(&table, "age", &RemoveColumnOptions::default())
                .unwrap(),
            "ALTER TABLE \"people\" DROP (\"age\");"
        );
    }

    #[test]
    fn test_list_schemas_hides_system_schemas() {
        let options = ListSchemasOptions {
            skip: vec![String::from("STAGING")],
        };
        assert_eq!(
            hana().list_schemas_query(&options).unwrap(),
            "SELECT SCHEMA_NAME AS \"schema\" FROM SYS.SCHEMAS \
             WHERE SCHEMA_NAME NOT LIKE '\\_SYS%' ESCAPE '\\' AND SCHEMA_NAME NOT IN \
             ('SYS', 'SYSTEM', 'PUBLIC', '_SYS_BI', '_SYS_BIC', '_SYS_REPO', '_SYS_STATISTICS', 'STAGING')"
        );
    }

    #[test]
    fn test_show_constraints_filters_union() {
        let options = ShowConstraintsOptions {
            constraint_type: Some(ConstraintType::ForeignKey),
            ..ShowConstraintsOptions::default()
        };
        let sql = hana()
            .show_constraints_query(&TableReference::new("people").with_schema("APP"), &options)
            .unwrap();
        assert!(sql.starts_with("SELECT * FROM (SELECT SCHEMA_NAME AS \"constraintSchema\""));
        assert!(sql.contains("UNION ALL SELECT SCHEMA_NAME, CONSTRAINT_NAME, 'FOREIGN KEY'"));
        assert!(sql.ends_with(
            "WHERE c.\"tableName\" = 'people' AND c.\"tableSchema\" = 'APP' \
             AND c.\"constraintType\" = 'FOREIGN KEY' ORDER BY c.\"constraintName\""
        ));
    }

    #[test]
    fn test_json_value_and_query() {
        let path = [JsonPathSegment::from("address"), JsonPathSegment::from("city")];
        assert_eq!(
            hana().json_path_extraction_query("doc", &path, true).unwrap(),
            "JSON_VALUE(\"doc\", '$.address.city')"
        );
        assert_eq!(
            hana().json_path_extraction_query("doc", &path, false).unwrap(),
            "JSON_QUERY(\"doc\", '$.address.city')"
        );
    }

    #[test]
    fn test_transactions_belong_to_the_connection() {
        let err = hana()
            .start_transaction_query(&StartTransactionOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
    }
}
