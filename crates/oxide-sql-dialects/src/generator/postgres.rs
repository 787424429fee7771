//! PostgreSQL query generation.

use super::{excluded_names, logged, schema_literal, table_schema, IndexTarget, QueryGenerator};
use crate::capabilities::DialectKind;
use crate::config::DialectOptions;
use crate::error::Result;
use crate::escape::Escaper;
use crate::options::{
    ListDatabasesOptions, ListSchemasOptions, ListTablesOptions, OptionBag, RemoveIndexOptions,
    RenameTableOptions, TruncateOptions,
};
use crate::table::TableReference;

/// PostgreSQL dialect.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect {
    options: DialectOptions,
}

impl PostgresDialect {
    /// Creates a PostgreSQL generator.
    #[must_use]
    pub const fn new(options: DialectOptions) -> Self {
        Self { options }
    }
}

/// `column !~ '^pg_' [AND column NOT IN (...)]`.
fn user_schema_filter(e: &Escaper<'_>, column: &str, skip: &[String]) -> Result<String> {
    let mut filter = format!("{column} !~ '^pg_'");
    if let Some(excluded) = excluded_names(e, column, e.capabilities().technical_schemas, skip)? {
        filter.push_str(" AND ");
        filter.push_str(&excluded);
    }
    Ok(filter)
}

impl QueryGenerator for PostgresDialect {
    fn escaper(&self) -> Escaper<'_> {
        Escaper::new(DialectKind::Postgres.capabilities(), &self.options)
    }

    fn version_query(&self) -> Result<String> {
        let e = self.escaper();
        logged(&e, "version query", String::from("SHOW SERVER_VERSION"))
    }

    fn list_schemas_query(&self, options: &ListSchemasOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let sql = format!(
            "SELECT schema_name AS {} FROM information_schema.schemata WHERE {}",
            e.quote_identifier("schema"),
            user_schema_filter(&e, "schema_name", &options.skip)?
        );
        logged(&e, "list schemas query", sql)
    }

    fn list_databases_query(&self, options: &ListDatabasesOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let mut sql = format!(
            "SELECT datname AS {} FROM pg_database WHERE datistemplate = false",
            e.quote_identifier("name")
        );
        if let Some(filter) = excluded_names(
            &e,
            "datname",
            e.capabilities().technical_databases,
            &options.skip,
        )? {
            sql.push_str(" AND ");
            sql.push_str(&filter);
        }
        logged(&e, "list databases query", sql)
    }

    fn list_tables_query(&self, options: &ListTablesOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let filter = match &options.schema {
            Some(schema) => format!("table_schema = {}", e.escape_string(schema)?),
            None => user_schema_filter(&e, "table_schema", &[])?,
        };
        let sql = format!(
            "SELECT table_name AS {}, table_schema AS {} FROM information_schema.tables \
             WHERE table_type = 'BASE TABLE' AND {filter} ORDER BY table_schema, table_name",
            e.quote_identifier("tableName"),
            e.quote_identifier("schema")
        );
        logged(&e, "list tables query", sql)
    }

    fn describe_table_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT c.column_name AS {field}, c.column_default AS {default}, \
             c.is_nullable AS {null}, \
             (CASE WHEN c.udt_name = 'hstore' THEN c.udt_name ELSE c.data_type END) \
             || (CASE WHEN c.character_maximum_length IS NOT NULL \
             THEN '(' || c.character_maximum_length || ')' ELSE '' END) AS {ty}, \
             (SELECT array_agg(e.enumlabel) FROM pg_catalog.pg_type t \
             JOIN pg_catalog.pg_enum e ON t.oid = e.enumtypid WHERE t.typname = c.udt_name) AS {special}, \
             (SELECT pgd.description FROM pg_catalog.pg_statio_all_tables st \
             JOIN pg_catalog.pg_description pgd ON pgd.objoid = st.relid \
             WHERE c.ordinal_position = pgd.objsubid AND c.table_name = st.relname) AS {comment} \
             FROM information_schema.columns c \
             WHERE c.table_name = {table} AND c.table_schema = {schema} \
             ORDER BY c.ordinal_position",
            field = e.quote_identifier("Field"),
            default = e.quote_identifier("Default"),
            null = e.quote_identifier("Null"),
            ty = e.quote_identifier("Type"),
            special = e.quote_identifier("special"),
            comment = e.quote_identifier("Comment"),
            table = e.escape_string(&table.table_name)?,
            schema = schema_literal(&e, table)?,
        );
        logged(&e, "describe table query", sql)
    }

    fn show_indexes_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT i.relname AS {}, ix.indisprimary AS {}, ix.indisunique AS {}, \
             array_to_string(array_agg(a.attname), ',') AS {}, \
             pg_get_indexdef(ix.indexrelid) AS {} \
             FROM pg_class t JOIN pg_index ix ON t.oid = ix.indrelid \
             JOIN pg_class i ON i.oid = ix.indexrelid \
             JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(ix.indkey) \
             JOIN pg_namespace n ON n.oid = t.relnamespace \
             WHERE t.relkind = 'r' AND t.relname = {} AND n.nspname = {} \
             GROUP BY i.relname, ix.indexrelid, ix.indisprimary, ix.indisunique \
             ORDER BY i.relname",
            e.quote_identifier("name"),
            e.quote_identifier("primary"),
            e.quote_identifier("unique"),
            e.quote_identifier("columns"),
            e.quote_identifier("definition"),
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?
        );
        logged(&e, "show indexes query", sql)
    }

    fn rename_table_query(
        &self,
        before: &TableReference,
        after: &TableReference,
        options: &RenameTableOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let changes_schema = super::check_schema_change(&e, before, after, options)?;
        let mut statements = Vec::new();
        let mut current = before.clone();
        if changes_schema {
            let target = table_schema(&e, after).unwrap_or("public");
            statements.push(format!(
                "ALTER TABLE {} SET SCHEMA {};",
                e.quote_table(&current),
                e.quote_identifier(target)
            ));
            current.schema = Some(target.to_string());
        }
        if current.table_name != after.table_name {
            statements.push(format!(
                "ALTER TABLE {} RENAME TO {};",
                e.quote_table(&current),
                e.quote_identifier(&after.table_name)
            ));
        }
        logged(&e, "rename table query", statements.join(" "))
    }

    fn truncate_table_query(
        &self,
        table: &TableReference,
        options: &TruncateOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let mut sql = format!("TRUNCATE {}", e.quote_table(table));
        if options.restart_identity {
            sql.push_str(" RESTART IDENTITY");
        }
        if options.cascade {
            sql.push_str(" CASCADE");
        }
        logged(&e, "truncate table query", sql)
    }

    fn remove_index_query(
        &self,
        table: &TableReference,
        target: &IndexTarget,
        options: &RemoveIndexOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let index = TableReference {
            table_name: self.index_target_name(table, target),
            ..table.clone()
        };
        let mut sql = String::from("DROP INDEX ");
        if options.concurrently {
            sql.push_str("CONCURRENTLY ");
        }
        if options.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&e.quote_table(&index));
        if options.cascade {
            sql.push_str(" CASCADE");
        }
        logged(&e, "remove index query", sql)
    }
}
