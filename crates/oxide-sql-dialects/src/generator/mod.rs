//! Query Generator.
//!
//! [`QueryGenerator`] has one method per SQL operation. The default
//! methods assemble SQL from the capability table alone; each dialect
//! module overrides the methods whose statement skeleton differs. Every
//! entry point validates its options bag first, so an unsupported option
//! fails before any SQL is built.

mod db2;
mod hana;
mod ibmi;
mod json_path;
mod mssql;
mod mysql;
mod naming;
mod postgres;
mod snowflake;
mod sqlite;
mod where_clause;

pub use db2::Db2Dialect;
pub use hana::HanaDialect;
pub use ibmi::IbmiDialect;
pub use json_path::{json_path, JsonPathSegment};
pub use mssql::MsSqlDialect;
pub use mysql::MySqlDialect;
pub use naming::index_name;
pub use postgres::PostgresDialect;
pub use snowflake::SnowflakeDialect;
pub use sqlite::SqliteDialect;
pub use where_clause::{ComparisonOp, WhereClause};

pub(crate) use where_clause::ValueWriter;

use std::fmt::{self, Write as _};

use tracing::debug;

use crate::attribute::{AttributeDescriptor, ForeignKeyReference, Unique};
use crate::capabilities::{
    AutoIncrementStyle, DialectCapabilities, DialectKind, EmptyInsertStyle, EnumStrategy,
    IgnoreDuplicatesStyle, JsonExtractionStyle, LimitStyle, ReturningStyle,
    TransactionControl, UpsertStyle,
};
use crate::config::{DialectOptions, TransactionType};
use crate::data_types::{DataType, DefaultValue, EnumType, IntegerKind};
use crate::error::{DialectError, Result};
use crate::escape::Escaper;
use crate::options::{
    AddColumnOptions, AddConstraintOptions, AddIndexOptions, ConstraintChecking,
    ConstraintDefinition, CreateSchemaOptions, CreateTableOptions, DeleteOptions,
    DropSchemaOptions, DropTableOptions, IndexHintKind, InsertOptions, IsolationLevel,
    ListDatabasesOptions, ListSchemasOptions, ListTablesOptions, OptionBag, QuoteTableOptions,
    RemoveColumnOptions, RemoveConstraintOptions, RemoveIndexOptions, RenameTableOptions,
    SelectOptions, ShowConstraintsOptions, StartTransactionOptions, TruncateOptions,
    UpdateOptions,
};
use crate::table::TableReference;
use crate::value::Value;

/// A statement with the values of its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    /// SQL text.
    pub sql: String,
    /// Bind parameters; empty when values are inlined.
    pub bind: Vec<Value>,
}

/// The index `remove_index_query` drops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexTarget {
    /// An explicit index name.
    Name(String),
    /// The fields the index was created on; the name is derived the same
    /// way `add_index_query` derives it.
    Fields(Vec<String>),
}

/// SQL generation for one dialect.
pub trait QueryGenerator: fmt::Debug + Send + Sync {
    /// Returns the escaper bound to the dialect and its options.
    fn escaper(&self) -> Escaper<'_>;

    /// Returns the dialect name.
    fn dialect_name(&self) -> &'static str {
        self.escaper().dialect_name()
    }

    /// Returns the capability table.
    fn capabilities(&self) -> &'static DialectCapabilities {
        self.escaper().capabilities()
    }

    // ------------------------------------------------------------------
    // Schemas and databases
    // ------------------------------------------------------------------

    /// Generates CREATE SCHEMA.
    fn create_schema_query(&self, schema: &str, options: &CreateSchemaOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        require_schemas(&e)?;
        if options.replace && options.if_not_exists {
            return Err(DialectError::invalid(
                "replace and ifNotExists cannot be used together",
            ));
        }

        let mut sql = String::from("CREATE ");
        if options.replace {
            sql.push_str("OR REPLACE ");
        }
        sql.push_str("SCHEMA ");
        if options.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&e.quote_identifier(schema));
        if let Some(owner) = &options.authorization {
            sql.push_str(" AUTHORIZATION ");
            sql.push_str(&e.quote_identifier(owner));
        }
        if let Some(charset) = &options.charset {
            sql.push_str(" DEFAULT CHARACTER SET ");
            sql.push_str(&keyword("charset", charset)?);
        }
        if let Some(collate) = &options.collate {
            sql.push_str(" DEFAULT COLLATE ");
            sql.push_str(&keyword("collate", collate)?);
        }
        if let Some(comment) = &options.comment {
            sql.push_str(&self.schema_comment_sql(&e.escape_string(comment)?));
        }
        logged(&e, "create schema query", sql)
    }

    /// The comment clause of CREATE SCHEMA, given the escaped comment.
    fn schema_comment_sql(&self, literal: &str) -> String {
        format!(" COMMENT {literal}")
    }

    /// Generates DROP SCHEMA.
    fn drop_schema_query(&self, schema: &str, options: &DropSchemaOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        require_schemas(&e)?;
        let mut sql = String::from("DROP SCHEMA ");
        if options.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&e.quote_identifier(schema));
        if options.cascade {
            sql.push_str(" CASCADE");
        }
        logged(&e, "drop schema query", sql)
    }

    /// Lists user schemas. Technical schemas and `options.skip` are left out.
    fn list_schemas_query(&self, options: &ListSchemasOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        require_schemas(&e)?;
        let mut sql = format!(
            "SELECT SCHEMA_NAME AS {} FROM INFORMATION_SCHEMA.SCHEMATA",
            e.quote_identifier("schema")
        );
        if let Some(filter) = excluded_names(
            &e,
            "SCHEMA_NAME",
            e.capabilities().technical_schemas,
            &options.skip,
        )? {
            sql.push_str(" WHERE ");
            sql.push_str(&filter);
        }
        logged(&e, "list schemas query", sql)
    }

    /// Lists databases. Only dialects with several databases per server
    /// implement this.
    fn list_databases_query(&self, options: &ListDatabasesOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        Err(DialectError::unsupported(
            e.dialect_name(),
            "listing databases",
        ))
    }

    /// Selects the server version as `version`.
    fn version_query(&self) -> Result<String> {
        let e = self.escaper();
        let sql = format!("SELECT VERSION() AS {}", e.quote_identifier("version"));
        logged(&e, "version query", sql)
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    /// Generates CREATE TABLE, followed by any comment statements.
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
            "CREATE TABLE IF NOT EXISTS {} ({body});",
            e.quote_table(table)
        )];
        statements.extend(self.comment_statements(table, attributes, options)?);
        logged(&e, "create table query", statements.join(" "))
    }

    /// Column definitions and table constraints, without parentheses.
    fn table_body(
        &self,
        table: &TableReference,
        attributes: &[AttributeDescriptor],
        options: &CreateTableOptions,
    ) -> Result<String> {
        if attributes.is_empty() {
            return Err(DialectError::invalid("a table needs at least one column"));
        }
        let e = self.escaper();
        let primary_keys: Vec<&str> = attributes
            .iter()
            .filter(|a| a.primary_key)
            .map(|a| a.name.as_str())
            .collect();
        let inline_primary_key = primary_keys.len() == 1
            && e.capabilities().auto_increment == AutoIncrementStyle::RowidAlias;

        let mut parts = Vec::with_capacity(attributes.len() + 2);
        let mut foreign_keys = Vec::new();
        for attribute in attributes {
            let definition =
                self.attribute_sql(table, attribute, inline_primary_key && attribute.primary_key)?;
            parts.push(format!(
                "{} {definition}",
                e.quote_identifier(&attribute.name)
            ));
            if !self.foreign_keys_inline() {
                if let Some(reference) = &attribute.references {
                    foreign_keys.push(format!(
                        "FOREIGN KEY ({}) {}",
                        e.quote_identifier(&attribute.name),
                        self.references_sql(reference)?
                    ));
                }
            }
        }

        if !primary_keys.is_empty() && !inline_primary_key {
            parts.push(format!("PRIMARY KEY ({})", quoted_list(&e, primary_keys.as_slice())));
        }

        let mut unique_groups: Vec<(String, Vec<&str>)> = Vec::new();
        for attribute in attributes {
            if let Some(Unique::Group(name)) = &attribute.unique {
                match unique_groups.iter_mut().find(|(group, _)| group == name) {
                    Some((_, fields)) => fields.push(&attribute.name),
                    None => unique_groups.push((name.clone(), vec![attribute.name.as_str()])),
                }
            }
        }
        for key in &options.unique_keys {
            if key.fields.is_empty() {
                return Err(DialectError::invalid("a unique key needs at least one field"));
            }
            let name = key.name.clone().unwrap_or_else(|| {
                naming::constraint_name(
                    &table.table_name,
                    key.fields.as_slice(),
                    "uk",
                    e.max_identifier_length(),
                )
            });
            unique_groups.push((name, key.fields.iter().map(String::as_str).collect()));
        }
        for (name, fields) in unique_groups {
            parts.push(format!(
                "CONSTRAINT {} UNIQUE ({})",
                e.quote_identifier(&name),
                quoted_list(&e, fields.as_slice())
            ));
        }

        parts.extend(foreign_keys);
        Ok(parts.join(", "))
    }

    /// Whether foreign keys are written on the column rather than as a
    /// table constraint.
    fn foreign_keys_inline(&self) -> bool {
        true
    }

    /// Whether column comments are part of the column definition.
    fn inline_column_comments(&self) -> bool {
        false
    }

    /// Statements that attach table and column comments.
    fn comment_statements(
        &self,
        table: &TableReference,
        attributes: &[AttributeDescriptor],
        options: &CreateTableOptions,
    ) -> Result<Vec<String>> {
        let e = self.escaper();
        let quoted = e.quote_table(table);
        let mut statements = Vec::new();
        if let Some(comment) = &options.comment {
            statements.push(format!(
                "COMMENT ON TABLE {quoted} IS {};",
                e.escape_string(comment)?
            ));
        }
        for attribute in attributes {
            if let Some(comment) = &attribute.comment {
                statements.push(format!(
                    "COMMENT ON COLUMN {quoted}.{} IS {};",
                    e.quote_identifier(&attribute.name),
                    e.escape_string(comment)?
                ));
            }
        }
        Ok(statements)
    }

    /// The definition of one column, without its name.
    fn attribute_sql(
        &self,
        table: &TableReference,
        attribute: &AttributeDescriptor,
        inline_primary_key: bool,
    ) -> Result<String> {
        let e = self.escaper();
        let caps = e.capabilities();
        let mut sql = self.data_type_sql(table, attribute)?;

        if !attribute.allow_null {
            sql.push_str(" NOT NULL");
        }
        if attribute.auto_increment {
            if let AutoIncrementStyle::Keyword(clause) | AutoIncrementStyle::Identity(clause) =
                caps.auto_increment
            {
                sql.push(' ');
                sql.push_str(clause);
            }
        } else if let Some(default) = &attribute.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default_sql(&e, attribute, default)?);
        }
        if attribute.unique == Some(Unique::Column) {
            sql.push_str(" UNIQUE");
        }
        if inline_primary_key {
            sql.push_str(" PRIMARY KEY");
            if attribute.auto_increment && caps.auto_increment == AutoIncrementStyle::RowidAlias {
                sql.push_str(" AUTOINCREMENT");
            }
        }
        if caps.data_types.enums == EnumStrategy::Check {
            if let DataType::Enum(enum_type) = &attribute.data_type {
                let _ = write!(
                    sql,
                    " CHECK ({} IN {})",
                    e.quote_identifier(&attribute.name),
                    enum_type.escaped_values(&e)?
                );
            }
        }
        if self.inline_column_comments() {
            if let Some(comment) = &attribute.comment {
                sql.push_str(" COMMENT ");
                sql.push_str(&e.escape_string(comment)?);
            }
        }
        if self.foreign_keys_inline() {
            if let Some(reference) = &attribute.references {
                sql.push(' ');
                sql.push_str(&self.references_sql(reference)?);
            }
        }
        Ok(sql)
    }

    /// The column type. Serial types replace auto-increment integers and
    /// unnamed enum types get a name derived from the table and column.
    fn data_type_sql(
        &self,
        table: &TableReference,
        attribute: &AttributeDescriptor,
    ) -> Result<String> {
        let e = self.escaper();
        let caps = e.capabilities();
        match &attribute.data_type {
            DataType::Integer(integer)
                if attribute.auto_increment && caps.auto_increment == AutoIncrementStyle::Serial =>
            {
                Ok(String::from(match integer.kind {
                    IntegerKind::BigInt => "BIGSERIAL",
                    IntegerKind::TinyInt | IntegerKind::SmallInt => "SMALLSERIAL",
                    IntegerKind::MediumInt | IntegerKind::Integer => "SERIAL",
                }))
            }
            DataType::Enum(enum_type) if caps.data_types.enums == EnumStrategy::NamedType => {
                Ok(enum_type_sql(&e, table, &attribute.name, enum_type))
            }
            data_type => data_type.to_sql(&e),
        }
    }

    /// `REFERENCES table (key)` with its actions.
    fn references_sql(&self, reference: &ForeignKeyReference) -> Result<String> {
        let e = self.escaper();
        let caps = e.capabilities();
        let mut sql = format!(
            "REFERENCES {} ({})",
            e.quote_table(&reference.table),
            e.quote_identifier(&reference.key)
        );
        if let Some(action) = reference.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.as_sql());
        }
        if let Some(action) = reference.on_update {
            if !caps.foreign_key_on_update {
                return Err(DialectError::unsupported(
                    caps.name,
                    "ON UPDATE actions on foreign keys",
                ));
            }
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.as_sql());
        }
        if let Some(deferrable) = reference.deferrable {
            require_deferrable(&e)?;
            sql.push(' ');
            sql.push_str(deferrable.as_sql());
        }
        Ok(sql)
    }

    /// Generates DROP TABLE.
    fn drop_table_query(
        &self,
        table: &TableReference,
        options: &DropTableOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let mut sql = format!("DROP TABLE IF EXISTS {}", e.quote_table(table));
        if options.cascade {
            sql.push_str(" CASCADE");
        }
        logged(&e, "drop table query", sql)
    }

    /// Renames a table. Moving it to another schema needs `change_schema`.
    fn rename_table_query(
        &self,
        before: &TableReference,
        after: &TableReference,
        options: &RenameTableOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        check_schema_change(&e, before, after, options)?;
        let sql = format!(
            "ALTER TABLE {} RENAME TO {}",
            e.quote_table(before),
            e.quote_table(after)
        );
        logged(&e, "rename table query", sql)
    }

    /// Describes the columns of a table.
    fn describe_table_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT COLUMN_NAME AS {}, DATA_TYPE AS {}, IS_NULLABLE AS {}, COLUMN_DEFAULT AS {}, \
             CHARACTER_MAXIMUM_LENGTH AS {} FROM INFORMATION_SCHEMA.COLUMNS \
             WHERE TABLE_NAME = {} AND TABLE_SCHEMA = {} ORDER BY ORDINAL_POSITION",
            e.quote_identifier("Field"),
            e.quote_identifier("Type"),
            e.quote_identifier("Null"),
            e.quote_identifier("Default"),
            e.quote_identifier("Length"),
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?
        );
        logged(&e, "describe table query", sql)
    }

    /// Lists user tables with their schema.
    fn list_tables_query(&self, options: &ListTablesOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let mut sql = format!(
            "SELECT TABLE_NAME AS {}, TABLE_SCHEMA AS {} FROM INFORMATION_SCHEMA.TABLES \
             WHERE TABLE_TYPE = 'BASE TABLE'",
            e.quote_identifier("tableName"),
            e.quote_identifier("schema")
        );
        match &options.schema {
            Some(schema) => {
                sql.push_str(" AND TABLE_SCHEMA = ");
                sql.push_str(&e.escape_string(schema)?);
            }
            None => {
                if let Some(filter) =
                    excluded_names(&e, "TABLE_SCHEMA", e.capabilities().technical_schemas, &[])?
                {
                    sql.push_str(" AND ");
                    sql.push_str(&filter);
                }
            }
        }
        sql.push_str(" ORDER BY TABLE_SCHEMA, TABLE_NAME");
        logged(&e, "list tables query", sql)
    }

    /// Selects the table name when the table exists.
    fn table_exists_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        let sql = format!(
            "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = 'BASE TABLE' \
             AND TABLE_NAME = {} AND TABLE_SCHEMA = {}",
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?
        );
        logged(&e, "table exists query", sql)
    }

    /// Generates TRUNCATE.
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
            format!("TRUNCATE TABLE {}", e.quote_table(table)),
        )
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    /// Adds a column.
    fn add_column_query(
        &self,
        table: &TableReference,
        attribute: &AttributeDescriptor,
        options: &AddColumnOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let quoted = e.quote_table(table);
        let column = e.quote_identifier(&attribute.name);
        let mut sql = format!("ALTER TABLE {quoted} ADD COLUMN ");
        if options.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&column);
        sql.push(' ');
        sql.push_str(&self.attribute_sql(table, attribute, false)?);
        if !self.foreign_keys_inline() {
            if let Some(reference) = &attribute.references {
                let _ = write!(
                    sql,
                    ", ADD FOREIGN KEY ({column}) {}",
                    self.references_sql(reference)?
                );
            }
        }
        sql.push(';');
        let mut statements = vec![sql];
        statements.extend(self.comment_statements(
            table,
            std::slice::from_ref(attribute),
            &CreateTableOptions::default(),
        )?);
        logged(&e, "add column query", statements.join(" "))
    }

    /// Drops a column.
    fn remove_column_query(
        &self,
        table: &TableReference,
        column: &str,
        options: &RemoveColumnOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        if !e.capabilities().remove_column {
            return Err(DialectError::unsupported(
                e.dialect_name(),
                "removing columns",
            ));
        }
        let mut sql = format!("ALTER TABLE {} DROP COLUMN ", e.quote_table(table));
        if options.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&e.quote_identifier(column));
        if options.cascade {
            sql.push_str(" CASCADE");
        }
        sql.push(';');
        logged(&e, "remove column query", sql)
    }

    // ------------------------------------------------------------------
    // Constraints
    // ------------------------------------------------------------------

    /// Adds a CHECK, UNIQUE, DEFAULT, PRIMARY KEY or FOREIGN KEY constraint.
    fn add_constraint_query(
        &self,
        table: &TableReference,
        options: &AddConstraintOptions,
    ) -> Result<String> {
        let e = self.escaper();
        let caps = e.capabilities();
        options.validate(caps)?;
        if !caps.add_constraint {
            return Err(DialectError::unsupported(caps.name, "adding constraints"));
        }
        if options.fields.is_empty() {
            return Err(DialectError::invalid("a constraint needs at least one field"));
        }
        let name = match (&options.name, &options.constraint) {
            (Some(name), _) => name.clone(),
            (None, ConstraintDefinition::ForeignKey(reference)) => naming::constraint_name(
                &table.table_name,
                options.fields.as_slice(),
                &format!("{}_fk", reference.table.table_name),
                e.max_identifier_length(),
            ),
            (None, constraint) => naming::constraint_name(
                &table.table_name,
                options.fields.as_slice(),
                constraint.name_suffix(),
                e.max_identifier_length(),
            ),
        };
        let columns = quoted_list(&e, options.fields.as_slice());
        let mut body = match &options.constraint {
            ConstraintDefinition::Check(predicate) => {
                format!("CHECK ({})", predicate.to_inline_sql(&e)?)
            }
            ConstraintDefinition::Unique => format!("UNIQUE ({columns})"),
            ConstraintDefinition::PrimaryKey => format!("PRIMARY KEY ({columns})"),
            ConstraintDefinition::Default(value) => {
                if !caps.default_constraint {
                    return Err(DialectError::unsupported(caps.name, "DEFAULT constraints"));
                }
                if options.fields.len() != 1 {
                    return Err(DialectError::invalid(
                        "a DEFAULT constraint applies to exactly one field",
                    ));
                }
                format!("DEFAULT {} FOR {columns}", e.escape(value, None)?)
            }
            ConstraintDefinition::ForeignKey(reference) => {
                format!("FOREIGN KEY ({columns}) {}", self.references_sql(reference)?)
            }
        };
        if let Some(deferrable) = options.deferrable {
            if matches!(
                options.constraint,
                ConstraintDefinition::Check(_) | ConstraintDefinition::Default(_)
            ) {
                return Err(DialectError::invalid(
                    "only UNIQUE, PRIMARY KEY and FOREIGN KEY constraints can be deferrable",
                ));
            }
            body.push(' ');
            body.push_str(deferrable.as_sql());
        }
        let sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} {body};",
            e.quote_table(table),
            e.quote_identifier(&name)
        );
        logged(&e, "add constraint query", sql)
    }

    /// Drops a constraint.
    fn remove_constraint_query(
        &self,
        table: &TableReference,
        name: &str,
        options: &RemoveConstraintOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        if !e.capabilities().remove_constraint {
            return Err(DialectError::unsupported(
                e.dialect_name(),
                "removing constraints",
            ));
        }
        let mut sql = format!("ALTER TABLE {} DROP CONSTRAINT ", e.quote_table(table));
        if options.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&e.quote_identifier(name));
        if options.cascade {
            sql.push_str(" CASCADE");
        }
        sql.push(';');
        logged(&e, "remove constraint query", sql)
    }

    /// Lists the constraints of a table.
    fn show_constraints_query(
        &self,
        table: &TableReference,
        options: &ShowConstraintsOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let sql = catalog_constraints_query(
            &e,
            table,
            options,
            "INFORMATION_SCHEMA.TABLE_CONSTRAINTS",
            "INFORMATION_SCHEMA.KEY_COLUMN_USAGE",
        )?;
        logged(&e, "show constraints query", sql)
    }

    /// Switches deferrable constraints between deferred and immediate.
    fn set_constraint_checking_query(&self, checking: &ConstraintChecking) -> Result<String> {
        let e = self.escaper();
        require_deferrable(&e)?;
        let (names, mode) = match checking {
            ConstraintChecking::Deferred(names) => (names, "DEFERRED"),
            ConstraintChecking::Immediate(names) => (names, "IMMEDIATE"),
        };
        let target = if names.is_empty() {
            String::from("ALL")
        } else {
            quoted_list(&e, names.as_slice())
        };
        logged(
            &e,
            "set constraint checking query",
            format!("SET CONSTRAINTS {target} {mode}"),
        )
    }

    // ------------------------------------------------------------------
    // Indexes
    // ------------------------------------------------------------------

    /// Derives the name of an index from the table and its fields.
    fn generate_index_name(
        &self,
        table: &TableReference,
        fields: &[String],
        prefix: Option<&str>,
        unique: bool,
    ) -> String {
        naming::index_name(
            table,
            fields,
            prefix,
            unique,
            self.escaper().max_identifier_length(),
        )
    }

    /// Generates CREATE INDEX.
    fn add_index_query(&self, table: &TableReference, options: &AddIndexOptions) -> Result<String> {
        let e = self.escaper();
        let caps = e.capabilities();
        options.validate(caps)?;
        require_indexes(&e)?;
        if options.fields.is_empty() {
            return Err(DialectError::invalid("an index needs at least one field"));
        }
        if options.unique && options.index_type.is_some() {
            return Err(DialectError::invalid(
                "unique and type cannot be used together",
            ));
        }

        let name = match &options.name {
            Some(name) => name.clone(),
            None => {
                let fields: Vec<String> = options.fields.iter().map(|f| f.name.clone()).collect();
                self.generate_index_name(table, &fields, options.prefix.as_deref(), options.unique)
            }
        };

        let mut fields = Vec::with_capacity(options.fields.len());
        for field in &options.fields {
            let mut sql = e.quote_identifier(&field.name);
            if let Some(collate) = field.collate.as_ref().or(options.collate.as_ref()) {
                sql.push_str(" COLLATE ");
                sql.push_str(&e.quote_identifier(collate));
            }
            if let Some(operator) = field.operator.as_ref().or(options.operator.as_ref()) {
                sql.push(' ');
                sql.push_str(&keyword("operator", operator)?);
            }
            if let Some(length) = field.length {
                let _ = write!(sql, "({length})");
            }
            if let Some(order) = field.order {
                sql.push(' ');
                sql.push_str(order.as_sql());
            }
            fields.push(sql);
        }

        let mut sql = String::from("CREATE ");
        if options.unique {
            sql.push_str("UNIQUE ");
        }
        if let Some(index_type) = &options.index_type {
            sql.push_str(&keyword("type", index_type)?.to_ascii_uppercase());
            sql.push(' ');
        }
        sql.push_str("INDEX ");
        if options.concurrently {
            sql.push_str("CONCURRENTLY ");
        }
        if options.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&e.quote_identifier(&name));
        let using = options
            .using
            .as_deref()
            .map(|method| keyword("using", method))
            .transpose()?;
        if let (Some(method), false) = (&using, caps.index_using_after_table) {
            sql.push_str(" USING ");
            sql.push_str(method);
        }
        sql.push_str(" ON ");
        sql.push_str(&e.quote_table(table));
        if let (Some(method), true) = (&using, caps.index_using_after_table) {
            sql.push_str(" USING ");
            sql.push_str(method);
        }
        let _ = write!(sql, " ({})", fields.join(", "));
        if let Some(parser) = &options.parser {
            sql.push_str(" WITH PARSER ");
            sql.push_str(&keyword("parser", parser)?);
        }
        if !options.include.is_empty() {
            let _ = write!(
                sql,
                " INCLUDE ({})",
                quoted_list(&e, options.include.as_slice())
            );
        }
        if let Some(predicate) = &options.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate.to_inline_sql(&e)?);
        }
        logged(&e, "add index query", sql)
    }

    /// Generates DROP INDEX.
    fn remove_index_query(
        &self,
        table: &TableReference,
        target: &IndexTarget,
        options: &RemoveIndexOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        require_indexes(&e)?;
        let name = self.index_target_name(table, target);
        let mut sql = String::from("DROP INDEX ");
        if options.concurrently {
            sql.push_str("CONCURRENTLY ");
        }
        if options.if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&e.quote_identifier(&name));
        if options.cascade {
            sql.push_str(" CASCADE");
        }
        logged(&e, "remove index query", sql)
    }

    /// The index name `target` designates.
    fn index_target_name(&self, table: &TableReference, target: &IndexTarget) -> String {
        match target {
            IndexTarget::Name(name) => name.clone(),
            IndexTarget::Fields(fields) => self.generate_index_name(table, fields, None, false),
        }
    }

    /// Lists the indexes of a table.
    fn show_indexes_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        require_indexes(&e)?;
        let sql = format!(
            "SELECT INDEX_NAME AS {}, COLUMN_NAME AS {} FROM INFORMATION_SCHEMA.STATISTICS \
             WHERE TABLE_NAME = {} AND TABLE_SCHEMA = {}",
            e.quote_identifier("name"),
            e.quote_identifier("column"),
            e.escape_string(&table.table_name)?,
            schema_literal(&e, table)?
        );
        logged(&e, "show indexes query", sql)
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    /// Starts a transaction.
    fn start_transaction_query(&self, options: &StartTransactionOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let sql = match e.capabilities().transactions {
            TransactionControl::Connection => return Err(transactions_unsupported(&e)),
            TransactionControl::Statements { use_begin: true } => {
                let mode = options
                    .transaction_type
                    .or(e.options().transaction_type)
                    .unwrap_or(TransactionType::Deferred);
                format!("BEGIN {} TRANSACTION", mode.as_sql())
            }
            TransactionControl::Statements { use_begin: false } => {
                if options.read_only {
                    String::from("START TRANSACTION READ ONLY")
                } else {
                    String::from("START TRANSACTION")
                }
            }
        };
        logged(&e, "start transaction query", sql)
    }

    /// Commits the current transaction.
    fn commit_transaction_query(&self) -> Result<String> {
        let e = self.escaper();
        if e.capabilities().transactions == TransactionControl::Connection {
            return Err(transactions_unsupported(&e));
        }
        logged(&e, "commit transaction query", String::from("COMMIT"))
    }

    /// Rolls the current transaction back.
    fn rollback_transaction_query(&self) -> Result<String> {
        let e = self.escaper();
        if e.capabilities().transactions == TransactionControl::Connection {
            return Err(transactions_unsupported(&e));
        }
        logged(&e, "rollback transaction query", String::from("ROLLBACK"))
    }

    /// Creates a savepoint.
    fn create_savepoint_query(&self, name: &str) -> Result<String> {
        let e = self.escaper();
        require_savepoints(&e)?;
        logged(
            &e,
            "create savepoint query",
            format!("SAVEPOINT {}", e.quote_identifier(name)),
        )
    }

    /// Rolls back to a savepoint.
    fn rollback_savepoint_query(&self, name: &str) -> Result<String> {
        let e = self.escaper();
        require_savepoints(&e)?;
        logged(
            &e,
            "rollback savepoint query",
            format!("ROLLBACK TO SAVEPOINT {}", e.quote_identifier(name)),
        )
    }

    /// Sets the isolation level of the next transaction.
    fn set_isolation_level_query(&self, level: IsolationLevel) -> Result<String> {
        let e = self.escaper();
        if !e.capabilities().isolation_levels {
            return Err(DialectError::unsupported(
                e.dialect_name(),
                "isolation levels",
            ));
        }
        logged(
            &e,
            "set isolation level query",
            format!("SET TRANSACTION ISOLATION LEVEL {}", level.as_sql()),
        )
    }

    // ------------------------------------------------------------------
    // Data manipulation
    // ------------------------------------------------------------------

    /// Quotes a table reference with its alias and hints.
    fn quote_table(&self, table: &TableReference, options: &QuoteTableOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let mut sql = e.quote_table(table);
        if let Some(alias) = &options.alias {
            sql.push_str(" AS ");
            sql.push_str(&e.quote_identifier(alias));
        }
        for hint in &options.index_hints {
            let kind = match hint.kind {
                IndexHintKind::Use => "USE",
                IndexHintKind::Force => "FORCE",
                IndexHintKind::Ignore => "IGNORE",
            };
            let _ = write!(
                sql,
                " {kind} INDEX ({})",
                quoted_list(&e, hint.values.as_slice())
            );
        }
        if !options.table_hints.is_empty() {
            let hints: Vec<&str> = options.table_hints.iter().map(|h| h.as_sql()).collect();
            let _ = write!(sql, " WITH ({})", hints.join(", "));
        }
        Ok(sql)
    }

    /// Inserts one row. An empty row inserts the column defaults.
    fn insert_query(
        &self,
        table: &TableReference,
        row: &[(&str, Value)],
        attributes: &[AttributeDescriptor],
        options: &InsertOptions,
    ) -> Result<BoundQuery> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let mut writer = ValueWriter::for_dml(e, attributes);
        let columns: Vec<&str> = row.iter().map(|(column, _)| *column).collect();
        let mut values = Vec::with_capacity(row.len());
        for (column, value) in row {
            values.push(writer.value(column, value)?);
        }
        let tuples = if row.is_empty() { Vec::new() } else { vec![values] };
        let sql = insert_statement(&e, table, &columns, &tuples, options, &mut writer)?;
        logged_bound(&e, "insert query", sql, writer)
    }

    /// Inserts several rows in one statement. Columns missing from a row
    /// take [`Self::missing_value_sql`].
    fn bulk_insert_query(
        &self,
        table: &TableReference,
        rows: &[Vec<(&str, Value)>],
        attributes: &[AttributeDescriptor],
        options: &InsertOptions,
    ) -> Result<BoundQuery> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        if rows.is_empty() {
            return Err(DialectError::invalid("bulk insert needs at least one row"));
        }
        let mut columns: Vec<&str> = Vec::new();
        for (column, _) in rows.iter().flatten() {
            if !columns.contains(column) {
                columns.push(column);
            }
        }
        if columns.is_empty() {
            return Err(DialectError::invalid("bulk insert rows have no columns"));
        }
        let mut writer = ValueWriter::for_dml(e, attributes);
        let mut tuples = Vec::with_capacity(rows.len());
        for row in rows {
            let mut tuple = Vec::with_capacity(columns.len());
            for column in &columns {
                match row.iter().find(|(name, _)| name == column) {
                    Some((_, value)) => tuple.push(writer.value(column, value)?),
                    None => tuple.push(self.missing_value_sql().to_string()),
                }
            }
            tuples.push(tuple);
        }
        let sql = insert_statement(&e, table, &columns, &tuples, options, &mut writer)?;
        logged_bound(&e, "bulk insert query", sql, writer)
    }

    /// Placeholder for a column a bulk-insert row does not set.
    fn missing_value_sql(&self) -> &'static str {
        "DEFAULT"
    }

    /// Updates the rows matching `filter`.
    fn update_query(
        &self,
        table: &TableReference,
        values: &[(&str, Value)],
        filter: Option<&WhereClause>,
        attributes: &[AttributeDescriptor],
        options: &UpdateOptions,
    ) -> Result<BoundQuery> {
        let e = self.escaper();
        let caps = e.capabilities();
        options.validate(caps)?;
        if values.is_empty() {
            return Err(DialectError::invalid("an update needs at least one value"));
        }
        let quoted = e.quote_table(table);
        let mut writer = ValueWriter::for_dml(e, attributes);
        let mut assignments = Vec::with_capacity(values.len());
        for (column, value) in values {
            assignments.push(format!(
                "{}={}",
                e.quote_identifier(column),
                writer.value(column, value)?
            ));
        }

        let mut sql = String::from("UPDATE");
        if options.ignore_duplicates {
            if let IgnoreDuplicatesStyle::Keyword(keyword) = caps.ignore_duplicates {
                sql.push(' ');
                sql.push_str(keyword);
            }
        }
        let _ = write!(sql, " {quoted} SET {}", assignments.join(","));
        if options.returning && caps.returning == ReturningStyle::Output {
            sql.push_str(" OUTPUT INSERTED.*");
        }
        let predicate = filter.map(|f| f.render(&mut writer)).transpose()?;
        match options.limit {
            Some(limit) => sql.push_str(&self.limited_rows_sql(&quoted, predicate, limit)),
            None => {
                if let Some(predicate) = predicate {
                    sql.push_str(" WHERE ");
                    sql.push_str(&predicate);
                }
            }
        }
        if options.returning && caps.returning == ReturningStyle::Returning {
            sql.push_str(" RETURNING *");
        }
        logged_bound(&e, "update query", sql, writer)
    }

    /// The WHERE and LIMIT tail of an UPDATE or DELETE limited to `limit`
    /// rows.
    fn limited_rows_sql(
        &self,
        _quoted_table: &str,
        predicate: Option<String>,
        limit: u64,
    ) -> String {
        match predicate {
            Some(predicate) => format!(" WHERE {predicate} LIMIT {limit}"),
            None => format!(" LIMIT {limit}"),
        }
    }

    /// Deletes the rows matching `filter`, or every row.
    fn bulk_delete_query(
        &self,
        table: &TableReference,
        filter: Option<&WhereClause>,
        options: &DeleteOptions,
    ) -> Result<BoundQuery> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let quoted = e.quote_table(table);
        let mut writer = ValueWriter::for_dml(e, &[]);
        let predicate = filter.map(|f| f.render(&mut writer)).transpose()?;
        let mut sql = format!("DELETE FROM {quoted}");
        match options.limit {
            Some(limit) => sql.push_str(&self.limited_rows_sql(&quoted, predicate, limit)),
            None => {
                if let Some(predicate) = predicate {
                    sql.push_str(" WHERE ");
                    sql.push_str(&predicate);
                }
            }
        }
        logged_bound(&e, "bulk delete query", sql, writer)
    }

    /// Selects rows.
    fn select_query(&self, table: &TableReference, options: &SelectOptions) -> Result<BoundQuery> {
        let e = self.escaper();
        let from = self.quote_table(table, &options.table)?;
        let columns = if options.attributes.is_empty() {
            String::from("*")
        } else {
            options
                .attributes
                .iter()
                .map(|a| e.quote_identifiers(a))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut writer = ValueWriter::for_dml(e, &[]);
        let mut sql = format!("SELECT {columns} FROM {from}");
        if let Some(filter) = &options.where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&filter.render(&mut writer)?);
        }
        if !options.order.is_empty() {
            let order: Vec<String> = options
                .order
                .iter()
                .map(|(column, order)| {
                    format!("{} {}", e.quote_identifiers(column), order.as_sql())
                })
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }
        sql.push_str(&self.limit_sql(options.limit, options.offset, !options.order.is_empty()));
        logged_bound(&e, "select query", sql, writer)
    }

    /// The LIMIT/OFFSET tail of a SELECT.
    fn limit_sql(&self, limit: Option<u64>, offset: Option<u64>, _ordered: bool) -> String {
        match self.capabilities().limit {
            LimitStyle::LimitOffset => match (limit, offset) {
                (Some(limit), Some(offset)) if offset > 0 => {
                    format!(" LIMIT {limit} OFFSET {offset}")
                }
                (Some(limit), _) => format!(" LIMIT {limit}"),
                (None, Some(offset)) if offset > 0 => self.offset_without_limit_sql(offset),
                (None, _) => String::new(),
            },
            LimitStyle::OffsetFetch => match (limit, offset) {
                (None, None) => String::new(),
                (limit, offset) => {
                    let mut sql = format!(" OFFSET {} ROWS", offset.unwrap_or(0));
                    if let Some(limit) = limit {
                        let _ = write!(sql, " FETCH NEXT {limit} ROWS ONLY");
                    }
                    sql
                }
            },
        }
    }

    /// An OFFSET without a LIMIT.
    fn offset_without_limit_sql(&self, offset: u64) -> String {
        format!(" OFFSET {offset}")
    }

    // ------------------------------------------------------------------
    // JSON and enum types
    // ------------------------------------------------------------------

    /// Extracts `path` from the JSON column `column`. With `unquote`,
    /// strings come back without their JSON quotes.
    fn json_path_extraction_query(
        &self,
        column: &str,
        path: &[JsonPathSegment],
        unquote: bool,
    ) -> Result<String> {
        let e = self.escaper();
        let expression = e.quote_identifiers(column);
        let sql = match e.capabilities().json_extraction {
            JsonExtractionStyle::Unsupported => {
                return Err(DialectError::unsupported(
                    e.dialect_name(),
                    "JSON path extraction",
                ));
            }
            JsonExtractionStyle::PathOperators => {
                if let [segment] = path {
                    let key = match segment {
                        JsonPathSegment::Index(index) => index.to_string(),
                        JsonPathSegment::Key(key) => e.escape_string(key)?,
                    };
                    format!("{expression}{}{key}", if unquote { "->>" } else { "->" })
                } else {
                    let keys = path
                        .iter()
                        .map(|segment| match segment {
                            JsonPathSegment::Index(index) => e.escape_string(&index.to_string()),
                            JsonPathSegment::Key(key) => e.escape_string(key),
                        })
                        .collect::<Result<Vec<_>>>()?;
                    format!(
                        "{expression}{}ARRAY[{}]::VARCHAR(255)[]",
                        if unquote { "#>>" } else { "#>" },
                        keys.join(",")
                    )
                }
            }
            JsonExtractionStyle::ExtractUnquoteFunction => {
                let extract = format!(
                    "json_extract({expression}, {})",
                    e.escape_string(&json_path(path))?
                );
                if unquote {
                    format!("json_unquote({extract})")
                } else {
                    extract
                }
            }
            JsonExtractionStyle::ExtractArrow => {
                let literal = e.escape_string(&json_path(path))?;
                if unquote {
                    format!("{expression}->>{literal}")
                } else {
                    format!("json_extract({expression}, {literal})")
                }
            }
            JsonExtractionStyle::JsonValue => {
                if !unquote {
                    return Err(DialectError::unsupported(
                        e.dialect_name(),
                        "JSON path extraction without unquoting",
                    ));
                }
                format!(
                    "JSON_VALUE({expression}, {})",
                    e.escape_string(&json_path(path))?
                )
            }
        };
        Ok(sql)
    }

    /// Creates the named type of an ENUM column.
    fn create_enum_query(
        &self,
        table: &TableReference,
        column: &str,
        enum_type: &EnumType,
    ) -> Result<String> {
        let e = self.escaper();
        require_named_enums(&e)?;
        let sql = format!(
            "CREATE TYPE {} AS ENUM{};",
            enum_type_sql(&e, table, column, enum_type),
            enum_type.escaped_values(&e)?
        );
        logged(&e, "create enum query", sql)
    }

    /// Drops the named type of an ENUM column.
    fn drop_enum_query(
        &self,
        table: &TableReference,
        column: &str,
        name: Option<&str>,
    ) -> Result<String> {
        let e = self.escaper();
        require_named_enums(&e)?;
        let type_name = name.map_or_else(
            || naming::enum_type_name(&table.table_name, column),
            str::to_string,
        );
        let sql = format!(
            "DROP TYPE IF EXISTS {};",
            e.quote_table(&TableReference {
                table_name: type_name,
                ..table.clone()
            })
        );
        logged(&e, "drop enum query", sql)
    }
}

/// Returns the generator of `kind`.
///
/// ```
/// use oxide_sql_dialects::{query_generator, DialectKind, DialectOptions, TableReference};
/// use oxide_sql_dialects::options::DropTableOptions;
///
/// let generator = query_generator(DialectKind::Postgres, DialectOptions::default());
/// let sql = generator
///     .drop_table_query(&TableReference::new("users"), &DropTableOptions { cascade: true })
///     .unwrap();
/// assert_eq!(sql, r#"DROP TABLE IF EXISTS "users" CASCADE"#);
/// ```
#[must_use]
pub fn query_generator(kind: DialectKind, options: DialectOptions) -> Box<dyn QueryGenerator> {
    match kind {
        DialectKind::Postgres => Box::new(PostgresDialect::new(options)),
        DialectKind::MySql => Box::new(MySqlDialect::new(options)),
        DialectKind::MariaDb => Box::new(MySqlDialect::mariadb(options)),
        DialectKind::MsSql => Box::new(MsSqlDialect::new(options)),
        DialectKind::Sqlite => Box::new(SqliteDialect::new(options)),
        DialectKind::Db2 => Box::new(Db2Dialect::new(options)),
        DialectKind::Snowflake => Box::new(SnowflakeDialect::new(options)),
        DialectKind::Ibmi => Box::new(IbmiDialect::new(options)),
        DialectKind::Hana => Box::new(HanaDialect::new(options)),
    }
}

pub(crate) fn logged(e: &Escaper<'_>, what: &str, sql: String) -> Result<String> {
    debug!(dialect = %e.dialect_name(), sql = %sql, "generated {what}");
    Ok(sql)
}

fn logged_bound(
    e: &Escaper<'_>,
    what: &str,
    sql: String,
    writer: ValueWriter<'_, '_>,
) -> Result<BoundQuery> {
    let bind = writer.into_values();
    debug!(
        dialect = %e.dialect_name(),
        sql = %sql,
        bind_count = bind.len(),
        "generated {what}"
    );
    Ok(BoundQuery { sql, bind })
}

/// Option values written into SQL as bare words, e.g. `ENGINE=InnoDB`.
pub(crate) fn keyword(option: &str, text: &str) -> Result<String> {
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(text.to_string())
    } else {
        Err(DialectError::invalid(format!(
            "{option} must be a single word, got '{text}'"
        )))
    }
}

pub(crate) fn quoted_list<S: AsRef<str>>(e: &Escaper<'_>, names: &[S]) -> String {
    names
        .iter()
        .map(|name| e.quote_identifier(name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The schema a table lives in: its own, the configured one, or the
/// dialect default.
pub(crate) fn table_schema<'x>(e: &Escaper<'x>, table: &'x TableReference) -> Option<&'x str> {
    table.schema.as_deref().or_else(|| e.default_schema())
}

/// The schema of `table` as a literal, or the dialect's current-schema
/// expression.
pub(crate) fn schema_literal(e: &Escaper<'_>, table: &TableReference) -> Result<String> {
    match table_schema(e, table) {
        Some(schema) => e.escape_string(schema),
        None => Ok(e.capabilities().current_schema_sql.to_string()),
    }
}

/// `column NOT IN (technical ∪ skip)`, or `None` when both are empty.
pub(crate) fn excluded_names(
    e: &Escaper<'_>,
    column: &str,
    technical: &[&str],
    skip: &[String],
) -> Result<Option<String>> {
    let mut names: Vec<&str> = technical.to_vec();
    for name in skip {
        if !names.contains(&name.as_str()) {
            names.push(name.as_str());
        }
    }
    if names.is_empty() {
        return Ok(None);
    }
    let literals = names
        .iter()
        .map(|name| e.escape_string(name))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(format!("{column} NOT IN ({})", literals.join(", "))))
}

fn check_schema_change(
    e: &Escaper<'_>,
    before: &TableReference,
    after: &TableReference,
    options: &RenameTableOptions,
) -> Result<bool> {
    let changes = table_schema(e, before) != table_schema(e, after);
    if changes && !options.change_schema {
        return Err(DialectError::invalid(
            "moving a table to another schema requires the changeSchema option",
        ));
    }
    Ok(changes)
}

/// Shared body of catalog-based constraint listings. `constraints` and
/// `key_usage` name the catalog views.
pub(crate) fn catalog_constraints_query(
    e: &Escaper<'_>,
    table: &TableReference,
    options: &ShowConstraintsOptions,
    constraints: &str,
    key_usage: &str,
) -> Result<String> {
    let mut sql = format!(
        "SELECT c.CONSTRAINT_SCHEMA AS {}, c.CONSTRAINT_NAME AS {}, c.CONSTRAINT_TYPE AS {}, \
         c.TABLE_SCHEMA AS {}, c.TABLE_NAME AS {} FROM {constraints} c \
         WHERE c.TABLE_NAME = {} AND c.TABLE_SCHEMA = {}",
        e.quote_identifier("constraintSchema"),
        e.quote_identifier("constraintName"),
        e.quote_identifier("constraintType"),
        e.quote_identifier("tableSchema"),
        e.quote_identifier("tableName"),
        e.escape_string(&table.table_name)?,
        schema_literal(e, table)?
    );
    if let Some(name) = &options.constraint_name {
        sql.push_str(" AND c.CONSTRAINT_NAME = ");
        sql.push_str(&e.escape_string(name)?);
    }
    if let Some(kind) = options.constraint_type {
        sql.push_str(" AND c.CONSTRAINT_TYPE = ");
        sql.push_str(&e.escape_string(kind.as_sql())?);
    }
    if let Some(column) = &options.column_name {
        let _ = write!(
            sql,
            " AND EXISTS (SELECT 1 FROM {key_usage} k WHERE k.CONSTRAINT_NAME = c.CONSTRAINT_NAME \
             AND k.TABLE_NAME = c.TABLE_NAME AND k.COLUMN_NAME = {})",
            e.escape_string(column)?
        );
    }
    sql.push_str(" ORDER BY c.CONSTRAINT_NAME");
    Ok(sql)
}

fn default_sql(
    e: &Escaper<'_>,
    attribute: &AttributeDescriptor,
    default: &DefaultValue,
) -> Result<String> {
    match default {
        DefaultValue::Null => Ok(String::from("NULL")),
        DefaultValue::RawSql(sql) => Ok(sql.clone()),
        DefaultValue::Value(value) => attribute.data_type.escape(value, e),
    }
}

/// The possibly schema-qualified name of an enum type.
fn enum_type_sql(
    e: &Escaper<'_>,
    table: &TableReference,
    column: &str,
    enum_type: &EnumType,
) -> String {
    let name = enum_type
        .name
        .clone()
        .unwrap_or_else(|| naming::enum_type_name(&table.table_name, column));
    e.quote_table(&TableReference {
        table_name: name,
        ..table.clone()
    })
}

fn insert_statement(
    e: &Escaper<'_>,
    table: &TableReference,
    columns: &[&str],
    tuples: &[Vec<String>],
    options: &InsertOptions,
    writer: &mut ValueWriter<'_, '_>,
) -> Result<String> {
    let caps = e.capabilities();
    if options.ignore_duplicates && !options.update_on_duplicate.is_empty() {
        return Err(DialectError::invalid(
            "ignoreDuplicates and updateOnDuplicate cannot be used together",
        ));
    }
    if !options.conflict_fields.is_empty()
        && !options.ignore_duplicates
        && options.update_on_duplicate.is_empty()
    {
        return Err(DialectError::invalid(
            "conflictFields needs ignoreDuplicates or updateOnDuplicate",
        ));
    }

    let mut sql = String::from("INSERT");
    if options.ignore_duplicates {
        if let IgnoreDuplicatesStyle::Keyword(keyword) = caps.ignore_duplicates {
            sql.push(' ');
            sql.push_str(keyword);
        }
    }
    sql.push_str(" INTO ");
    sql.push_str(&e.quote_table(table));
    if !columns.is_empty() {
        let _ = write!(sql, " ({})", quoted_list(e, columns));
    }
    if options.returning && caps.returning == ReturningStyle::Output {
        sql.push_str(" OUTPUT INSERTED.*");
    }

    if tuples.is_empty() {
        match caps.empty_insert {
            EmptyInsertStyle::DefaultValues => sql.push_str(" DEFAULT VALUES"),
            EmptyInsertStyle::EmptyValues => sql.push_str(" VALUES ()"),
            EmptyInsertStyle::Unsupported => {
                return Err(DialectError::unsupported(
                    caps.name,
                    "inserting a row without values",
                ));
            }
        }
    } else {
        let rendered: Vec<String> = tuples
            .iter()
            .map(|tuple| format!("({})", tuple.join(",")))
            .collect();
        sql.push_str(" VALUES ");
        sql.push_str(&rendered.join(","));
    }

    let conflict_target = if options.conflict_fields.is_empty() {
        String::new()
    } else {
        let mut target = format!(" ({})", quoted_list(e, options.conflict_fields.as_slice()));
        if let Some(predicate) = &options.conflict_where {
            target.push_str(" WHERE ");
            target.push_str(&predicate.render(writer)?);
        }
        target
    };

    if options.ignore_duplicates
        && caps.ignore_duplicates == IgnoreDuplicatesStyle::OnConflictDoNothing
    {
        let _ = write!(sql, " ON CONFLICT{conflict_target} DO NOTHING");
    }
    if !options.update_on_duplicate.is_empty() {
        match caps.upserts {
            UpsertStyle::OnConflict => {
                if options.conflict_fields.is_empty() {
                    return Err(DialectError::invalid(
                        "updateOnDuplicate needs conflictFields in this dialect",
                    ));
                }
                let assignments: Vec<String> = options
                    .update_on_duplicate
                    .iter()
                    .map(|column| {
                        let quoted = e.quote_identifier(column);
                        format!("{quoted}=EXCLUDED.{quoted}")
                    })
                    .collect();
                let _ = write!(
                    sql,
                    " ON CONFLICT{conflict_target} DO UPDATE SET {}",
                    assignments.join(",")
                );
            }
            UpsertStyle::OnDuplicateKey => {
                let assignments: Vec<String> = options
                    .update_on_duplicate
                    .iter()
                    .map(|column| {
                        let quoted = e.quote_identifier(column);
                        format!("{quoted}=VALUES({quoted})")
                    })
                    .collect();
                let _ = write!(
                    sql,
                    " ON DUPLICATE KEY UPDATE {}",
                    assignments.join(",")
                );
            }
            UpsertStyle::Unsupported => {
                return Err(DialectError::unsupported(caps.name, "upserts"));
            }
        }
    }
    if options.returning && caps.returning == ReturningStyle::Returning {
        sql.push_str(" RETURNING *");
    }
    sql.push(';');
    Ok(sql)
}

fn require_schemas(e: &Escaper<'_>) -> Result<()> {
    if e.capabilities().schemas {
        Ok(())
    } else {
        Err(DialectError::unsupported(e.dialect_name(), "schemas"))
    }
}

fn require_indexes(e: &Escaper<'_>) -> Result<()> {
    if e.capabilities().indexes {
        Ok(())
    } else {
        Err(DialectError::unsupported(e.dialect_name(), "indexes"))
    }
}

fn require_savepoints(e: &Escaper<'_>) -> Result<()> {
    if e.capabilities().savepoints {
        Ok(())
    } else {
        Err(DialectError::unsupported(e.dialect_name(), "savepoints"))
    }
}

fn require_deferrable(e: &Escaper<'_>) -> Result<()> {
    if e.capabilities().deferrable_constraints {
        Ok(())
    } else {
        Err(DialectError::unsupported(
            e.dialect_name(),
            "deferrable constraints",
        ))
    }
}

fn require_named_enums(e: &Escaper<'_>) -> Result<()> {
    if e.capabilities().data_types.enums == EnumStrategy::NamedType {
        Ok(())
    } else {
        Err(DialectError::unsupported(
            e.dialect_name(),
            "named ENUM types",
        ))
    }
}

fn transactions_unsupported(e: &Escaper<'_>) -> DialectError {
    DialectError::unsupported(
        e.dialect_name(),
        "transaction statements (use the connection's transaction API)",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn generator(kind: DialectKind) -> Box<dyn QueryGenerator> {
        query_generator(kind, DialectOptions::default())
    }

    #[test]
    fn test_every_dialect_has_a_generator() {
        for kind in DialectKind::ALL {
            assert_eq!(generator(kind).dialect_name(), kind.name());
        }
    }

    #[test]
    fn test_unsupported_option_fails_before_building() {
        let err = generator(DialectKind::MsSql)
            .truncate_table_query(
                &TableReference::new("users"),
                &TruncateOptions {
                    cascade: true,
                    restart_identity: false,
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOption);
    }

    #[test]
    fn test_schema_less_dialect_rejects_schema_operations() {
        let err = generator(DialectKind::Sqlite)
            .create_schema_query("app", &CreateSchemaOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
    }

    #[test]
    fn test_keyword_rejects_injection() {
        assert_eq!(keyword("engine", "InnoDB").unwrap(), "InnoDB");
        let err = keyword("engine", "InnoDB; DROP TABLE x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_excluded_names_unions_skip_list() {
        let options = DialectOptions::default();
        let e = Escaper::new(DialectKind::Postgres.capabilities(), &options);
        let filter = excluded_names(
            &e,
            "schema_name",
            &["information_schema"],
            &[String::from("audit"), String::from("information_schema")],
        )
        .unwrap();
        assert_eq!(
            filter.as_deref(),
            Some("schema_name NOT IN ('information_schema', 'audit')")
        );
        assert_eq!(excluded_names(&e, "x", &[], &[]).unwrap(), None);
    }

    #[test]
    fn test_index_name_is_idempotent() {
        let g = generator(DialectKind::Postgres);
        let table = TableReference::new("users");
        let fields = vec![String::from("email")];
        assert_eq!(
            g.generate_index_name(&table, &fields, None, true),
            g.generate_index_name(&table, &fields, None, true)
        );
        assert_eq!(
            g.generate_index_name(&table, &fields, None, true),
            "users_email_unique"
        );
    }

    #[test]
    fn test_limit_styles() {
        assert_eq!(
            generator(DialectKind::Postgres).limit_sql(Some(10), Some(20), false),
            " LIMIT 10 OFFSET 20"
        );
        assert_eq!(
            generator(DialectKind::Db2).limit_sql(Some(10), None, false),
            " OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
        );
        assert_eq!(generator(DialectKind::Postgres).limit_sql(None, None, true), "");
    }
}
