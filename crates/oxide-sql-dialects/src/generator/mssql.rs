//! SQL Server query generation.

use std::fmt::Write as _;

use super::{excluded_names, logged, table_schema, IndexTarget, QueryGenerator};
use crate::attribute::AttributeDescriptor;
use crate::capabilities::DialectKind;
use crate::config::DialectOptions;
use crate::error::Result;
use crate::escape::Escaper;
use crate::options::{
    AddColumnOptions, CreateTableOptions, ListDatabasesOptions, OptionBag, RemoveIndexOptions,
    RenameTableOptions,
};
use crate::table::TableReference;

/// SQL Server dialect.
#[derive(Debug, Clone, Default)]
pub struct MsSqlDialect {
    options: DialectOptions,
}

impl MsSqlDialect {
    /// Creates a SQL Server generator.
    #[must_use]
    pub const fn new(options: DialectOptions) -> Self {
        Self { options }
    }
}

impl QueryGenerator for MsSqlDialect {
    fn escaper(&self) -> Escaper<'_> {
        Escaper::new(DialectKind::MsSql.capabilities(), &self.options)
    }

    fn foreign_keys_inline(&self) -> bool {
        false
    }

    fn version_query(&self) -> Result<String> {
        let e = self.escaper();
        logged(
            &e,
            "version query",
            format!("SELECT @@VERSION AS {}", e.quote_identifier("version")),
        )
    }

    fn create_table_query(
        &self,
        table: &TableReference,
        attributes: &[AttributeDescriptor],
        options: &CreateTableOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let quoted = e.quote_table(table);
        let body = self.table_body(table, attributes, options)?;
        let mut statements = vec![format!(
            "IF OBJECT_ID({}, 'U') IS NULL CREATE TABLE {quoted} ({body});",
            e.escape_string(&quoted)?
        )];
        statements.extend(self.comment_statements(table, attributes, options)?);
        logged(&e, "create table query", statements.join(" "))
    }

    /// Column comments are stored as `MS_Description` extended properties.
    fn comment_statements(
        &self,
        table: &TableReference,
        attributes: &[AttributeDescriptor],
        _options: &CreateTableOptions,
    ) -> Result<Vec<String>> {
        let e = self.escaper();
        let schema = e.escape_string(table_schema(&e, table).unwrap_or("dbo"))?;
        let table_name = e.escape_string(&table.table_name)?;
        attributes
            .iter()
            .filter_map(|attribute| attribute.comment.as_ref().map(|c| (attribute, c)))
            .map(|(attribute, comment)| {
                Ok(format!(
                    "EXEC sp_addextendedproperty @name = N'MS_Description', @value = {}, \
                     @level0type = N'Schema', @level0name = {schema}, \
                     @level1type = N'Table', @level1name = {table_name}, \
                     @level2type = N'Column', @level2name = {};",
                    e.escape_string(comment)?,
                    e.escape_string(&attribute.name)?
                ))
            })
            .collect()
    }

    fn add_column_query(
        &self,
        table: &TableReference,
        attribute: &AttributeDescriptor,
        options: &AddColumnOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let column = e.quote_identifier(&attribute.name);
        let mut sql = format!(
            "ALTER TABLE {} ADD {column} {}",
            e.quote_table(table),
            self.attribute_sql(table, attribute, false)?
        );
        if let Some(reference) = &attribute.references {
            let _ = write!(
                sql,
                ", FOREIGN KEY ({column}) {}",
                self.references_sql(reference)?
            );
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
            let target = table_schema(&e, after).unwrap_or("dbo");
            statements.push(format!(
                "ALTER SCHEMA {} TRANSFER {};",
                e.quote_identifier(target),
                e.quote_table(&current)
            ));
            current.schema = Some(target.to_string());
        }
        if current.table_name != after.table_name {
            statements.push(format!(
                "EXEC sp_rename {}, {};",
                e.escape_string(&e.quote_table(&current))?,
                e.escape_string(&after.table_name)?
            ));
        }
        logged(&e, "rename table query", statements.join(" "))
    }

    fn list_databases_query(&self, options: &ListDatabasesOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let mut sql = format!("SELECT name AS {} FROM sys.databases", e.quote_identifier("name"));
        if let Some(filter) = excluded_names(
            &e,
            "name",
            e.capabilities().technical_databases,
            &options.skip,
        )? {
            sql.push_str(" WHERE ");
            sql.push_str(&filter);
        }
        logged(&e, "list databases query", sql)
    }

    fn show_indexes_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        logged(
            &e,
            "show indexes query",
            format!(
                "EXEC sys.sp_helpindex @objname = {};",
                e.escape_string(&e.quote_table(table))?
            ),
        )
    }

    fn remove_index_query(
        &self,
        table: &TableReference,
        target: &IndexTarget,
        options: &RemoveIndexOptions,
    ) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let mut sql = String::from("DROP INDEX ");
        if options.if_exists {
            sql.push_str("IF EXISTS ");
        }
        let _ = write!(
            sql,
            "{} ON {}",
            e.quote_identifier(&self.index_target_name(table, target)),
            e.quote_table(table)
        );
        logged(&e, "remove index query", sql)
    }

    fn create_savepoint_query(&self, name: &str) -> Result<String> {
        let e = self.escaper();
        logged(
            &e,
            "create savepoint query",
            format!("SAVE TRANSACTION {}", e.quote_identifier(name)),
        )
    }

    fn rollback_savepoint_query(&self, name: &str) -> Result<String> {
        let e = self.escaper();
        logged(
            &e,
            "rollback savepoint query",
            format!("ROLLBACK TRANSACTION {}", e.quote_identifier(name)),
        )
    }

    /// OFFSET/FETCH needs an ORDER BY; unordered selects get a no-op one.
    fn limit_sql(&self, limit: Option<u64>, offset: Option<u64>, ordered: bool) -> String {
        if limit.is_none() && offset.is_none() {
            return String::new();
        }
        let mut sql = if ordered {
            String::new()
        } else {
            String::from(" ORDER BY (SELECT NULL)")
        };
        let _ = write!(sql, " OFFSET {} ROWS", offset.unwrap_or(0));
        if let Some(limit) = limit {
            let _ = write!(sql, " FETCH NEXT {limit} ROWS ONLY");
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::ForeignKeyReference;
    use crate::data_types::DataType;
    use crate::error::ErrorKind;
    use crate::generator::{JsonPathSegment, WhereClause};
    use crate::options::{
        AddConstraintOptions, ConstraintDefinition, InsertOptions, QuoteTableOptions,
        SelectOptions, StartTransactionOptions, TableHint, TruncateOptions, UpdateOptions,
    };
    use crate::value::{ToValue, Value};

    fn mssql() -> MsSqlDialect {
        MsSqlDialect::default()
    }

    #[test]
    fn test_create_table_is_guarded() {
        let attributes = [
            AttributeDescriptor::new("id", DataType::integer())
                .primary_key()
                .auto_increment(),
            AttributeDescriptor::new("owner_id", DataType::integer())
                .references(ForeignKeyReference::new("owners", "id"))
                .comment("Owner"),
        ];
        let sql = mssql()
            .create_table_query(
                &TableReference::new("pets"),
                &attributes,
                &CreateTableOptions::default(),
            )
            .unwrap();
        assert_eq!(
            sql,
            "IF OBJECT_ID(N'[pets]', 'U') IS NULL CREATE TABLE [pets] \
             ([id] INTEGER NOT NULL IDENTITY(1,1), [owner_id] INTEGER, PRIMARY KEY ([id]), \
             FOREIGN KEY ([owner_id]) REFERENCES [owners] ([id])); \
             EXEC sp_addextendedproperty @name = N'MS_Description', @value = N'Owner', \
             @level0type = N'Schema', @level0name = N'dbo', \
             @level1type = N'Table', @level1name = N'pets', \
             @level2type = N'Column', @level2name = N'owner_id';"
        );
    }

    #[test]
    fn test_default_constraint() {
        let options = AddConstraintOptions::new(
            ConstraintDefinition::Default("pending".to_value()),
            ["status"],
        );
        assert_eq!(
            mssql()
                .add_constraint_query(&TableReference::new("orders"), &options)
                .unwrap(),
            "ALTER TABLE [orders] ADD CONSTRAINT [orders_status_df] DEFAULT N'pending' FOR [status];"
        );
    }

    #[test]
    fn test_transactions_belong_to_the_connection() {
        let err = mssql()
            .start_transaction_query(&StartTransactionOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
        assert_eq!(
            mssql().create_savepoint_query("sp1").unwrap(),
            "SAVE TRANSACTION [sp1]"
        );
        assert_eq!(
            mssql().rollback_savepoint_query("sp1").unwrap(),
            "ROLLBACK TRANSACTION [sp1]"
        );
    }

    #[test]
    fn test_insert_and_update_output() {
        let table = TableReference::new("users");
        let options = InsertOptions {
            returning: true,
            ..InsertOptions::default()
        };
        let insert = mssql()
            .insert_query(&table, &[("name", "Ann".to_value())], &[], &options)
            .unwrap();
        assert_eq!(
            insert.sql,
            "INSERT INTO [users] ([name]) OUTPUT INSERTED.* VALUES (@p1);"
        );

        let update = mssql()
            .update_query(
                &table,
                &[("name", "Bob".to_value())],
                Some(&WhereClause::eq("id", 7_i64)),
                &[],
                &UpdateOptions {
                    returning: true,
                    ..UpdateOptions::default()
                },
            )
            .unwrap();
        assert_eq!(
            update.sql,
            "UPDATE [users] SET [name]=@p1 OUTPUT INSERTED.* WHERE [id] = @p2"
        );
        assert_eq!(update.bind, vec![Value::Text(String::from("Bob")), Value::Int(7)]);
    }

    #[test]
    fn test_select_paging_and_hints() {
        let options = SelectOptions {
            limit: Some(10),
            table: QuoteTableOptions {
                table_hints: vec![TableHint::NoLock],
                ..QuoteTableOptions::default()
            },
            ..SelectOptions::default()
        };
        assert_eq!(
            mssql()
                .select_query(&TableReference::new("users"), &options)
                .unwrap()
                .sql,
            "SELECT * FROM [users] WITH (NOLOCK) ORDER BY (SELECT NULL) \
             OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
        );
    }

    #[test]
    fn test_truncate_rejects_cascade() {
        let err = mssql()
            .truncate_table_query(
                &TableReference::new("users"),
                &TruncateOptions {
                    cascade: true,
                    restart_identity: false,
                },
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The following options are not supported by truncateTableQuery in mssql: cascade"
        );
    }

    #[test]
    fn test_rename_with_sp_rename() {
        assert_eq!(
            mssql()
                .rename_table_query(
                    &TableReference::new("users"),
                    &TableReference::new("people"),
                    &RenameTableOptions::default()
                )
                .unwrap(),
            "EXEC sp_rename N'[users]', N'people';"
        );
    }

    #[test]
    fn test_json_value_requires_unquote() {
        let path = [JsonPathSegment::from("name")];
        assert_eq!(
            mssql()
                .json_path_extraction_query("data", &path, true)
                .unwrap(),
            "JSON_VALUE([data], N'$.name')"
        );
        assert!(mssql().json_path_extraction_query("data", &path, false).is_err());
    }
}
