//! MySQL and MariaDB query generation.
//!
//! Both share one generator; MariaDB differs in its capability table
//! (RETURNING, ADD COLUMN IF NOT EXISTS, index IF NOT EXISTS, schema
//! comments).

use std::fmt::Write as _;

use super::{excluded_names, keyword, logged, IndexTarget, QueryGenerator};
use crate::attribute::AttributeDescriptor;
use crate::capabilities::{DialectCapabilities, DialectKind};
use crate::config::DialectOptions;
use crate::error::Result;
use crate::escape::Escaper;
use crate::options::{
    CreateTableOptions, ListTablesOptions, OptionBag, RemoveIndexOptions, RenameTableOptions,
    TruncateOptions,
};
use crate::table::TableReference;

/// MySQL and MariaDB dialect.
#[derive(Debug, Clone)]
pub struct MySqlDialect {
    capabilities: &'static DialectCapabilities,
    options: DialectOptions,
}

impl MySqlDialect {
    /// Creates a MySQL generator.
    #[must_use]
    pub fn new(options: DialectOptions) -> Self {
        Self {
            capabilities: DialectKind::MySql.capabilities(),
            options,
        }
    }

    /// Creates a MariaDB generator.
    #[must_use]
    pub fn mariadb(options: DialectOptions) -> Self {
        Self {
            capabilities: DialectKind::MariaDb.capabilities(),
            options,
        }
    }
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new(DialectOptions::default())
    }
}

impl QueryGenerator for MySqlDialect {
    fn escaper(&self) -> Escaper<'_> {
        Escaper::new(self.capabilities, &self.options)
    }

    fn foreign_keys_inline(&self) -> bool {
        false
    }

    fn inline_column_comments(&self) -> bool {
        true
    }

    fn comment_statements(
        &self,
        _table: &TableReference,
        _attributes: &[AttributeDescriptor],
        _options: &CreateTableOptions,
    ) -> Result<Vec<String>> {
        Ok(Vec::new())
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
        let engine = keyword("engine", options.engine.as_deref().unwrap_or("InnoDB"))?;
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({body}) ENGINE={engine}",
            e.quote_table(table)
        );
        if let Some(comment) = &options.comment {
            sql.push_str(" COMMENT ");
            sql.push_str(&e.escape_string(comment)?);
        }
        if let Some(charset) = &options.charset {
            sql.push_str(" DEFAULT CHARSET=");
            sql.push_str(&keyword("charset", charset)?);
        }
        if let Some(collate) = &options.collate {
            sql.push_str(" COLLATE ");
            sql.push_str(&keyword("collate", collate)?);
        }
        if let Some(start) = options.initial_auto_increment {
            let _ = write!(sql, " AUTO_INCREMENT={start}");
        }
        if let Some(row_format) = &options.row_format {
            sql.push_str(" ROW_FORMAT=");
            sql.push_str(&keyword("rowFormat", row_format)?);
        }
        sql.push(';');
        logged(&e, "create table query", sql)
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
            "RENAME TABLE {} TO {};",
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
            format!("SHOW FULL COLUMNS FROM {};", e.quote_table(table)),
        )
    }

    fn list_tables_query(&self, options: &ListTablesOptions) -> Result<String> {
        let e = self.escaper();
        options.validate(e.capabilities())?;
        let filter = match &options.schema {
            Some(schema) => format!("TABLE_SCHEMA = {}", e.escape_string(schema)?),
            None => excluded_names(
                &e,
                "TABLE_SCHEMA",
                e.capabilities().technical_schemas,
                &[],
            )?
            .unwrap_or_else(|| String::from("1 = 1")),
        };
        let sql = format!(
            "SELECT TABLE_NAME AS {}, TABLE_SCHEMA AS {} FROM INFORMATION_SCHEMA.TABLES \
             WHERE TABLE_TYPE = 'BASE TABLE' AND {filter} ORDER BY TABLE_SCHEMA, TABLE_NAME",
            e.quote_identifier("tableName"),
            e.quote_identifier("schema")
        );
        logged(&e, "list tables query", sql)
    }

    fn show_indexes_query(&self, table: &TableReference) -> Result<String> {
        let e = self.escaper();
        logged(
            &e,
            "show indexes query",
            format!("SHOW INDEX FROM {}", e.quote_table(table)),
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
            format!("TRUNCATE {}", e.quote_table(table)),
        )
    }

    fn offset_without_limit_sql(&self, offset: u64) -> String {
        format!(" LIMIT 18446744073709551615 OFFSET {offset}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{ForeignKeyReference, ReferentialAction};
    use crate::data_types::DataType;
    use crate::error::ErrorKind;
    use crate::generator::{JsonPathSegment, WhereClause};
    use crate::options::{
        AddColumnOptions, AddIndexOptions, CreateSchemaOptions, DeleteOptions, IndexField,
        IndexHint, IndexHintKind, InsertOptions, QuoteTableOptions, SelectOptions, SortOrder,
        UpdateOptions,
    };
    use crate::value::{ToValue, Value};

    fn mysql() -> MySqlDialect {
        MySqlDialect::default()
    }

    #[test]
    fn test_create_table_with_table_options() {
        let attributes = [
            AttributeDescriptor::new("id", DataType::integer())
                .primary_key()
                .auto_increment(),
            AttributeDescriptor::new("name", DataType::string()).comment("Display name"),
            AttributeDescriptor::new("team_id", DataType::integer()).references(
                ForeignKeyReference::new("teams", "id")
                    .on_delete(ReferentialAction::SetNull)
                    .on_update(ReferentialAction::Cascade),
            ),
        ];
        let options = CreateTableOptions {
            charset: Some(String::from("utf8mb4")),
            collate: Some(String::from("utf8mb4_bin")),
            initial_auto_increment: Some(1000),
            comment: Some(String::from("It's a table")),
            ..CreateTableOptions::default()
        };
        let sql = mysql()
            .create_table_query(&TableReference::new("users"), &attributes, &options)
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS `users` (`id` INTEGER NOT NULL AUTO_INCREMENT, \
             `name` VARCHAR(255) COMMENT 'Display name', `team_id` INTEGER, \
             PRIMARY KEY (`id`), FOREIGN KEY (`team_id`) REFERENCES `teams` (`id`) \
             ON DELETE SET NULL ON UPDATE CASCADE) ENGINE=InnoDB COMMENT 'It\\'s a table' \
             DEFAULT CHARSET=utf8mb4 COLLATE utf8mb4_bin AUTO_INCREMENT=1000;"
        );
    }

    #[test]
    fn test_engine_must_be_a_word() {
        let options = CreateTableOptions {
            engine: Some(String::from("InnoDB; DROP TABLE users")),
            ..CreateTableOptions::default()
        };
        let err = mysql()
            .create_table_query(
                &TableReference::new("t"),
                &[AttributeDescriptor::new("a", DataType::integer())],
                &options,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_add_column_needs_mariadb_for_if_not_exists() {
        let column = AttributeDescriptor::new("age", DataType::integer());
        let options = AddColumnOptions {
            if_not_exists: true,
        };
        let err = mysql()
            .add_column_query(&TableReference::new("users"), &column, &options)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOption);

        let sql = MySqlDialect::mariadb(DialectOptions::default())
            .add_column_query(&TableReference::new("users"), &column, &options)
            .unwrap();
        assert_eq!(
            sql,
            "ALTER TABLE `users` ADD COLUMN IF NOT EXISTS `age` INTEGER;"
        );
    }

    #[test]
    fn test_fulltext_index_with_prefix_length() {
        let options = AddIndexOptions {
            index_type: Some(String::from("fulltext")),
            parser: Some(String::from("ngram")),
            ..AddIndexOptions::on([IndexField::new("body").length(100)])
        };
        let sql = mysql()
            .add_index_query(&TableReference::new("posts"), &options)
            .unwrap();
        assert_eq!(
            sql,
            "CREATE FULLTEXT INDEX `posts_body` ON `posts` (`body`(100)) WITH PARSER ngram"
        );

        let btree = AddIndexOptions {
            using: Some(String::from("BTREE")),
            ..AddIndexOptions::on(["email"]).unique()
        };
        assert_eq!(
            mysql()
                .add_index_query(&TableReference::new("users"), &btree)
                .unwrap(),
            "CREATE UNIQUE INDEX `users_email_unique` USING BTREE ON `users` (`email`)"
        );
        assert_eq!(
            mysql()
                .remove_index_query(
                    &TableReference::new("users"),
                    &IndexTarget::Name(String::from("users_email_unique")),
                    &RemoveIndexOptions::default()
                )
                .unwrap(),
            "DROP INDEX `users_email_unique` ON `users`"
        );
    }

    #[test]
    fn test_insert_ignore_and_upsert() {
        let table = TableReference::new("users");
        let row = [("id", 1_i64.to_value()), ("name", "Ann".to_value())];
        let ignore = InsertOptions {
            ignore_duplicates: true,
            ..InsertOptions::default()
        };
        assert_eq!(
            mysql().insert_query(&table, &row, &[], &ignore).unwrap().sql,
            "INSERT IGNORE INTO `users` (`id`, `name`) VALUES (?,?);"
        );

        let upsert = InsertOptions {
            update_on_duplicate: vec![String::from("name")],
            ..InsertOptions::default()
        };
        assert_eq!(
            mysql().insert_query(&table, &row, &[], &upsert).unwrap().sql,
            "INSERT INTO `users` (`id`, `name`) VALUES (?,?) \
             ON DUPLICATE KEY UPDATE `name`=VALUES(`name`);"
        );

        let both = InsertOptions {
            ignore_duplicates: true,
            update_on_duplicate: vec![String::from("name")],
            ..InsertOptions::default()
        };
        assert_eq!(
            mysql()
                .insert_query(&table, &row, &[], &both)
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_empty_insert_and_returning() {
        let table = TableReference::new("events");
        assert_eq!(
            mysql()
                .insert_query(&table, &[], &[], &InsertOptions::default())
                .unwrap()
                .sql,
            "INSERT INTO `events` VALUES ();"
        );
        let returning = InsertOptions {
            returning: true,
            ..InsertOptions::default()
        };
        assert_eq!(
            mysql()
                .insert_query(&table, &[], &[], &returning)
                .unwrap_err()
                .kind(),
            ErrorKind::UnsupportedOption
        );
        assert_eq!(
            MySqlDialect::mariadb(DialectOptions::default())
                .insert_query(&table, &[], &[], &returning)
                .unwrap()
                .sql,
            "INSERT INTO `events` VALUES () RETURNING *;"
        );
    }

    #[test]
    fn test_update_and_delete_with_limit() {
        let table = TableReference::new("jobs");
        let filter = WhereClause::eq("state", "queued");
        let update = mysql()
            .update_query(
                &table,
                &[("state", "running".to_value())],
                Some(&filter),
                &[],
                &UpdateOptions {
                    limit: Some(5),
                    ..UpdateOptions::default()
                },
            )
            .unwrap();
        assert_eq!(
            update.sql,
            "UPDATE `jobs` SET `state`=? WHERE `state` = ? LIMIT 5"
        );
        assert_eq!(
            update.bind,
            vec![
                Value::Text(String::from("running")),
                Value::Text(String::from("queued"))
            ]
        );

        let delete = mysql()
            .bulk_delete_query(&table, None, &DeleteOptions { limit: Some(10) })
            .unwrap();
        assert_eq!(delete.sql, "DELETE FROM `jobs` LIMIT 10");
    }

    #[test]
    fn test_select_with_index_hints_and_offset() {
        let options = SelectOptions {
            attributes: vec![String::from("id")],
            order: vec![(String::from("id"), SortOrder::Desc)],
            offset: Some(20),
            table: QuoteTableOptions {
                index_hints: vec![IndexHint {
                    kind: IndexHintKind::Force,
                    values: vec![String::from("users_created_at")],
                }],
                ..QuoteTableOptions::default()
            },
            ..SelectOptions::default()
        };
        let query = mysql()
            .select_query(&TableReference::new("users"), &options)
            .unwrap();
        assert_eq!(
            query.sql,
            "SELECT `id` FROM `users` FORCE INDEX (`users_created_at`) ORDER BY `id` DESC \
             LIMIT 18446744073709551615 OFFSET 20"
        );
    }

    #[test]
    fn test_json_extraction() {
        let path = [JsonPathSegment::from("address"), JsonPathSegment::from("city")];
        assert_eq!(
            mysql()
                .json_path_extraction_query("profile", &path, true)
                .unwrap(),
            "json_unquote(json_extract(`profile`, '$.address.city'))"
        );
    }

    #[test]
    fn test_schemas_are_databases() {
        let options = CreateSchemaOptions {
            if_not_exists: true,
            charset: Some(String::from("utf8mb4")),
            ..CreateSchemaOptions::default()
        };
        assert_eq!(
            mysql().create_schema_query("app", &options).unwrap(),
            "CREATE SCHEMA IF NOT EXISTS `app` DEFAULT CHARACTER SET utf8mb4"
        );
        assert_eq!(
            mysql()
                .table_exists_query(&TableReference::new("users"))
                .unwrap(),
            "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = 'BASE TABLE' \
             AND TABLE_NAME = 'users' AND TABLE_SCHEMA = DATABASE()"
        );
    }
}
