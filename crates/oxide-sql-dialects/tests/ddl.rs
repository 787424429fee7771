//! Schema changes: tables, columns, indexes and constraints.

mod common;

use common::generator;
use oxide_sql_dialects::data_types::DataType;
use oxide_sql_dialects::options::{
    AddColumnOptions, AddConstraintOptions, AddIndexOptions, ConstraintDefinition,
    CreateTableOptions, DropTableOptions, RemoveIndexOptions,
};
use oxide_sql_dialects::{
    AttributeDescriptor, Deferrable, DialectKind, ErrorKind, ForeignKeyReference, IndexTarget,
    ReferentialAction, TableReference, WhereClause,
};

fn post_columns() -> Vec<AttributeDescriptor> {
    vec![
        AttributeDescriptor::new("id", DataType::integer()).primary_key(),
        AttributeDescriptor::new("status", DataType::string())
            .default_value("draft")
            .comment("State"),
        AttributeDescriptor::new("created_at", DataType::date()).default_raw("CURRENT_TIMESTAMP"),
    ]
}

#[test]
fn test_create_table_postgres_with_defaults_and_comments() {
    let sql = generator(DialectKind::Postgres)
        .create_table_query(
            &TableReference::new("posts"),
            &post_columns(),
            &CreateTableOptions::default(),
        )
        .unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE IF NOT EXISTS \"posts\" (\"id\" INTEGER NOT NULL, \
         \"status\" VARCHAR(255) DEFAULT 'draft', \
         \"created_at\" TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP, \
         PRIMARY KEY (\"id\")); COMMENT ON COLUMN \"posts\".\"status\" IS 'State';"
    );
}

#[test]
fn test_create_table_sqlite_folds_schema_and_drops_comments() {
    let sql = generator(DialectKind::Sqlite)
        .create_table_query(
            &TableReference::new("posts").with_schema("blog"),
            &post_columns(),
            &CreateTableOptions::default(),
        )
        .unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE IF NOT EXISTS `blog.posts` (`id` INTEGER NOT NULL PRIMARY KEY, \
         `status` VARCHAR(255) DEFAULT 'draft', \
         `created_at` DATETIME DEFAULT CURRENT_TIMESTAMP);"
    );
}

#[test]
fn test_create_table_guards() {
    let table = TableReference::new("posts");
    let options = CreateTableOptions::default();

    let mssql = generator(DialectKind::MsSql)
        .create_table_query(&table, &post_columns(), &options)
        .unwrap();
    assert!(
        mssql.starts_with("IF OBJECT_ID(N'[posts]', 'U') IS NULL CREATE TABLE [posts] ("),
        "{mssql}"
    );
    assert!(mssql.contains("[status] NVARCHAR(255) DEFAULT N'draft'"), "{mssql}");
    assert!(mssql.contains("sp_addextendedproperty"), "{mssql}");

    let ibmi = generator(DialectKind::Ibmi)
        .create_table_query(&table, &post_columns(), &options)
        .unwrap();
    assert!(
        ibmi.starts_with("BEGIN DECLARE CONTINUE HANDLER FOR SQLSTATE VALUE '42710'"),
        "{ibmi}"
    );
    assert!(ibmi.contains("CREATE TABLE \"posts\" ("), "{ibmi}");
    assert!(ibmi.ends_with("END"), "{ibmi}");
}

#[test]
fn test_create_table_needs_columns() {
    for kind in DialectKind::ALL {
        let err = generator(kind)
            .create_table_query(
                &TableReference::new("empty"),
                &[],
                &CreateTableOptions::default(),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{kind}");
    }
}

#[test]
fn test_foreign_keys_inline_or_as_constraints() {
    let columns = [AttributeDescriptor::new("author_id", DataType::integer()).references(
        ForeignKeyReference::new("authors", "id").on_delete(ReferentialAction::SetNull),
    )];
    let table = TableReference::new("books");
    let options = CreateTableOptions::default();

    let pg = generator(DialectKind::Postgres)
        .create_table_query(&table, &columns, &options)
        .unwrap();
    assert!(
        pg.contains("\"author_id\" INTEGER REFERENCES \"authors\" (\"id\") ON DELETE SET NULL"),
        "{pg}"
    );

    let mysql = generator(DialectKind::MySql)
        .create_table_query(&table, &columns, &options)
        .unwrap();
    assert!(
        mysql.contains("FOREIGN KEY (`author_id`) REFERENCES `authors` (`id`) ON DELETE SET NULL"),
        "{mysql}"
    );
}

#[test]
fn test_unsupported_create_table_option_is_rejected() {
    let options = CreateTableOptions {
        engine: Some(String::from("InnoDB")),
        ..CreateTableOptions::default()
    };
    let err = generator(DialectKind::Postgres)
        .create_table_query(&TableReference::new("t"), &post_columns(), &options)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOption);
}

#[test]
fn test_drop_table_and_add_column() {
    let pg = generator(DialectKind::Postgres);
    let table = TableReference::new("posts").with_schema("blog");
    assert_eq!(
        pg.drop_table_query(
            &table,
            &DropTableOptions {
                cascade: true,
                ..DropTableOptions::default()
            }
        )
        .unwrap(),
        "DROP TABLE IF EXISTS \"blog\".\"posts\" CASCADE"
    );
    assert_eq!(
        pg.add_column_query(
            &table,
            &AttributeDescriptor::new("slug", DataType::varchar(80)).not_null(),
            &AddColumnOptions::default(),
        )
        .unwrap(),
        "ALTER TABLE \"blog\".\"posts\" ADD COLUMN \"slug\" VARCHAR(80) NOT NULL;"
    );
}

#[test]
fn test_index_names_match_between_add_and_remove() {
    let table = TableReference::new("users");
    let fields = ["email", "tenant"];
    for kind in DialectKind::ALL {
        let g = generator(kind);
        let Ok(created) = g.add_index_query(&table, &AddIndexOptions::on(fields)) else {
            assert!(!kind.capabilities().indexes, "{kind} should create indexes");
            continue;
        };
        let dropped = g
            .remove_index_query(
                &table,
                &IndexTarget::Fields(fields.iter().map(ToString::to_string).collect()),
                &RemoveIndexOptions::default(),
            )
            .unwrap();
        let quoted = g.escaper().quote_identifier("users_email_tenant");
        assert!(created.contains(&quoted), "{kind}: {created}");
        assert!(dropped.contains(&quoted), "{kind}: {dropped}");
    }
}

#[test]
fn test_long_index_names_are_truncated_deterministically() {
    let pg = generator(DialectKind::Postgres);
    let table = TableReference::new("a_table_with_a_rather_long_name_for_testing");
    let fields = ["first_column_name", "second_column_name"].map(String::from);
    let first = pg.generate_index_name(&table, &fields, None, false);
    let second = pg.generate_index_name(&table, &fields, None, false);
    assert_eq!(first, second);
    assert_eq!(first.len(), 63);
    assert!(first.starts_with("a_table_with_a_rather_long_name_for_testing_first_colu_"));
}

#[test]
fn test_partial_index_inlines_its_predicate() {
    let options = AddIndexOptions::on(["email"])
        .named("active_emails")
        .where_clause(WhereClause::eq("deleted", false));
    assert_eq!(
        generator(DialectKind::Postgres)
            .add_index_query(&TableReference::new("users"), &options)
            .unwrap(),
        "CREATE INDEX \"active_emails\" ON \"users\" (\"email\") WHERE \"deleted\" = false"
    );
}

#[test]
fn test_constraints() {
    let pg = generator(DialectKind::Postgres);
    let table = TableReference::new("users");

    assert_eq!(
        pg.add_constraint_query(
            &table,
            &AddConstraintOptions::new(ConstraintDefinition::Unique, ["email"]),
        )
        .unwrap(),
        "ALTER TABLE \"users\" ADD CONSTRAINT \"users_email_uk\" UNIQUE (\"email\");"
    );
    assert_eq!(
        pg.add_constraint_query(
            &table,
            &AddConstraintOptions::new(
                ConstraintDefinition::Check(WhereClause::gt("age", 0_i64)),
                ["age"],
            ),
        )
        .unwrap(),
        "ALTER TABLE \"users\" ADD CONSTRAINT \"users_age_ck\" CHECK (\"age\" > 0);"
    );
    assert_eq!(
        pg.remove_constraint_query(&table, "users_age_ck", &Default::default())
            .unwrap(),
        "ALTER TABLE \"users\" DROP CONSTRAINT \"users_age_ck\";"
    );

    let err = generator(DialectKind::Sqlite)
        .add_constraint_query(
            &table,
            &AddConstraintOptions::new(ConstraintDefinition::PrimaryKey, ["id"]),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
}

#[test]
fn test_deferrable_constraints_go_through_option_validation() {
    let table = TableReference::new("users");
    let unique = AddConstraintOptions::new(ConstraintDefinition::Unique, ["email"])
        .deferrable(Deferrable::InitiallyDeferred);

    assert_eq!(
        generator(DialectKind::Postgres)
            .add_constraint_query(&table, &unique)
            .unwrap(),
        "ALTER TABLE \"users\" ADD CONSTRAINT \"users_email_uk\" UNIQUE (\"email\") \
         DEFERRABLE INITIALLY DEFERRED;"
    );

    for kind in [DialectKind::MySql, DialectKind::MsSql, DialectKind::Sqlite] {
        let err = generator(kind)
            .add_constraint_query(&table, &unique)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOption, "{kind}");
    }
}
