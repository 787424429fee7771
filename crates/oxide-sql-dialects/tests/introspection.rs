//! Catalog queries: existence checks, schema listings, descriptions.

mod common;

use common::{escaper, generator};
use oxide_sql_dialects::options::{ListDatabasesOptions, ListSchemasOptions, ListTablesOptions};
use oxide_sql_dialects::{DialectKind, ErrorKind, TableReference};

fn my_table() -> TableReference {
    TableReference::new("myTable").with_schema("mySchema")
}

#[test]
fn test_table_exists_escapes_names_for_every_dialect() {
    for kind in DialectKind::ALL {
        let e = escaper(kind);
        let sql = generator(kind).table_exists_query(&my_table()).unwrap();
        if kind.capabilities().schemas {
            assert!(sql.contains(&e.escape_string("myTable").unwrap()), "{kind}: {sql}");
            assert!(sql.contains(&e.escape_string("mySchema").unwrap()), "{kind}: {sql}");
        } else {
            assert!(sql.contains("'mySchema.myTable'"), "{kind}: {sql}");
        }
    }
}

#[test]
fn test_table_exists_per_dialect() {
    assert_eq!(
        generator(DialectKind::Postgres)
            .table_exists_query(&my_table())
            .unwrap(),
        "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = 'BASE TABLE' \
         AND TABLE_NAME = 'myTable' AND TABLE_SCHEMA = 'mySchema'"
    );
    assert_eq!(
        generator(DialectKind::Sqlite)
            .table_exists_query(&my_table())
            .unwrap(),
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'mySchema.myTable'"
    );
    assert_eq!(
        generator(DialectKind::Db2)
            .table_exists_query(&my_table())
            .unwrap(),
        "SELECT TABNAME FROM SYSCAT.TABLES WHERE TYPE = 'T' AND TABNAME = 'myTable' \
         AND TABSCHEMA = 'mySchema'"
    );
}

#[test]
fn test_default_schema_falls_back_to_the_current_schema() {
    let sql = generator(DialectKind::Db2)
        .table_exists_query(&TableReference::new("myTable"))
        .unwrap();
    assert!(sql.ends_with(&format!(
        "TABSCHEMA = {}",
        DialectKind::Db2.capabilities().current_schema_sql
    )));

    let pg = generator(DialectKind::Postgres)
        .table_exists_query(&TableReference::new("myTable"))
        .unwrap();
    assert!(pg.ends_with("TABLE_SCHEMA = 'public'"), "{pg}");
}

#[test]
fn test_list_schemas_excludes_technical_and_skipped_names() {
    let options = ListSchemasOptions {
        skip: vec![String::from("audit")],
    };
    for kind in DialectKind::ALL {
        let caps = kind.capabilities();
        if !caps.schemas {
            continue;
        }
        let e = escaper(kind);
        let sql = generator(kind).list_schemas_query(&options).unwrap();
        assert!(sql.contains(&e.escape_string("audit").unwrap()), "{kind}: {sql}");
        for technical in caps.technical_schemas {
            assert!(
                sql.contains(&e.escape_string(technical).unwrap()),
                "{kind} should exclude {technical}: {sql}"
            );
        }
    }
}

#[test]
fn test_list_schemas_needs_schema_support() {
    let err = generator(DialectKind::Sqlite)
        .list_schemas_query(&ListSchemasOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
}

#[test]
fn test_list_tables_restricted_to_a_schema() {
    let options = ListTablesOptions {
        schema: Some(String::from("sales")),
    };
    let sql = generator(DialectKind::Postgres)
        .list_tables_query(&options)
        .unwrap();
    assert!(sql.contains("table_schema = 'sales'"), "{sql}");
    assert!(!sql.contains("NOT IN ("), "{sql}");

    let everything = generator(DialectKind::Postgres)
        .list_tables_query(&ListTablesOptions::default())
        .unwrap();
    assert!(everything.contains("NOT IN ("), "{everything}");
}

#[test]
fn test_describe_table_binds_nothing_and_escapes_names() {
    for kind in DialectKind::ALL {
        let sql = generator(kind).describe_table_query(&my_table()).unwrap();
        assert!(sql.contains("myTable"), "{kind}: {sql}");
        assert!(!sql.contains('?') && !sql.contains("$1"), "{kind}: {sql}");
    }
}

#[test]
fn test_version_query_for_every_dialect() {
    for kind in DialectKind::ALL {
        let sql = generator(kind).version_query().unwrap();
        assert!(sql.starts_with("SELECT") || sql.starts_with("SHOW"), "{kind}: {sql}");
    }
}

#[test]
fn test_list_databases_only_where_a_server_hosts_many() {
    let options = ListDatabasesOptions {
        skip: vec![String::from("archive")],
    };
    assert_eq!(
        generator(DialectKind::Postgres)
            .list_databases_query(&options)
            .unwrap(),
        "SELECT datname AS \"name\" FROM pg_database WHERE datistemplate = false \
         AND datname NOT IN ('postgres', 'archive')"
    );
    let mssql = generator(DialectKind::MsSql)
        .list_databases_query(&options)
        .unwrap();
    assert!(mssql.contains("N'tempdb'") && mssql.contains("N'archive'"), "{mssql}");

    let err = generator(DialectKind::MySql)
        .list_databases_query(&ListDatabasesOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
}
