//! Runs generated SQLite statements against an in-memory database.

mod common;

use common::{generator, inline_generator};
use oxide_sql_dialects::data_types::DataType;
use oxide_sql_dialects::generator::JsonPathSegment;
use oxide_sql_dialects::options::{
    AddIndexOptions, CreateTableOptions, DeleteOptions, InsertOptions, RemoveIndexOptions,
    SelectOptions, SortOrder, TruncateOptions, UpdateOptions,
};
use oxide_sql_dialects::{
    AttributeDescriptor, BoundQuery, DialectKind, IndexTarget, TableReference, ToValue, Value,
    WhereClause,
};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

fn bind_values<'q>(query: &'q BoundQuery) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind
        .iter()
        .fold(sqlx::query(&query.sql), |q, value| match value {
            Value::Null => q.bind(None::<String>),
            Value::Bool(b) => q.bind(*b),
            Value::Int(n) => q.bind(*n),
            Value::Float(f) => q.bind(*f),
            Value::Text(s) | Value::Decimal(s) => q.bind(s.as_str()),
            Value::Bytes(bytes) => q.bind(bytes.as_slice()),
            other => q.bind(format!("{other:?}")),
        })
}

fn users() -> TableReference {
    TableReference::new("users")
}

fn user_columns() -> Vec<AttributeDescriptor> {
    vec![
        AttributeDescriptor::new("id", DataType::integer())
            .primary_key()
            .auto_increment(),
        AttributeDescriptor::new("email", DataType::string())
            .not_null()
            .unique(),
        AttributeDescriptor::new("name", DataType::string()),
        AttributeDescriptor::new("active", DataType::boolean()).default_value(true),
        AttributeDescriptor::new("meta", DataType::json()),
    ]
}

async fn create_users(pool: &SqlitePool) {
    let sql = generator(DialectKind::Sqlite)
        .create_table_query(&users(), &user_columns(), &CreateTableOptions::default())
        .unwrap();
    sqlx::query(&sql).execute(pool).await.unwrap();
}

async fn count_users(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_table_and_check_existence() {
    let pool = create_test_pool().await;
    let sqlite = generator(DialectKind::Sqlite);

    let exists = sqlite.table_exists_query(&users()).unwrap();
    assert!(sqlx::query(&exists).fetch_optional(&pool).await.unwrap().is_none());

    create_users(&pool).await;
    // Created with IF NOT EXISTS, so a second run is harmless.
    create_users(&pool).await;

    let row = sqlx::query(&exists).fetch_one(&pool).await.unwrap();
    assert_eq!(row.get::<String, _>(0), "users");

    let tables: Vec<String> = sqlx::query_scalar(
        &sqlite.list_tables_query(&Default::default()).unwrap(),
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(tables, vec![String::from("users")]);
}

#[tokio::test]
async fn test_bound_and_inline_inserts() {
    let pool = create_test_pool().await;
    create_users(&pool).await;
    let columns = user_columns();

    let insert = generator(DialectKind::Sqlite)
        .insert_query(
            &users(),
            &[
                ("email", "ann@example.com".to_value()),
                ("name", "O'Brien".to_value()),
                ("meta", Value::Json(serde_json::json!({"role": "admin"}))),
            ],
            &columns,
            &InsertOptions::default(),
        )
        .unwrap();
    let result = bind_values(&insert).execute(&pool).await.unwrap();
    assert_eq!(result.rows_affected(), 1);

    let bulk = inline_generator(DialectKind::Sqlite)
        .bulk_insert_query(
            &users(),
            &[
                vec![("email", "bob@example.com".to_value()), ("name", "Bob".to_value())],
                vec![("email", "cy@example.com".to_value())],
            ],
            &columns,
            &InsertOptions::default(),
        )
        .unwrap();
    assert!(bulk.bind.is_empty());
    sqlx::query(&bulk.sql).execute(&pool).await.unwrap();
    assert_eq!(count_users(&pool).await, 3);

    let name: Option<String> =
        sqlx::query_scalar("SELECT name FROM users WHERE email = 'cy@example.com'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(name, None);

    let active: i64 = sqlx::query_scalar("SELECT active FROM users WHERE email = 'bob@example.com'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(active, 1);

    let extract = generator(DialectKind::Sqlite)
        .json_path_extraction_query("meta", &[JsonPathSegment::from("role")], true)
        .unwrap();
    let role: String = sqlx::query_scalar(&format!(
        "SELECT {extract} FROM users WHERE email = 'ann@example.com'"
    ))
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(role, "admin");
}

#[tokio::test]
async fn test_hostile_values_are_stored_verbatim() {
    let pool = create_test_pool().await;
    create_users(&pool).await;
    let hostile = "x'); DROP TABLE users; --";

    for sqlite in [
        generator(DialectKind::Sqlite),
        inline_generator(DialectKind::Sqlite),
    ] {
        sqlx::query("DELETE FROM users").execute(&pool).await.unwrap();
        let insert = sqlite
            .insert_query(
                &users(),
                &[("email", hostile.to_value())],
                &[],
                &InsertOptions::default(),
            )
            .unwrap();
        bind_values(&insert).execute(&pool).await.unwrap();
        let stored: String = sqlx::query_scalar("SELECT email FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, hostile);
    }
}

#[tokio::test]
async fn test_select_update_upsert_delete() {
    let pool = create_test_pool().await;
    create_users(&pool).await;
    let sqlite = generator(DialectKind::Sqlite);
    let rows: Vec<Vec<(&str, Value)>> = ["a", "b", "c", "d"]
        .iter()
        .map(|prefix| vec![("email", format!("{prefix}@example.com").to_value())])
        .collect();
    let bulk = sqlite
        .bulk_insert_query(&users(), &rows, &[], &InsertOptions::default())
        .unwrap();
    bind_values(&bulk).execute(&pool).await.unwrap();

    let select = sqlite
        .select_query(
            &users(),
            &SelectOptions {
                attributes: vec![String::from("email")],
                where_clause: Some(WhereClause::eq("active", true)),
                order: vec![(String::from("email"), SortOrder::Desc)],
                limit: Some(2),
                offset: Some(1),
                ..SelectOptions::default()
            },
        )
        .unwrap();
    let emails: Vec<String> = bind_values(&select)
        .fetch_all(&pool)
        .await
        .unwrap()
        .iter()
        .map(|row| row.get("email"))
        .collect();
    assert_eq!(emails, vec!["c@example.com", "b@example.com"]);

    let update = sqlite
        .update_query(
            &users(),
            &[("name", "first".to_value())],
            Some(&WhereClause::is_null("name")),
            &[],
            &UpdateOptions {
                limit: Some(1),
                ..UpdateOptions::default()
            },
        )
        .unwrap();
    let result = bind_values(&update).execute(&pool).await.unwrap();
    assert_eq!(result.rows_affected(), 1);

    let upsert = sqlite
        .insert_query(
            &users(),
            &[("email", "a@example.com".to_value()), ("name", "Ann".to_value())],
            &[],
            &InsertOptions {
                update_on_duplicate: vec![String::from("name")],
                conflict_fields: vec![String::from("email")],
                ..InsertOptions::default()
            },
        )
        .unwrap();
    bind_values(&upsert).execute(&pool).await.unwrap();
    assert_eq!(count_users(&pool).await, 4);
    let name: String = sqlx::query_scalar("SELECT name FROM users WHERE email = 'a@example.com'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(name, "Ann");

    let delete = sqlite
        .bulk_delete_query(
            &users(),
            Some(&WhereClause::like("email", "d%")),
            &DeleteOptions::default(),
        )
        .unwrap();
    let result = bind_values(&delete).execute(&pool).await.unwrap();
    assert_eq!(result.rows_affected(), 1);

    let truncate = sqlite
        .truncate_table_query(
            &users(),
            &TruncateOptions {
                restart_identity: true,
                ..TruncateOptions::default()
            },
        )
        .unwrap();
    sqlx::query(&truncate).execute(&pool).await.unwrap();
    assert_eq!(count_users(&pool).await, 0);
}

#[tokio::test]
async fn test_indexes_round_trip() {
    let pool = create_test_pool().await;
    create_users(&pool).await;
    let sqlite = generator(DialectKind::Sqlite);

    let create = sqlite
        .add_index_query(&users(), &AddIndexOptions::on(["name", "active"]))
        .unwrap();
    sqlx::query(&create).execute(&pool).await.unwrap();

    let indexes: Vec<String> = sqlx::query(&sqlite.show_indexes_query(&users()).unwrap())
        .fetch_all(&pool)
        .await
        .unwrap()
        .iter()
        .map(|row| row.get("name"))
        .collect();
    assert!(indexes.contains(&String::from("users_name_active")), "{indexes:?}");

    let drop = sqlite
        .remove_index_query(
            &users(),
            &IndexTarget::Fields(vec![String::from("name"), String::from("active")]),
            &RemoveIndexOptions::default(),
        )
        .unwrap();
    sqlx::query(&drop).execute(&pool).await.unwrap();
}

#[tokio::test]
async fn test_empty_value_lists_against_sqlite() {
    let pool = create_test_pool().await;
    create_users(&pool).await;
    let sqlite = generator(DialectKind::Sqlite);
    let rows: Vec<Vec<(&str, Value)>> = ["a", "b"]
        .iter()
        .map(|prefix| vec![("email", format!("{prefix}@example.com").to_value())])
        .collect();
    let bulk = sqlite
        .bulk_insert_query(&users(), &rows, &[], &InsertOptions::default())
        .unwrap();
    bind_values(&bulk).execute(&pool).await.unwrap();

    let select = |filter: WhereClause| {
        sqlite
            .select_query(
                &users(),
                &SelectOptions {
                    where_clause: Some(filter),
                    ..SelectOptions::default()
                },
            )
            .unwrap()
    };
    let everyone = select(WhereClause::not_in("id", Vec::<i64>::new()));
    assert_eq!(bind_values(&everyone).fetch_all(&pool).await.unwrap().len(), 2);
    let nobody = select(WhereClause::is_in("id", Vec::<i64>::new()));
    assert!(bind_values(&nobody).fetch_all(&pool).await.unwrap().is_empty());

    let delete = sqlite
        .bulk_delete_query(
            &users(),
            Some(&WhereClause::not_in("id", Vec::<i64>::new())),
            &DeleteOptions::default(),
        )
        .unwrap();
    let result = bind_values(&delete).execute(&pool).await.unwrap();
    assert_eq!(result.rows_affected(), 2);
}
