//! # oxide-sql-dialects
//!
//! Dialect-aware SQL generation for Postgres, MySQL, MariaDB, SQL Server,
//! SQLite, Db2, Snowflake, Db2 for IBM i and SAP HANA.
//!
//! The crate is organised around five pieces:
//! - a static capability table per dialect ([`DialectCapabilities`])
//! - an [`Escaper`] that quotes identifiers and renders literals safely
//! - a registry of logical data types ([`data_types`])
//! - option validation that rejects options a dialect cannot honour
//! - a [`QueryGenerator`] per dialect producing DDL, DML and catalog queries
//!
//! ## Generating SQL
//!
//! ```rust
//! use oxide_sql_dialects::data_types::DataType;
//! use oxide_sql_dialects::options::CreateTableOptions;
//! use oxide_sql_dialects::{
//!     query_generator, AttributeDescriptor, DialectKind, DialectOptions, TableReference,
//! };
//!
//! let mysql = query_generator(DialectKind::MySql, DialectOptions::default());
//! let sql = mysql
//!     .create_table_query(
//!         &TableReference::new("users"),
//!         &[AttributeDescriptor::new("id", DataType::integer())
//!             .primary_key()
//!             .auto_increment()],
//!         &CreateTableOptions::default(),
//!     )
//!     .unwrap();
//! assert_eq!(
//!     sql,
//!     "CREATE TABLE IF NOT EXISTS `users` (`id` INTEGER NOT NULL AUTO_INCREMENT, \
//!      PRIMARY KEY (`id`)) ENGINE=InnoDB;"
//! );
//! ```
//!
//! ## SQL Injection Prevention
//!
//! Values are bound as parameters by default. When inlined, they go
//! through the dialect's literal rules:
//!
//! ```rust
//! use oxide_sql_dialects::{DialectKind, DialectOptions, Escaper};
//!
//! let options = DialectOptions::default();
//! let pg = Escaper::new(DialectKind::Postgres.capabilities(), &options);
//! assert_eq!(pg.escape_string("'; DROP TABLE users; --").unwrap(), "'''; DROP TABLE users; --'");
//! assert!(pg.escape_string("nul\0byte").is_err());
//! ```

pub mod attribute;
pub mod capabilities;
pub mod config;
pub mod data_types;
pub mod error;
pub mod escape;
pub mod generator;
pub mod options;
pub mod table;
pub mod value;

pub use attribute::{AttributeDescriptor, Deferrable, ForeignKeyReference, ReferentialAction};
pub use capabilities::{DialectCapabilities, DialectKind, Operation, OptionKey};
pub use config::{DialectOptions, TransactionType};
pub use data_types::{DataType, DefaultValue};
pub use error::{DialectError, ErrorKind, Result};
pub use escape::Escaper;
pub use generator::{query_generator, BoundQuery, IndexTarget, QueryGenerator, WhereClause};
pub use table::TableReference;
pub use value::{ToValue, Value};
