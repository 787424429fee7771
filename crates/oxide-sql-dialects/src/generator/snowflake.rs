//! Snowflake query generation. Mostly the information-schema defaults.

use super::{logged, QueryGenerator};
use crate::capabilities::DialectKind;
use crate::config::DialectOptions;
use crate::error::Result;
use crate::escape::Escaper;
use crate::options::{OptionBag, TruncateOptions};
use crate::table::TableReference;

/// Snowflake dialect.
#[derive(Debug, Clone, Default)]
pub struct SnowflakeDialect {
    options: DialectOptions,
}

impl SnowflakeDialect {
    /// Creates a Snowflake generator.
    #[must_use]
    pub const fn new(options: DialectOptions) -> Self {
        Self { options }
    }
}

impl QueryGenerator for SnowflakeDialect {
    fn escaper(&self) -> Escaper<'_> {
        Escaper::new(DialectKind::Snowflake.capabilities(), &self.options)
    }

    fn version_query(&self) -> Result<String> {
        let e = self.escaper();
        logged(
            &e,
            "version query",
            format!("SELECT CURRENT_VERSION() AS {}", e.quote_identifier("version")),
        )
    }

    fn schema_comment_sql(&self, literal: &str) -> String {
        format!(" COMMENT = {literal}")
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
}
