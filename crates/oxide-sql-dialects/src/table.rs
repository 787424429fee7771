//! Table references.

use serde::{Deserialize, Serialize};

/// Separator used when a schema is folded into the table name.
pub const DEFAULT_DELIMITER: &str = ".";

/// A table, optionally qualified by a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    /// Schema name.
    #[serde(default)]
    pub schema: Option<String>,
    /// Table name.
    pub table_name: String,
    /// Separator placed between schema and table when the dialect has no
    /// schemas. Defaults to `.`.
    #[serde(default)]
    pub delimiter: Option<String>,
}

impl TableReference {
    /// Creates an unqualified table reference.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            schema: None,
            table_name: table_name.into(),
            delimiter: None,
        }
    }

    /// Sets the schema.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Sets the folding delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Returns the folding delimiter.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        self.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER)
    }
}

impl From<&str> for TableReference {
    fn from(table_name: &str) -> Self {
        Self::new(table_name)
    }
}

impl From<String> for TableReference {
    fn from(table_name: String) -> Self {
        Self::new(table_name)
    }
}

impl From<&TableReference> for TableReference {
    fn from(table: &TableReference) -> Self {
        table.clone()
    }
}
