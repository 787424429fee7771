//! Column descriptors.
//!
//! An [`AttributeDescriptor`] is built once, fluently, when a model is
//! defined and is then read by every generator that renders columns.

use crate::data_types::{DataType, DefaultValue};
use crate::table::TableReference;
use crate::value::ToValue;

/// Referential action of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    /// No action.
    NoAction,
    /// Restrict deletion/update.
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set to NULL.
    SetNull,
    /// Set to default value.
    SetDefault,
}

impl ReferentialAction {
    /// Returns the SQL representation of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// When a deferrable constraint is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferrable {
    /// `DEFERRABLE INITIALLY IMMEDIATE`.
    InitiallyImmediate,
    /// `DEFERRABLE INITIALLY DEFERRED`.
    InitiallyDeferred,
    /// `NOT DEFERRABLE`.
    NotDeferrable,
}

impl Deferrable {
    /// The clause appended to the constraint.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::InitiallyImmediate => "DEFERRABLE INITIALLY IMMEDIATE",
            Self::InitiallyDeferred => "DEFERRABLE INITIALLY DEFERRED",
            Self::NotDeferrable => "NOT DEFERRABLE",
        }
    }
}

/// A foreign key reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyReference {
    /// The referenced table.
    pub table: TableReference,
    /// The referenced column.
    pub key: String,
    /// Action on delete.
    pub on_delete: Option<ReferentialAction>,
    /// Action on update.
    pub on_update: Option<ReferentialAction>,
    /// Deferrability.
    pub deferrable: Option<Deferrable>,
}

impl ForeignKeyReference {
    /// A reference to `table.key`.
    pub fn new(table: impl Into<TableReference>, key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key: key.into(),
            on_delete: None,
            on_update: None,
            deferrable: None,
        }
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub const fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    /// Sets the ON UPDATE action.
    #[must_use]
    pub const fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }

    /// Makes the constraint deferrable.
    #[must_use]
    pub const fn deferrable(mut self, deferrable: Deferrable) -> Self {
        self.deferrable = Some(deferrable);
        self
    }
}

/// Column uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unique {
    /// The column alone is unique.
    Column,
    /// The column is part of a named composite unique key.
    Group(String),
}

/// A column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    /// Column name.
    pub name: String,
    /// Logical type.
    pub data_type: DataType,
    /// Whether NULL is allowed.
    pub allow_null: bool,
    /// Part of the primary key.
    pub primary_key: bool,
    /// Generated by the database.
    pub auto_increment: bool,
    /// Uniqueness, if any.
    pub unique: Option<Unique>,
    /// Foreign key reference, if any.
    pub references: Option<ForeignKeyReference>,
    /// Default value, if any.
    pub default: Option<DefaultValue>,
    /// Column comment.
    pub comment: Option<String>,
}

impl AttributeDescriptor {
    /// A nullable column with no constraints.
    pub fn new(name: impl Into<String>, data_type: impl Into<DataType>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            allow_null: true,
            primary_key: false,
            auto_increment: false,
            unique: None,
            references: None,
            default: None,
            comment: None,
        }
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.allow_null = false;
        self
    }

    /// Marks the column as part of the primary key. Implies NOT NULL.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.allow_null = false;
        self
    }

    /// Marks the column as generated by the database.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Makes the column unique on its own.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = Some(Unique::Column);
        self
    }

    /// Adds the column to a named composite unique key.
    #[must_use]
    pub fn unique_group(mut self, name: impl Into<String>) -> Self {
        self.unique = Some(Unique::Group(name.into()));
        self
    }

    /// Sets the foreign key reference.
    #[must_use]
    pub fn references(mut self, reference: ForeignKeyReference) -> Self {
        self.references = Some(reference);
        self
    }

    /// Sets a value default.
    #[must_use]
    pub fn default_value(mut self, value: impl ToValue) -> Self {
        self.default = Some(DefaultValue::from(value.to_value()));
        self
    }

    /// Sets a SQL expression default, e.g. `CURRENT_TIMESTAMP`. The text is
    /// emitted verbatim.
    #[must_use]
    pub fn default_raw(mut self, sql: impl Into<String>) -> Self {
        self.default = Some(DefaultValue::RawSql(sql.into()));
        self
    }

    /// Sets a NULL default.
    #[must_use]
    pub fn default_null(mut self) -> Self {
        self.default = Some(DefaultValue::Null);
        self
    }

    /// Sets the column comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_basic_column() {
        let col = AttributeDescriptor::new("id", DataType::integer());
        assert_eq!(col.name, "id");
        assert_eq!(col.data_type, DataType::integer());
        assert!(col.allow_null);
        assert!(!col.primary_key);
    }

    #[test]
    fn test_primary_key_column() {
        let col = AttributeDescriptor::new("id", DataType::bigint())
            .primary_key()
            .auto_increment();
        assert!(col.primary_key);
        assert!(col.auto_increment);
        assert!(!col.allow_null);
    }

    #[test]
    fn test_column_with_default() {
        let col = AttributeDescriptor::new("active", DataType::boolean())
            .not_null()
            .default_value(Value::Bool(true));
        assert_eq!(col.default, Some(DefaultValue::Value(Value::Bool(true))));

        let col = AttributeDescriptor::new("created_at", DataType::date())
            .default_raw("CURRENT_TIMESTAMP");
        assert_eq!(
            col.default,
            Some(DefaultValue::RawSql(String::from("CURRENT_TIMESTAMP")))
        );

        let col = AttributeDescriptor::new("note", DataType::text()).default_value(Value::Null);
        assert_eq!(col.default, Some(DefaultValue::Null));
    }

    #[test]
    fn test_foreign_key_column() {
        let col = AttributeDescriptor::new("user_id", DataType::integer()).references(
            ForeignKeyReference::new("users", "id")
                .on_delete(ReferentialAction::Cascade)
                .deferrable(Deferrable::InitiallyDeferred),
        );
        let fk = col.references.unwrap();
        assert_eq!(fk.table, TableReference::new("users"));
        assert_eq!(fk.key, "id");
        assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));
        assert_eq!(
            fk.deferrable.map(Deferrable::as_sql),
            Some("DEFERRABLE INITIALLY DEFERRED")
        );
    }

    #[test]
    fn test_referential_action_sql() {
        assert_eq!(ReferentialAction::SetNull.as_sql(), "SET NULL");
        assert_eq!(ReferentialAction::NoAction.as_sql(), "NO ACTION");
    }
}
