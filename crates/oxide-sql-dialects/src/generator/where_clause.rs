//! A small typed WHERE clause.

use crate::attribute::AttributeDescriptor;
use crate::error::Result;
use crate::escape::{BindParams, Escaper};
use crate::value::{ToValue, Value};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
}

impl ComparisonOp {
    /// Returns the SQL operator.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
        }
    }
}

/// A row filter. Column names are quoted and values are escaped or bound
/// when the clause is rendered.
///
/// ```
/// use oxide_sql_dialects::generator::WhereClause;
///
/// let filter = WhereClause::eq("status", "active").and(WhereClause::is_null("deleted_at"));
/// assert!(matches!(filter, WhereClause::And(ref parts) if parts.len() == 2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum WhereClause {
    /// `column op value`.
    Compare {
        /// Column name, optionally dotted.
        column: String,
        /// Operator.
        op: ComparisonOp,
        /// Right-hand side.
        value: Value,
    },
    /// `column [NOT] IN (values)`.
    In {
        /// Column name.
        column: String,
        /// Candidate values.
        values: Vec<Value>,
        /// `NOT IN`.
        negated: bool,
    },
    /// `column IS [NOT] NULL`.
    IsNull {
        /// Column name.
        column: String,
        /// `IS NOT NULL`.
        negated: bool,
    },
    /// All parts hold.
    And(Vec<WhereClause>),
    /// Any part holds.
    Or(Vec<WhereClause>),
    /// Negation.
    Not(Box<WhereClause>),
}

impl WhereClause {
    fn compare(column: impl Into<String>, op: ComparisonOp, value: impl ToValue) -> Self {
        Self::Compare {
            column: column.into(),
            op,
            value: value.to_value(),
        }
    }

    /// `column = value`; a NULL value renders `IS NULL`.
    pub fn eq(column: impl Into<String>, value: impl ToValue) -> Self {
        Self::compare(column, ComparisonOp::Eq, value)
    }

    /// `column != value`; a NULL value renders `IS NOT NULL`.
    pub fn ne(column: impl Into<String>, value: impl ToValue) -> Self {
        Self::compare(column, ComparisonOp::Ne, value)
    }

    /// `column > value`.
    pub fn gt(column: impl Into<String>, value: impl ToValue) -> Self {
        Self::compare(column, ComparisonOp::Gt, value)
    }

    /// `column >= value`.
    pub fn gte(column: impl Into<String>, value: impl ToValue) -> Self {
        Self::compare(column, ComparisonOp::Gte, value)
    }

    /// `column < value`.
    pub fn lt(column: impl Into<String>, value: impl ToValue) -> Self {
        Self::compare(column, ComparisonOp::Lt, value)
    }

    /// `column <= value`.
    pub fn lte(column: impl Into<String>, value: impl ToValue) -> Self {
        Self::compare(column, ComparisonOp::Lte, value)
    }

    /// `column LIKE pattern`.
    pub fn like(column: impl Into<String>, pattern: impl ToValue) -> Self {
        Self::compare(column, ComparisonOp::Like, pattern)
    }

    /// `column IN (values)`.
    pub fn is_in<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToValue,
    {
        Self::In {
            column: column.into(),
            values: values.into_iter().map(|v| v.to_value()).collect(),
            negated: false,
        }
    }

    /// `column NOT IN (values)`.
    pub fn not_in<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToValue,
    {
        Self::In {
            column: column.into(),
            values: values.into_iter().map(|v| v.to_value()).collect(),
            negated: true,
        }
    }

    /// `column IS NULL`.
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::IsNull {
            column: column.into(),
            negated: false,
        }
    }

    /// `column IS NOT NULL`.
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self::IsNull {
            column: column.into(),
            negated: true,
        }
    }

    /// Conjunction, flattening nested ANDs.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match self {
            Self::And(mut parts) => {
                parts.push(other);
                Self::And(parts)
            }
            first => Self::And(vec![first, other]),
        }
    }

    /// Disjunction, flattening nested ORs.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Or(mut parts) => {
                parts.push(other);
                Self::Or(parts)
            }
            first => Self::Or(vec![first, other]),
        }
    }

    /// Negation.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Renders the clause with every value escaped inline.
    pub fn to_inline_sql(&self, escaper: &Escaper<'_>) -> Result<String> {
        self.render(&mut ValueWriter::inline(*escaper, &[]))
    }

    pub(crate) fn render(&self, writer: &mut ValueWriter<'_, '_>) -> Result<String> {
        match self {
            Self::Compare { column, op, value } => {
                let quoted = writer.escaper.quote_identifiers(column);
                match (op, value.is_null()) {
                    (ComparisonOp::Eq, true) => Ok(format!("{quoted} IS NULL")),
                    (ComparisonOp::Ne, true) => Ok(format!("{quoted} IS NOT NULL")),
                    _ => Ok(format!(
                        "{quoted} {} {}",
                        op.as_sql(),
                        writer.value(column, value)?
                    )),
                }
            }
            Self::In {
                column,
                values,
                negated,
            } => {
                // Nothing matches an empty IN; nothing is excluded by an empty NOT IN.
                if values.is_empty() {
                    return Ok(String::from(if *negated { "1 = 1" } else { "1 = 0" }));
                }
                let quoted = writer.escaper.quote_identifiers(column);
                let keyword = if *negated { "NOT IN" } else { "IN" };
                let rendered = values
                    .iter()
                    .map(|value| writer.value(column, value))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("{quoted} {keyword} ({})", rendered.join(", ")))
            }
            Self::IsNull { column, negated } => Ok(format!(
                "{} IS {}NULL",
                writer.escaper.quote_identifiers(column),
                if *negated { "NOT " } else { "" }
            )),
            Self::And(parts) => render_group(parts, " AND ", "1 = 1", writer),
            Self::Or(parts) => render_group(parts, " OR ", "1 = 0", writer),
            Self::Not(inner) => Ok(format!("NOT ({})", inner.render(writer)?)),
        }
    }
}

fn render_group(
    parts: &[WhereClause],
    separator: &str,
    empty: &str,
    writer: &mut ValueWriter<'_, '_>,
) -> Result<String> {
    match parts {
        [] => Ok(empty.to_string()),
        [single] => single.render(writer),
        _ => {
            let rendered = parts
                .iter()
                .map(|part| match part {
                    WhereClause::And(_) | WhereClause::Or(_) => {
                        part.render(writer).map(|sql| format!("({sql})"))
                    }
                    _ => part.render(writer),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(rendered.join(separator))
        }
    }
}

/// Turns values into SQL: a placeholder when collecting bind parameters,
/// an escaped literal otherwise. Values of known columns go through the
/// column's data type.
pub(crate) struct ValueWriter<'w, 'a> {
    pub(crate) escaper: Escaper<'a>,
    binds: Option<BindParams>,
    attributes: &'w [AttributeDescriptor],
}

impl<'w, 'a> ValueWriter<'w, 'a> {
    pub(crate) const fn inline(
        escaper: Escaper<'a>,
        attributes: &'w [AttributeDescriptor],
    ) -> Self {
        Self {
            escaper,
            binds: None,
            attributes,
        }
    }

    /// Binds values when the dialect options ask for bind parameters.
    pub(crate) fn for_dml(escaper: Escaper<'a>, attributes: &'w [AttributeDescriptor]) -> Self {
        let binds = escaper
            .options()
            .bind_parameters
            .then(|| escaper.bind_params());
        Self {
            escaper,
            binds,
            attributes,
        }
    }

    pub(crate) fn value(&mut self, column: &str, value: &Value) -> Result<String> {
        let data_type = self
            .attributes
            .iter()
            .find(|attribute| attribute.name == column)
            .map(|attribute| &attribute.data_type);
        match &mut self.binds {
            Some(binds) => {
                let bindable = match data_type {
                    Some(data_type) if !value.is_null() => {
                        data_type.validate(value, &self.escaper)?;
                        data_type.to_bindable_value(value, &self.escaper)?
                    }
                    _ => value.clone(),
                };
                Ok(binds.bind(bindable))
            }
            None => self.escaper.escape(value, data_type),
        }
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.binds.map(BindParams::into_values).unwrap_or_default()
    }
}
