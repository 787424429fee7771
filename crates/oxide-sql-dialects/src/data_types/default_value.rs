//! Interpreting column defaults read back from the schema catalog.
//!
//! Catalogs return defaults as SQL text: `'abc'::character varying`,
//! `((0))`, `nextval('seq'::regclass)`, `b'1'`. This module turns that
//! text into a [`DefaultValue`], or gives up.

use std::sync::LazyLock;

use regex::Regex;

use super::{DataType, TypeKey};
use crate::escape::Escaper;
use crate::value::Value;

/// A column default as the application sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// `DEFAULT NULL`.
    Null,
    /// A concrete value.
    Value(Value),
    /// An expression evaluated by the database, kept verbatim.
    RawSql(String),
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        if value.is_null() {
            Self::Null
        } else {
            Self::Value(value)
        }
    }
}

static FUNCTION_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*\s*\(.*\)$").expect("function call pattern")
});

static SQL_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(current_timestamp|current_date|current_time|localtimestamp|localtime|current_user|session_user|sysdate|systimestamp)(\s*\(\s*\d*\s*\))?$",
    )
    .expect("SQL keyword pattern")
});

/// Removes parentheses that wrap the whole text, as SQL Server adds them.
fn strip_wrapping_parens(mut text: &str) -> &str {
    loop {
        let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) else {
            return text;
        };
        let mut depth = 0_i32;
        let balanced = inner.chars().all(|c| {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            depth >= 0
        });
        if !balanced || depth != 0 {
            return text;
        }
        text = inner.trim();
    }
}

/// The literal part of a default, with casts and quoting removed.
#[derive(Debug, PartialEq, Eq)]
struct Literal {
    text: String,
    quoted: bool,
}

/// Splits off a quoted string literal. Returns the unescaped content and
/// whatever follows the closing quote.
fn take_quoted(text: &str) -> Option<(String, &str)> {
    let body = text
        .strip_prefix('\'')
        .or_else(|| text.strip_prefix("N'"))
        .or_else(|| text.strip_prefix("b'"))?;
    let mut out = String::new();
    let mut chars = body.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '\'' {
            if chars.peek().is_some_and(|(_, next)| *next == '\'') {
                chars.next();
                out.push('\'');
                continue;
            }
            return Some((out, &body[i + 1..]));
        }
        out.push(c);
    }
    None
}

fn literal(text: &str) -> Option<Literal> {
    if let Some((content, rest)) = take_quoted(text) {
        let rest = rest.trim();
        return (rest.is_empty() || rest.starts_with("::")).then_some(Literal {
            text: content,
            quoted: true,
        });
    }
    let bare = text.split_once("::").map_or(text, |(left, _)| left).trim();
    let bare = strip_wrapping_parens(bare);
    if bare.is_empty() {
        return None;
    }
    Some(Literal {
        text: bare.to_string(),
        quoted: false,
    })
}

fn is_plain_word(text: &str) -> bool {
    !text.contains(['\'', '"', '(', ')'])
}

pub(crate) fn parse_default_value(
    ty: &DataType,
    raw: Option<&str>,
    allow_null: bool,
    dialect: &Escaper<'_>,
) -> Option<DefaultValue> {
    let Some(raw) = raw else {
        return allow_null.then_some(DefaultValue::Null);
    };
    let text = strip_wrapping_parens(raw.trim());
    let upper = text.to_ascii_uppercase();
    if upper == "NULL" || upper.starts_with("NULL::") {
        return Some(DefaultValue::Null);
    }
    if SQL_KEYWORD.is_match(text) || FUNCTION_CALL.is_match(text) {
        return Some(DefaultValue::RawSql(text.to_string()));
    }
    let literal = literal(text)?;

    let parsed = match ty.key() {
        TypeKey::String
        | TypeKey::Char
        | TypeKey::Text
        | TypeKey::Citext
        | TypeKey::Uuid
        | TypeKey::Enum => {
            if !literal.quoted && !is_plain_word(&literal.text) {
                return None;
            }
            let value = Value::Text(literal.text);
            ty.validate(&value, dialect).ok()?;
            value
        }
        TypeKey::Json | TypeKey::Jsonb => {
            if !literal.quoted {
                return None;
            }
            Value::Json(serde_json::from_str(&literal.text).ok()?)
        }
        _ => ty
            .parse_database_value(Value::Text(literal.text), dialect)
            .ok()?,
    };
    Some(DefaultValue::from(parsed))
}
