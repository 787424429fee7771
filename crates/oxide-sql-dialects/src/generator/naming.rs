//! Derived names for indexes, constraints and enum types.
//!
//! Derivation is deterministic: the name used to create an object is the
//! name used later to drop it.

use sha2::{Digest, Sha256};

use crate::escape::hex;
use crate::table::TableReference;

/// Length of `_` plus the hash suffix of a truncated name.
const HASH_SUFFIX_LEN: usize = 9;

/// `{prefix or table}_{fields}[_unique]`, lowercased, with every
/// character that is not ASCII alphanumeric replaced by `_`. The schema is
/// never part of the name.
pub fn index_name<S: AsRef<str>>(
    table: &TableReference,
    fields: &[S],
    prefix: Option<&str>,
    unique: bool,
    max_length: Option<usize>,
) -> String {
    let mut raw = String::from(prefix.unwrap_or(&table.table_name));
    for field in fields {
        raw.push('_');
        raw.push_str(field.as_ref());
    }
    if unique {
        raw.push_str("_unique");
    }
    let normalized: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    truncate_identifier(normalized, max_length)
}

/// `{table}_{fields}_{suffix}`.
pub(crate) fn constraint_name<S: AsRef<str>>(
    table: &str,
    fields: &[S],
    suffix: &str,
    max_length: Option<usize>,
) -> String {
    let mut name = String::from(table);
    for field in fields {
        name.push('_');
        name.push_str(field.as_ref());
    }
    name.push('_');
    name.push_str(suffix);
    truncate_identifier(name, max_length)
}

/// `enum_{table}_{column}`.
pub(crate) fn enum_type_name(table: &str, column: &str) -> String {
    format!("enum_{table}_{column}")
}

/// Cuts a name that exceeds `max_length` and appends the first 8 hex
/// digits of the SHA-256 of the full name, so distinct long names stay
/// distinct.
pub(crate) fn truncate_identifier(name: String, max_length: Option<usize>) -> String {
    let Some(max) = max_length else {
        return name;
    };
    if name.chars().count() <= max || max <= HASH_SUFFIX_LEN {
        return name;
    }
    let digest = Sha256::digest(name.as_bytes());
    let kept: String = name.chars().take(max - HASH_SUFFIX_LEN).collect();
    format!("{kept}_{}", hex(&digest[..4]))
}
