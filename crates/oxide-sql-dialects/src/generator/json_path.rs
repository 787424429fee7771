//! JSON path segments and `$.a[0]."b c"` path strings.

use std::sync::LazyLock;

use regex::Regex;

/// One step of a JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonPathSegment {
    /// Object member.
    Key(String),
    /// Array element.
    Index(u64),
}

impl From<&str> for JsonPathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for JsonPathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<u64> for JsonPathSegment {
    fn from(index: u64) -> Self {
        Self::Index(index)
    }
}

static PLAIN_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("plain key pattern"));

fn is_plain_key(key: &str) -> bool {
    PLAIN_KEY.is_match(key)
}

/// Builds the SQL/JSON path of `segments`, starting at `$`.
#[must_use]
pub fn json_path(segments: &[JsonPathSegment]) -> String {
    let mut path = String::from("$");
    for segment in segments {
        match segment {
            JsonPathSegment::Index(index) => {
                path.push('[');
                path.push_str(&index.to_string());
                path.push(']');
            }
            JsonPathSegment::Key(key) if is_plain_key(key) => {
                path.push('.');
                path.push_str(key);
            }
            JsonPathSegment::Key(key) => {
                path.push_str(".\"");
                for c in key.chars() {
                    if matches!(c, '"' | '\\') {
                        path.push('\\');
                    }
                    path.push(c);
                }
                path.push('"');
            }
        }
    }
    path
}
