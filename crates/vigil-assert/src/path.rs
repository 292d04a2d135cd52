use std::fmt;

use serde_json::Value;

/// Why a dotted path did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMiss {
    /// `at` is the prefix that was looked up and not found.
    Missing { at: String },
    /// `at` resolved to a scalar, so the next segment could not be applied.
    NotContainer { at: String, kind: &'static str },
}

impl fmt::Display for PathMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathMiss::Missing { at } => write!(f, "`{at}` is missing"),
            PathMiss::NotContainer { at, kind } => {
                write!(f, "`{at}` is {kind}, cannot descend into it")
            }
        }
    }
}

/// Resolve a dotted path. A numeric segment indexes into an array; an empty
/// path is the root itself.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Result<&'a Value, PathMiss> {
    if path.is_empty() {
        return Ok(root);
    }

    let segments: Vec<&str> = path.split('.').collect();
    let mut current = root;
    for (i, segment) in segments.iter().enumerate() {
        let next = match current {
            Value::Object(map) => map.get(*segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            other => {
                return Err(PathMiss::NotContainer {
                    at: prefix(&segments, i),
                    kind: json_kind(other),
                })
            }
        };
        match next {
            Some(value) => current = value,
            None => {
                return Err(PathMiss::Missing {
                    at: prefix(&segments, i + 1),
                })
            }
        }
    }
    Ok(current)
}

fn prefix(segments: &[&str], len: usize) -> String {
    if len == 0 {
        "<root>".to_string()
    } else {
        segments[..len].join(".")
    }
}

/// Article-prefixed JSON type name for messages ("a string", "an array").
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
