use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;
use vigil_models::{AssertionOutcome, Check, Expectation, Predicate, Rule};

use crate::number::{json_eq, to_decimal};
use crate::path::{json_kind, resolve};

/// Evaluate every check against `body`, one outcome per check, in order.
pub fn assert_shape(body: &Value, checks: &[Check]) -> Vec<AssertionOutcome> {
    checks.iter().map(|check| evaluate(body, check)).collect()
}

/// Evaluate a single check.
pub fn evaluate(body: &Value, check: &Check) -> AssertionOutcome {
    let (passed, details) = match &check.rule {
        Rule::Required { paths } => required(body, paths),
        Rule::OneOf { path, allowed } => one_of(body, path, allowed),
        Rule::Numeric { path } => numeric(body, path),
        Rule::When { path, equals, then } => when(body, path, equals, then),
        Rule::CoversSet {
            records,
            key,
            expected,
        } => covers_set(body, records, key, expected),
        Rule::KeysCover { path, expected } => keys_cover(body, path, expected),
        Rule::Equals { path, value } => equals(body, path, value),
        Rule::NonEmpty { path } => non_empty(body, path),
        Rule::Contains { path, substring } => contains(body, path, substring),
    };
    debug!(check = %check.name, passed, "Check evaluated");
    AssertionOutcome::new(&check.name, passed, details)
}

type Verdict = (bool, String);

fn required(body: &Value, paths: &[String]) -> Verdict {
    let missing: Vec<&str> = paths
        .iter()
        .filter(|p| resolve(body, p).is_err())
        .map(String::as_str)
        .collect();
    if missing.is_empty() {
        (true, format!("All required fields present: {}", list(paths)))
    } else {
        (false, format!("Missing required fields: {}", list(&missing)))
    }
}

fn one_of(body: &Value, path: &str, allowed: &[Value]) -> Verdict {
    let value = match resolve(body, path) {
        Ok(v) => v,
        Err(miss) => return (false, miss.to_string()),
    };
    if allowed.iter().any(|a| json_eq(a, value)) {
        (true, format!("`{path}` = {value} is permitted"))
    } else {
        (
            false,
            format!("`{path}` = {value} is not one of {}", values(allowed)),
        )
    }
}

fn numeric(body: &Value, path: &str) -> Verdict {
    match resolve(body, path) {
        Ok(value @ Value::Number(_)) => (true, format!("`{path}` = {value} is numeric")),
        Ok(other) => (
            false,
            format!("`{path}` is {}, expected a number", json_kind(other)),
        ),
        Err(miss) => (false, miss.to_string()),
    }
}

fn when(body: &Value, path: &str, guard: &Value, then: &[Expectation]) -> Verdict {
    let actual = match resolve(body, path) {
        Ok(v) => v,
        Err(miss) => {
            return (
                true,
                format!("Guard not met: {miss} (rule applies when `{path}` = {guard})"),
            )
        }
    };
    if !json_eq(actual, guard) {
        return (
            true,
            format!("Guard not met: `{path}` = {actual} (rule applies when {guard})"),
        );
    }

    let violations: Vec<String> = then
        .iter()
        .filter_map(|expectation| {
            let value = resolve(body, &expectation.path).ok();
            check_predicate(&expectation.path, value, &expectation.predicate).err()
        })
        .collect();

    if violations.is_empty() {
        (
            true,
            format!(
                "`{path}` = {guard}: all {} conditions hold",
                then.len()
            ),
        )
    } else {
        (
            false,
            format!("`{path}` = {guard} but {}", violations.join("; ")),
        )
    }
}

/// `Ok(())` when the predicate holds, otherwise a one-line description of
/// the mismatch.
fn check_predicate(path: &str, value: Option<&Value>, predicate: &Predicate) -> Result<(), String> {
    let Some(value) = value else {
        return Err(format!("`{path}` is missing"));
    };
    match predicate {
        Predicate::Present => Ok(()),
        Predicate::Equals(expected) => {
            if json_eq(value, expected) {
                Ok(())
            } else {
                Err(format!("`{path}` = {value}, expected {expected}"))
            }
        }
        Predicate::NumberEquals(expected) => match value {
            Value::Number(n) => match to_decimal(n) {
                Some(actual) if actual == *expected => Ok(()),
                _ => Err(format!("`{path}` = {value}, expected {expected}")),
            },
            other => Err(format!(
                "`{path}` is {}, expected number {expected}",
                json_kind(other)
            )),
        },
        Predicate::NonEmpty => match length(value) {
            Some(0) => Err(format!("`{path}` is empty")),
            Some(_) => Ok(()),
            None => Err(format!(
                "`{path}` is {}, expected a non-empty collection",
                json_kind(value)
            )),
        },
        Predicate::OneOf(allowed) => {
            if allowed.iter().any(|a| json_eq(a, value)) {
                Ok(())
            } else {
                Err(format!("`{path}` = {value} is not one of {}", values(allowed)))
            }
        }
        Predicate::Contains(needle) => match value {
            Value::String(s) if s.contains(needle.as_str()) => Ok(()),
            Value::String(s) => Err(format!("`{path}` = {s:?} does not contain {needle:?}")),
            other => Err(format!("`{path}` is {}, expected a string", json_kind(other))),
        },
    }
}

fn covers_set(body: &Value, records: &str, key: &str, expected: &[String]) -> Verdict {
    let items = match resolve(body, records) {
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            return (
                false,
                format!("`{records}` is {}, expected an array", json_kind(other)),
            )
        }
        Err(miss) => return (false, miss.to_string()),
    };

    let mut unlabeled = 0usize;
    let found: BTreeSet<String> = items
        .iter()
        .filter_map(|item| {
            let label = item.get(key).and_then(label_of);
            if label.is_none() {
                unlabeled += 1;
            }
            label
        })
        .collect();

    let (passed, mut details) = set_difference("Found", &found, expected);
    if unlabeled > 0 {
        details.push_str(&format!(", {unlabeled} record(s) without `{key}`"));
    }
    (passed, details)
}

fn keys_cover(body: &Value, path: &str, expected: &[String]) -> Verdict {
    match resolve(body, path) {
        Ok(Value::Object(map)) => {
            let found: BTreeSet<String> = map.keys().cloned().collect();
            set_difference("Found keys", &found, expected)
        }
        Ok(other) => (
            false,
            format!("`{path}` is {}, expected an object", json_kind(other)),
        ),
        Err(miss) => (false, miss.to_string()),
    }
}

/// Passes when `expected ⊆ found`. Extra labels are reported, not failed.
fn set_difference(prefix: &str, found: &BTreeSet<String>, expected: &[String]) -> Verdict {
    let expected: BTreeSet<String> = expected.iter().cloned().collect();
    let missing: Vec<&String> = expected.difference(found).collect();
    let extra: Vec<&String> = found.difference(&expected).collect();

    let mut details = format!("{prefix}: {}", list(found));
    if !missing.is_empty() {
        details.push_str(&format!(", Missing: {}", list(&missing)));
    }
    if !extra.is_empty() {
        details.push_str(&format!(", Extra: {}", list(&extra)));
    }
    (missing.is_empty(), details)
}

fn equals(body: &Value, path: &str, expected: &Value) -> Verdict {
    match resolve(body, path) {
        Ok(actual) if json_eq(actual, expected) => (true, format!("`{path}` = {actual}")),
        Ok(actual) => (false, format!("`{path}` = {actual}, expected {expected}")),
        Err(miss) => (false, miss.to_string()),
    }
}

fn non_empty(body: &Value, path: &str) -> Verdict {
    let value = match resolve(body, path) {
        Ok(v) => v,
        Err(miss) => return (false, miss.to_string()),
    };
    match (value, length(value)) {
        (_, Some(0)) => (false, format!("`{path}` is empty")),
        (Value::Object(map), Some(_)) => (
            true,
            format!("`{path}` has keys: {}", list(&map.keys().collect::<Vec<_>>())),
        ),
        (_, Some(n)) => (true, format!("`{path}` has {n} entries")),
        (other, None) => (
            false,
            format!(
                "`{path}` is {}, expected a non-empty collection",
                json_kind(other)
            ),
        ),
    }
}

fn contains(body: &Value, path: &str, needle: &str) -> Verdict {
    match resolve(body, path) {
        Ok(Value::String(s)) if s.contains(needle) => {
            (true, format!("`{path}` contains {needle:?}"))
        }
        Ok(Value::String(s)) => (false, format!("`{path}` = {s:?} does not contain {needle:?}")),
        Ok(other) => (
            false,
            format!("`{path}` is {}, expected a string", json_kind(other)),
        ),
        Err(miss) => (false, miss.to_string()),
    }
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        Value::String(s) => Some(s.len()),
        _ => None,
    }
}

fn label_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `[a, b, c]` for any displayable items.
fn list<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    let rendered: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

fn values(items: &[Value]) -> String {
    list(items.iter())
}
