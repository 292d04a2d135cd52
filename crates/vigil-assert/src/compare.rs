use std::collections::BTreeMap;

use serde_json::Value;
use vigil_models::{AssertionOutcome, Comparison};

use crate::path::resolve;

/// Compare the value at `path` across several named bodies.
///
/// Fails if any body lacks the path. With [`Comparison::Distinct`] every
/// value must differ; with [`Comparison::Same`] every value must match.
pub fn compare_across(
    name: &str,
    bodies: &[(&str, &Value)],
    path: &str,
    comparison: Comparison,
) -> AssertionOutcome {
    let mut observed: Vec<(&str, &Value)> = Vec::with_capacity(bodies.len());
    let mut missing: Vec<String> = Vec::new();
    for &(case, body) in bodies {
        match resolve(body, path) {
            Ok(value) => observed.push((case, value)),
            Err(miss) => missing.push(format!("{case}: {miss}")),
        }
    }

    if !missing.is_empty() {
        return AssertionOutcome::fail(
            name,
            format!("`{path}` not present in every body ({})", missing.join("; ")),
        );
    }

    let rendered: Vec<String> = observed
        .iter()
        .map(|(case, value)| format!("{case}={value}"))
        .collect();
    let summary = format!("`{path}` across {} bodies: {}", observed.len(), rendered.join(", "));

    // Canonical JSON text groups equal values; serde_json maps are key-sorted.
    let mut groups: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for &(case, value) in &observed {
        groups.entry(value.to_string()).or_default().push(case);
    }

    match comparison {
        Comparison::Distinct => {
            let collisions: Vec<String> = groups
                .iter()
                .filter(|(_, cases)| cases.len() > 1)
                .map(|(value, cases)| format!("{value} shared by [{}]", cases.join(", ")))
                .collect();
            if collisions.is_empty() {
                AssertionOutcome::pass(name, summary)
            } else {
                AssertionOutcome::fail(name, format!("{summary}; duplicates: {}", collisions.join("; ")))
            }
        }
        Comparison::Same => {
            if groups.len() <= 1 {
                AssertionOutcome::pass(name, summary)
            } else {
                AssertionOutcome::fail(
                    name,
                    format!("{summary}; expected one value, saw {}", groups.len()),
                )
            }
        }
    }
}
