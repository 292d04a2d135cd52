use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named rule. Evaluating a check always yields exactly one outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Check {
    pub name: String,
    pub rule: Rule,
}

/// Shape rules over a JSON body. Paths are dotted (`meta.liveSamples`); a
/// numeric segment indexes into an array (`comparisons.0.cohort`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Every listed path must resolve.
    Required { paths: Vec<String> },
    /// The value at `path` must equal one of `allowed`.
    OneOf { path: String, allowed: Vec<Value> },
    /// The value at `path` must be a JSON number. Zero is valid.
    Numeric { path: String },
    /// When the value at `path` equals `equals`, every expectation must hold.
    When {
        path: String,
        equals: Value,
        then: Vec<Expectation>,
    },
    /// The labels read from `key` in each record of the array at `records`
    /// must include every `expected` label.
    CoversSet {
        records: String,
        key: String,
        expected: Vec<String>,
    },
    /// The keys of the object at `path` must include every `expected` key.
    KeysCover { path: String, expected: Vec<String> },
    /// The value at `path` must equal `value`.
    Equals { path: String, value: Value },
    /// The array, object or string at `path` must be non-empty.
    NonEmpty { path: String },
    /// The string at `path` must contain `substring`.
    Contains { path: String, substring: String },
}

/// A predicate applied to one field inside a conditional rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expectation {
    pub path: String,
    pub predicate: Predicate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Present,
    Equals(Value),
    /// Numeric equality, compared as decimals so `0`, `0.0` and `-0` agree.
    NumberEquals(Decimal),
    NonEmpty,
    OneOf(Vec<Value>),
    Contains(String),
}

impl Expectation {
    pub fn new(path: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            path: path.into(),
            predicate,
        }
    }
}

impl Check {
    pub fn new(name: impl Into<String>, rule: Rule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    pub fn required(name: impl Into<String>, paths: &[&str]) -> Self {
        Self::new(
            name,
            Rule::Required {
                paths: paths.iter().map(|p| p.to_string()).collect(),
            },
        )
    }

    pub fn one_of(name: impl Into<String>, path: impl Into<String>, allowed: Vec<Value>) -> Self {
        Self::new(
            name,
            Rule::OneOf {
                path: path.into(),
                allowed,
            },
        )
    }

    pub fn numeric(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, Rule::Numeric { path: path.into() })
    }

    pub fn when(
        name: impl Into<String>,
        path: impl Into<String>,
        equals: Value,
        then: Vec<Expectation>,
    ) -> Self {
        Self::new(
            name,
            Rule::When {
                path: path.into(),
                equals,
                then,
            },
        )
    }

    pub fn covers_set(
        name: impl Into<String>,
        records: impl Into<String>,
        key: impl Into<String>,
        expected: &[String],
    ) -> Self {
        Self::new(
            name,
            Rule::CoversSet {
                records: records.into(),
                key: key.into(),
                expected: expected.to_vec(),
            },
        )
    }

    pub fn keys_cover(name: impl Into<String>, path: impl Into<String>, expected: &[String]) -> Self {
        Self::new(
            name,
            Rule::KeysCover {
                path: path.into(),
                expected: expected.to_vec(),
            },
        )
    }

    pub fn equals(name: impl Into<String>, path: impl Into<String>, value: Value) -> Self {
        Self::new(
            name,
            Rule::Equals {
                path: path.into(),
                value,
            },
        )
    }

    pub fn non_empty(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, Rule::NonEmpty { path: path.into() })
    }

    pub fn contains(
        name: impl Into<String>,
        path: impl Into<String>,
        substring: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            Rule::Contains {
                path: path.into(),
                substring: substring.into(),
            },
        )
    }
}
