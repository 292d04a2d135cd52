use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use vigil_models::{CaseTarget, TestCase};

use crate::error::{ConfigError, SuiteError};

/// An ordered, validated list of test cases.
///
/// Names are unique, and every dependency points at an earlier probe case.
#[derive(Debug, Clone)]
pub struct Suite {
    cases: Vec<TestCase>,
}

impl Suite {
    pub fn new(cases: Vec<TestCase>) -> Result<Self, SuiteError> {
        validate(&cases)?;
        Ok(Self { cases })
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

fn validate(cases: &[TestCase]) -> Result<(), SuiteError> {
    // name -> whether the case issues its own probe
    let mut seen: HashMap<&str, bool> = HashMap::new();

    for case in cases {
        if seen.contains_key(case.name.as_str()) {
            return Err(SuiteError::DuplicateName(case.name.clone()));
        }

        match &case.target {
            CaseTarget::Probe { request, .. } => {
                if request.timeout_seconds == Some(0) {
                    return Err(SuiteError::ZeroTimeout(case.name.clone()));
                }
            }
            CaseTarget::Reuse { .. } => {
                if case.checks.is_empty() {
                    return Err(SuiteError::NoChecks(case.name.clone()));
                }
            }
            CaseTarget::Compare { cases: sources, .. } => {
                if sources.len() < 2 {
                    return Err(SuiteError::TooFewToCompare(case.name.clone()));
                }
                let mut distinct = HashSet::new();
                if let Some(repeated) = sources.iter().find(|s| !distinct.insert(s.as_str())) {
                    return Err(SuiteError::RepeatedSource {
                        case: case.name.clone(),
                        dependency: repeated.clone(),
                    });
                }
            }
        }

        for dependency in case.dependencies() {
            match seen.get(dependency) {
                Some(true) => {}
                Some(false) => {
                    return Err(SuiteError::NotAProbe {
                        case: case.name.clone(),
                        dependency: dependency.to_string(),
                    })
                }
                None => {
                    return Err(SuiteError::UnknownDependency {
                        case: case.name.clone(),
                        dependency: dependency.to_string(),
                    })
                }
            }
        }

        let is_probe = matches!(case.target, CaseTarget::Probe { .. });
        seen.insert(case.name.as_str(), is_probe);
    }

    Ok(())
}

/// Extra cases declared in TOML as `[[cases]]` tables.
#[derive(Debug, Deserialize)]
struct SuiteFile {
    #[serde(default)]
    cases: Vec<TestCase>,
}

/// Load extra cases. Probe requests without their own `timeout_seconds`
/// get `default_timeout_seconds`.
pub fn load_suite_file(
    path: &str,
    default_timeout_seconds: u64,
) -> Result<Vec<TestCase>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    let file: SuiteFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;
    Ok(file
        .cases
        .into_iter()
        .map(|case| case.with_default_timeout(default_timeout_seconds))
        .collect())
}
