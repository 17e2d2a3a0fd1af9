//! Data carried between the pipeline stages

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Named result fields produced by one extraction, each an ordered list of values
pub type ResultSet = BTreeMap<String, Vec<String>>;

/// Values extracted from a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractResult {
    pub path: PathBuf,
    pub extracted_vars: ResultSet,
}

impl ExtractResult {
    pub fn new(path: impl Into<PathBuf>, extracted_vars: ResultSet) -> Self {
        Self {
            path: path.into(),
            extracted_vars,
        }
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.extracted_vars.get(name).map(Vec::as_slice)
    }
}

/// Verification errors reported for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub errors: Vec<String>,
}

/// Outcome of running one plugin over all of its files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginRunResult {
    pub name: String,
    pub path: PathBuf,
    pub results: Vec<ExtractResult>,
    pub found_errors: bool,
    pub failures: Vec<FileFailure>,
}

impl PluginRunResult {
    /// Concatenates a field across every file this plugin processed, in file order.
    ///
    /// Returns `None` when no file produced the field at all.
    pub fn field_values(&self, field: &str) -> Option<Vec<String>> {
        let mut found = false;
        let mut values = Vec::new();

        for result in &self.results {
            if let Some(field_values) = result.field(field) {
                found = true;
                values.extend_from_slice(field_values);
            }
        }

        found.then_some(values)
    }
}

/// Final state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every plugin ran and every file verified cleanly
    Success,
    /// All plugins ran but at least one file had mismatches
    VerificationErrors,
    /// At least one plugin declared requirements that could not be satisfied
    RequirementFailures,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunStatus::Success => "success",
            RunStatus::VerificationErrors => "verification_errors",
            RunStatus::RequirementFailures => "requirement_failures",
        };
        f.write_str(label)
    }
}
