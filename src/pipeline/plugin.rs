//! Plugin definitions
//!
//! A [`PluginDescriptor`] is generic over its own config type `C`. The runner
//! only sees the object-safe [`Plugin`] trait, which keeps `C` opaque while
//! still handing it to the file source, extractor and verify steps.

use super::types::{ExtractResult, ResultSet};
use crate::extractors::{ExtractError, Extractor};
use crate::fs::{FileSource, FileSourceError, TargetFile};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a dependency's values come from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencySource {
    /// The file currently being verified
    Current,
    /// All files of an earlier plugin, by name
    Plugin(String),
}

/// A result field a verify step needs resolved before it runs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Dependency {
    pub source: DependencySource,
    pub field: String,
}

impl Dependency {
    pub fn current(field: impl Into<String>) -> Self {
        Self {
            source: DependencySource::Current,
            field: field.into(),
        }
    }

    pub fn plugin(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            source: DependencySource::Plugin(name.into()),
            field: field.into(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            DependencySource::Current => write!(f, "this.{}", self.field),
            DependencySource::Plugin(name) => write!(f, "{}.{}", name, self.field),
        }
    }
}

type EvaluateFn<C> = Arc<dyn Fn(&C, &[Vec<String>]) -> Vec<String> + Send + Sync>;

/// A cross-check over resolved dependency values.
///
/// `evaluate` receives one argument per dependency, in declaration order, and
/// returns human-readable errors. An empty list means the step passed.
pub struct VerifyStep<C> {
    pub dependencies: Vec<Dependency>,
    evaluate: EvaluateFn<C>,
}

impl<C> VerifyStep<C> {
    pub fn new<F>(dependencies: Vec<Dependency>, evaluate: F) -> Self
    where
        F: Fn(&C, &[Vec<String>]) -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            dependencies,
            evaluate: Arc::new(evaluate),
        }
    }

    pub fn evaluate(&self, config: &C, args: &[Vec<String>]) -> Vec<String> {
        (self.evaluate)(config, args)
    }
}

impl<C> Clone for VerifyStep<C> {
    fn clone(&self) -> Self {
        Self {
            dependencies: self.dependencies.clone(),
            evaluate: Arc::clone(&self.evaluate),
        }
    }
}

impl<C> fmt::Debug for VerifyStep<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyStep")
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Replaces the report line for a file; receives the path relative to the root
#[derive(Clone)]
pub struct MessageFormatter(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl MessageFormatter {
    pub fn new<F>(format: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(format))
    }

    pub fn format(&self, path: &str) -> String {
        (self.0)(path)
    }
}

impl PartialEq for MessageFormatter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MessageFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MessageFormatter")
    }
}

/// Static definition of a plugin with typed config `C`
pub struct PluginDescriptor<C: Sync> {
    name: String,
    path: PathBuf,
    file_source: Arc<dyn FileSource<C>>,
    extractor: Arc<dyn Extractor<C>>,
    verify_steps: Vec<VerifyStep<C>>,
    result_names: BTreeSet<String>,
    success_message: Option<MessageFormatter>,
    failure_message: Option<MessageFormatter>,
    config: C,
}

impl<C: Send + Sync + 'static> PluginDescriptor<C> {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        file_source: impl FileSource<C> + 'static,
        extractor: impl Extractor<C> + 'static,
        config: C,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            file_source: Arc::new(file_source),
            extractor: Arc::new(extractor),
            verify_steps: Vec::new(),
            result_names: BTreeSet::new(),
            success_message: None,
            failure_message: None,
            config,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_file_source(mut self, file_source: impl FileSource<C> + 'static) -> Self {
        self.file_source = Arc::new(file_source);
        self
    }

    pub fn with_result_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.result_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_verify_step(mut self, step: VerifyStep<C>) -> Self {
        self.verify_steps.push(step);
        self
    }

    /// Overrides the "verified successfully" line for this plugin's files
    pub fn with_success_message<F>(mut self, format: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.success_message = Some(MessageFormatter::new(format));
        self
    }

    /// Overrides the header printed above a file's error list
    pub fn with_failure_message<F>(mut self, format: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.failure_message = Some(MessageFormatter::new(format));
        self
    }

    pub fn with_config(mut self, config: C) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn verify_steps(&self) -> &[VerifyStep<C>] {
        &self.verify_steps
    }
}

/// Object-safe view of a plugin used by the runner and orchestrator
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn path(&self) -> &Path;

    fn result_names(&self) -> &BTreeSet<String>;

    /// Dependencies of each verify step, indexed like the steps themselves
    fn step_dependencies(&self) -> Vec<&[Dependency]>;

    /// Runs verify step `index` with already-resolved arguments
    fn evaluate_step(&self, index: usize, args: &[Vec<String>]) -> Vec<String>;

    /// Custom report line for a verified file; `None` uses the default
    fn success_message(&self) -> Option<MessageFormatter> {
        None
    }

    /// Custom header for a failed file; `None` uses the default
    fn failure_message(&self) -> Option<MessageFormatter> {
        None
    }

    async fn get_files(&self) -> Result<Vec<TargetFile>, FileSourceError>;

    async fn extract(&self, target: TargetFile) -> Result<ExtractResult, ExtractError>;
}

#[async_trait]
impl<C: Send + Sync + 'static> Plugin for PluginDescriptor<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn result_names(&self) -> &BTreeSet<String> {
        &self.result_names
    }

    fn step_dependencies(&self) -> Vec<&[Dependency]> {
        self.verify_steps
            .iter()
            .map(|step| step.dependencies.as_slice())
            .collect()
    }

    fn evaluate_step(&self, index: usize, args: &[Vec<String>]) -> Vec<String> {
        self.verify_steps
            .get(index)
            .map(|step| step.evaluate(&self.config, args))
            .unwrap_or_default()
    }

    fn success_message(&self) -> Option<MessageFormatter> {
        self.success_message.clone()
    }

    fn failure_message(&self) -> Option<MessageFormatter> {
        self.failure_message.clone()
    }

    async fn get_files(&self) -> Result<Vec<TargetFile>, FileSourceError> {
        self.file_source.get_files(&self.path, &self.config).await
    }

    async fn extract(&self, target: TargetFile) -> Result<ExtractResult, ExtractError> {
        let TargetFile { path, file } = target;
        let extracted_vars: ResultSet = self.extractor.extract(file, &self.config).await?;
        Ok(ExtractResult::new(path, extracted_vars))
    }
}
