//! Test doubles shared by the pipeline tests

use super::plugin::{Dependency, PluginDescriptor, VerifyStep};
use super::types::{ExtractResult, PluginRunResult, ResultSet};
use crate::extractors::{ExtractError, Extractor};
use crate::fs::{FileSource, FileSourceError, TargetFile};
use crate::progress::{ProgressEvent, ProgressHandler};
use async_trait::async_trait;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::fs::File;

/// Empty files created in a temporary directory, in the given order
pub struct FixtureFiles {
    dir: TempDir,
    paths: Vec<PathBuf>,
}

impl FixtureFiles {
    pub fn new(names: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let paths = names
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                fs::write(&path, "").unwrap();
                path
            })
            .collect();
        Self { dir, paths }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.clone()
    }
}

/// Returns a fixed list of files regardless of the plugin path
pub struct FixtureSource {
    paths: Vec<PathBuf>,
}

#[async_trait]
impl<C: Sync> FileSource<C> for FixtureSource {
    async fn get_files(&self, _path: &Path, _config: &C) -> Result<Vec<TargetFile>, FileSourceError> {
        let mut files = Vec::new();
        for path in &self.paths {
            files.push(TargetFile::open(path.clone()).await?);
        }
        Ok(files)
    }
}

/// Returns the same result set for every file and counts invocations
pub struct StaticExtractor {
    vars: ResultSet,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl StaticExtractor {
    pub fn new(fields: &[(&str, &[&str])]) -> Self {
        Self {
            vars: result_set(fields),
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(&[])
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl<C: Sync> Extractor<C> for StaticExtractor {
    async fn extract(&self, _file: File, _config: &C) -> Result<ResultSet, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ExtractError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "unreadable",
            )));
        }
        Ok(self.vars.clone())
    }
}

/// Counts how often the steps it builds are evaluated
#[derive(Debug, Default, Clone)]
pub struct StepCounter {
    count: Arc<AtomicUsize>,
}

impl StepCounter {
    pub fn step(&self, dependencies: Vec<Dependency>, errors: &[&str]) -> VerifyStep<()> {
        let count = Arc::clone(&self.count);
        let errors: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        VerifyStep::new(dependencies, move |_, _| {
            count.fetch_add(1, Ordering::SeqCst);
            errors.clone()
        })
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// Records every event it receives
#[derive(Debug, Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingHandler {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressHandler for RecordingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub fn result_set(fields: &[(&str, &[&str])]) -> ResultSet {
    fields
        .iter()
        .map(|(field, values)| {
            (
                field.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

pub fn plugin_with_files<E>(name: &str, files: &FixtureFiles, extractor: E) -> PluginDescriptor<()>
where
    E: Extractor<()> + 'static,
{
    PluginDescriptor::new(
        name,
        files.root(),
        FixtureSource {
            paths: files.paths(),
        },
        extractor,
        (),
    )
}

pub fn previous_result(name: &str, files: &[(&str, &[(&str, &[&str])])]) -> PluginRunResult {
    PluginRunResult {
        name: name.to_string(),
        path: PathBuf::from(name),
        results: files
            .iter()
            .map(|(path, fields)| ExtractResult::new(*path, result_set(fields)))
            .collect(),
        found_errors: false,
        failures: Vec::new(),
    }
}
