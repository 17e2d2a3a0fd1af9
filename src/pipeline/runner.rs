use super::plugin::{Dependency, DependencySource, Plugin};
use super::types::{ExtractResult, FileFailure, PluginRunResult};
use crate::progress::{ProgressEvent, ProgressHandler};
use anyhow::{Context, Result};
use futures_util::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// A verify-step dependency that cannot be satisfied by the plugins declared so far
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequirementError {
    #[error("Requirement {plugin}.{field} not found")]
    MissingRequirement { plugin: String, field: String },

    #[error("Value {field} is not a valid result name on plugin {plugin}")]
    MissingResultField { plugin: String, field: String },
}

/// Executes a single plugin against the results of the plugins that ran before it
pub struct PluginRunner<'a> {
    plugin: &'a dyn Plugin,
    previous_results: &'a [PluginRunResult],
    handler: &'a dyn ProgressHandler,
}

impl<'a> PluginRunner<'a> {
    pub fn new(
        plugin: &'a dyn Plugin,
        previous_results: &'a [PluginRunResult],
        handler: &'a dyn ProgressHandler,
    ) -> Self {
        Self {
            plugin,
            previous_results,
            handler,
        }
    }

    /// Checks every verify-step dependency against this plugin's own result
    /// names and the plugins declared before it. Never fails; problems are
    /// returned as data.
    pub fn verify_requirements(&self, prior_plugins: &[Arc<dyn Plugin>]) -> Vec<RequirementError> {
        let mut errors = Vec::new();

        for dependency in self.plugin.step_dependencies().into_iter().flatten() {
            match &dependency.source {
                DependencySource::Current => {
                    if !self.plugin.result_names().contains(&dependency.field) {
                        errors.push(RequirementError::MissingResultField {
                            plugin: self.plugin.name().to_string(),
                            field: dependency.field.clone(),
                        });
                    }
                }
                DependencySource::Plugin(name) => {
                    match prior_plugins.iter().find(|p| p.name() == name) {
                        None => errors.push(RequirementError::MissingRequirement {
                            plugin: name.clone(),
                            field: dependency.field.clone(),
                        }),
                        Some(prior) if !prior.result_names().contains(&dependency.field) => {
                            errors.push(RequirementError::MissingResultField {
                                plugin: name.clone(),
                                field: dependency.field.clone(),
                            })
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        errors
    }

    /// Collects files, extracts them concurrently and runs every verify step per file.
    ///
    /// File source and extractor failures abort the routine.
    pub async fn run_plugin_routine(&self) -> Result<PluginRunResult> {
        let name = self.plugin.name();
        let path = self.plugin.path();

        info!(plugin = name, path = %path.display(), "Running plugin");
        self.handler.on_progress(&ProgressEvent::PluginStarted {
            plugin: name.to_string(),
            path: path.to_path_buf(),
        });

        let files = self
            .plugin
            .get_files()
            .await
            .with_context(|| format!("Plugin {} could not collect files", name))?;
        debug!(plugin = name, files = files.len(), "Collected files");

        let extractions = files.into_iter().map(|target| {
            let file_path = target.path.clone();
            async move {
                self.plugin.extract(target).await.with_context(|| {
                    format!(
                        "Plugin {} failed to extract {}",
                        name,
                        file_path.display()
                    )
                })
            }
        });
        let results = try_join_all(extractions).await?;

        let step_dependencies = self.plugin.step_dependencies();
        let mut failures = Vec::new();

        for result in &results {
            let errors: Vec<String> = step_dependencies
                .iter()
                .enumerate()
                .flat_map(|(index, dependencies)| {
                    self.run_verify_step(result, index, dependencies)
                })
                .collect();

            if errors.is_empty() {
                self.handler.on_progress(&ProgressEvent::FileVerified {
                    plugin: name.to_string(),
                    path: result.path.clone(),
                    message: self.plugin.success_message(),
                });
            } else {
                self.handler.on_progress(&ProgressEvent::FileFailed {
                    plugin: name.to_string(),
                    path: result.path.clone(),
                    errors: errors.clone(),
                    message: self.plugin.failure_message(),
                });
                failures.push(FileFailure {
                    path: result.path.clone(),
                    errors,
                });
            }
        }

        let found_errors = !failures.is_empty();
        self.handler.on_progress(&ProgressEvent::PluginCompleted {
            plugin: name.to_string(),
            files: results.len(),
            found_errors,
        });

        Ok(PluginRunResult {
            name: name.to_string(),
            path: path.to_path_buf(),
            results,
            found_errors,
            failures,
        })
    }

    /// Resolves the step's dependencies for `result` and evaluates it
    pub fn run_verify_step(
        &self,
        result: &ExtractResult,
        index: usize,
        dependencies: &[Dependency],
    ) -> Vec<String> {
        let args: Vec<Vec<String>> = dependencies
            .iter()
            .map(|dependency| self.resolve(dependency, result))
            .collect();
        self.plugin.evaluate_step(index, &args)
    }

    fn resolve(&self, dependency: &Dependency, current: &ExtractResult) -> Vec<String> {
        let requested_by = self.plugin.name();

        let (plugin, values) = match &dependency.source {
            DependencySource::Current => (
                requested_by,
                current.field(&dependency.field).map(<[String]>::to_vec),
            ),
            DependencySource::Plugin(name) => {
                match self.previous_results.iter().find(|r| &r.name == name) {
                    Some(previous) => (name.as_str(), previous.field_values(&dependency.field)),
                    None => {
                        warn!(plugin = requested_by, "Could not find plugin {}", name);
                        self.handler.on_progress(&ProgressEvent::PluginUnresolved {
                            requested_by: requested_by.to_string(),
                            plugin: name.clone(),
                        });
                        return Vec::new();
                    }
                }
            }
        };

        values.unwrap_or_else(|| {
            warn!(
                plugin = requested_by,
                "Could not find variable {} in {}", dependency.field, plugin
            );
            self.handler.on_progress(&ProgressEvent::FieldUnresolved {
                requested_by: requested_by.to_string(),
                plugin: plugin.to_string(),
                field: dependency.field.clone(),
            });
            Vec::new()
        })
    }
}
