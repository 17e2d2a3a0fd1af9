use super::plugin::Plugin;
use super::runner::{PluginRunner, RequirementError};
use super::types::{PluginRunResult, RunStatus};
use crate::progress::{ProgressEvent, ProgressHandler};
use anyhow::{bail, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Requirement errors reported for one plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementFailure {
    pub plugin: String,
    pub errors: Vec<RequirementError>,
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub results: Vec<PluginRunResult>,
    pub requirement_failures: Vec<RequirementFailure>,
}

impl RunOutcome {
    pub fn requirements_failed(&self) -> bool {
        !self.requirement_failures.is_empty()
    }

    pub fn found_errors(&self) -> bool {
        self.results.iter().any(|r| r.found_errors)
    }
}

/// State threaded through a run; only the orchestrator mutates it
#[derive(Debug, Default)]
struct RunState {
    previous_results: Vec<PluginRunResult>,
    requirement_failures: Vec<RequirementFailure>,
}

impl RunState {
    fn requirements_failed(&self) -> bool {
        !self.requirement_failures.is_empty()
    }

    fn status(&self) -> RunStatus {
        if self.requirements_failed() {
            RunStatus::RequirementFailures
        } else if self.previous_results.iter().any(|r| r.found_errors) {
            RunStatus::VerificationErrors
        } else {
            RunStatus::Success
        }
    }
}

/// Runs plugins in declaration order, feeding each one the results of those before it
pub struct Orchestrator {
    handler: Arc<dyn ProgressHandler>,
}

impl Orchestrator {
    pub fn new(handler: Arc<dyn ProgressHandler>) -> Self {
        Self { handler }
    }

    pub async fn run(&self, plugins: &[Arc<dyn Plugin>]) -> Result<RunOutcome> {
        let start = Instant::now();
        ensure_unique_names(plugins)?;
        info!(plugins = plugins.len(), "Starting verification");

        let handler = self.handler.as_ref();
        let mut state = RunState::default();

        for (index, plugin) in plugins.iter().enumerate() {
            let result = {
                let runner = PluginRunner::new(plugin.as_ref(), &state.previous_results, handler);
                let errors = runner.verify_requirements(&plugins[..index]);

                if !errors.is_empty() {
                    handler.on_progress(&ProgressEvent::RequirementsFailed {
                        plugin: plugin.name().to_string(),
                        errors: errors.clone(),
                    });
                    state.requirement_failures.push(RequirementFailure {
                        plugin: plugin.name().to_string(),
                        errors,
                    });
                    continue;
                }

                if state.requirements_failed() {
                    debug!(plugin = plugin.name(), "Skipping plugin after earlier requirement failure");
                    handler.on_progress(&ProgressEvent::PluginSkipped {
                        plugin: plugin.name().to_string(),
                    });
                    continue;
                }

                runner.run_plugin_routine().await?
            };

            state.previous_results.push(result);
        }

        let status = state.status();
        info!(
            status = %status,
            elapsed = ?start.elapsed(),
            "Verification finished"
        );
        handler.on_progress(&ProgressEvent::Completed { status });

        Ok(RunOutcome {
            status,
            results: state.previous_results,
            requirement_failures: state.requirement_failures,
        })
    }
}

/// Results are looked up by plugin name, so a name may only run once
fn ensure_unique_names(plugins: &[Arc<dyn Plugin>]) -> Result<()> {
    let mut seen = HashSet::new();
    for plugin in plugins {
        if !seen.insert(plugin.name()) {
            bail!("Plugin {} is declared more than once", plugin.name());
        }
    }
    Ok(())
}
