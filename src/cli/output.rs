//! Output formatting for machine-readable and human-readable results
//!
//! The streaming verification report is printed by the console progress
//! handler. This module formats the finished [`RunOutcome`] and the plugin
//! catalogue as JSON, YAML or plain text.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

use crate::output::trim_path;
use crate::pipeline::{Plugin, RunOutcome};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Description of a plugin for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginSummary {
    pub name: String,
    pub path: String,
    pub result_names: Vec<String>,
    pub requires: Vec<String>,
}

impl PluginSummary {
    pub fn from_plugin(plugin: &dyn Plugin, root: &Path) -> Self {
        let mut requires: Vec<String> = Vec::new();
        for dependency in plugin.step_dependencies().into_iter().flatten() {
            let dependency = dependency.to_string();
            if !requires.contains(&dependency) {
                requires.push(dependency);
            }
        }

        Self {
            name: plugin.name().to_string(),
            path: trim_path(plugin.path(), root),
            result_names: plugin.result_names().iter().cloned().collect(),
            requires,
        }
    }
}

/// Output formatter for run outcomes and plugin listings
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Serialized outcome; empty for the human format, whose report is
    /// streamed by the console handler while the run progresses
    pub fn format_outcome(&self, outcome: &RunOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(outcome)
                .context("Failed to serialize verification outcome to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(outcome)
                .context("Failed to serialize verification outcome to YAML"),
            OutputFormat::Human => Ok(String::new()),
        }
    }

    pub fn format_plugins(&self, plugins: &[PluginSummary]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(plugins)
                .context("Failed to serialize plugin list to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(plugins).context("Failed to serialize plugin list to YAML")
            }
            OutputFormat::Human => Ok(self.format_plugins_human(plugins)),
        }
    }

    fn format_plugins_human(&self, plugins: &[PluginSummary]) -> String {
        let mut output = String::new();
        for (index, plugin) in plugins.iter().enumerate() {
            if index > 0 {
                output.push('\n');
            }
            let requires = if plugin.requires.is_empty() {
                "(none)".to_string()
            } else {
                plugin.requires.join(", ")
            };
            let _ = writeln!(output, "{}", plugin.name);
            let _ = writeln!(output, "  path:     {}", plugin.path);
            let _ = writeln!(output, "  results:  {}", plugin.result_names.join(", "));
            let _ = writeln!(output, "  requires: {}", requires);
        }
        output
    }
}
