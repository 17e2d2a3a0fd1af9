//! Report lines printed during a verification run
//!
//! Every builder takes a [`Palette`]; with a plain palette the text carries no
//! escape codes and matches the `Display` output of the underlying errors.

use crate::pipeline::{RequirementError, RunStatus};
use std::env;
use std::fmt::Display;
use std::path::Path;

/// Semantic colors used in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Default,
    Error,
    Success,
    File,
    Variable,
    Plugin,
    Info,
}

impl Color {
    pub fn code(self) -> &'static str {
        match self {
            Color::Default => "\x1b[0m",
            Color::Error => "\x1b[31m",
            Color::Success => "\x1b[32m",
            Color::File => "\x1b[34m",
            Color::Variable => "\x1b[36m",
            Color::Plugin => "\x1b[35m",
            Color::Info => "\x1b[33m",
        }
    }
}

/// Decides whether report text is colorized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn colored() -> Self {
        Self { enabled: true }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    /// Colors are used only when stdout is a terminal, `NO_COLOR` is unset and
    /// the caller did not opt out.
    pub fn detect(disabled: bool) -> Self {
        if disabled || env::var_os("NO_COLOR").is_some() || !atty::is(atty::Stream::Stdout) {
            Self::plain()
        } else {
            Self::colored()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn paint(&self, color: Color, text: impl Display) -> String {
        if self.enabled {
            format!("{}{}{}", color.code(), text, Color::Default.code())
        } else {
            text.to_string()
        }
    }
}

/// Shows `path` relative to `base` when it lies underneath it
pub fn trim_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

pub fn success_message(palette: Palette, path: &str) -> String {
    format!(
        "{} verified {}",
        palette.paint(Color::File, path),
        palette.paint(Color::Success, "successfully")
    )
}

pub fn failure_message(palette: Palette, path: &str) -> String {
    format!(
        "Found the following {} in {}",
        palette.paint(Color::Error, "errors"),
        palette.paint(Color::File, path)
    )
}

/// Renders errors as a bullet list, indenting continuation lines
pub fn format_errors<S: AsRef<str>>(errors: &[S]) -> String {
    errors
        .iter()
        .map(|error| format!("- {}\n", error.as_ref().replace('\n', "\n\t")))
        .collect()
}

pub fn missing_requirement(palette: Palette, plugin: &str, field: &str) -> String {
    format!(
        "Requirement {} {}",
        palette.paint(Color::Variable, format!("{}.{}", plugin, field)),
        palette.paint(Color::Error, "not found")
    )
}

pub fn missing_result_field(palette: Palette, plugin: &str, field: &str) -> String {
    format!(
        "Value {} is {} on plugin {}",
        palette.paint(Color::Variable, field),
        palette.paint(Color::Error, "not a valid result name"),
        palette.paint(Color::Plugin, plugin)
    )
}

pub fn requirement_error(palette: Palette, error: &RequirementError) -> String {
    match error {
        RequirementError::MissingRequirement { plugin, field } => {
            missing_requirement(palette, plugin, field)
        }
        RequirementError::MissingResultField { plugin, field } => {
            missing_result_field(palette, plugin, field)
        }
    }
}

pub fn failed_requirements(palette: Palette, plugin: &str, errors: &[RequirementError]) -> String {
    let rendered: Vec<String> = errors
        .iter()
        .map(|error| requirement_error(palette, error))
        .collect();
    format!(
        "Found the following plugin requirement {} in {}\n{}",
        palette.paint(Color::Error, "errors"),
        palette.paint(Color::Plugin, plugin),
        format_errors(&rendered)
    )
}

pub fn unresolved_plugin(palette: Palette, plugin: &str) -> String {
    format!("Could not find plugin {}", palette.paint(Color::Plugin, plugin))
}

pub fn unresolved_field(palette: Palette, plugin: &str, field: &str) -> String {
    format!(
        "Could not find variable {} in {}",
        palette.paint(Color::Variable, field),
        palette.paint(Color::Plugin, plugin)
    )
}

pub fn summary(palette: Palette, status: RunStatus) -> String {
    match status {
        RunStatus::RequirementFailures => palette.paint(
            Color::Error,
            "Could not complete verification due to plugin requirement failures",
        ),
        RunStatus::VerificationErrors => {
            palette.paint(Color::Info, "Verification finished with errors")
        }
        RunStatus::Success => palette.paint(Color::Success, "Verification successful"),
    }
}
