//! Console reporter printing the verification report to stdout

use super::{ProgressEvent, ProgressHandler};
use crate::output::messages;
use crate::output::{trim_path, Palette};
use std::path::PathBuf;

/// Renders events as report lines, with paths relative to `base`
#[derive(Debug, Clone)]
pub struct ConsoleHandler {
    palette: Palette,
    base: PathBuf,
}

impl ConsoleHandler {
    pub fn new(palette: Palette, base: impl Into<PathBuf>) -> Self {
        Self {
            palette,
            base: base.into(),
        }
    }

    /// Text printed for `event`, or `None` for events that are only logged
    pub fn render(&self, event: &ProgressEvent) -> Option<String> {
        let palette = self.palette;
        match event {
            ProgressEvent::FileVerified { path, message, .. } => {
                let path = trim_path(path, &self.base);
                Some(match message {
                    Some(message) => message.format(&path),
                    None => messages::success_message(palette, &path),
                })
            }
            ProgressEvent::FileFailed {
                path,
                errors,
                message,
                ..
            } => {
                let path = trim_path(path, &self.base);
                let header = match message {
                    Some(message) => message.format(&path),
                    None => messages::failure_message(palette, &path),
                };
                Some(format!("{}\n{}", header, messages::format_errors(errors)))
            }
            ProgressEvent::RequirementsFailed { plugin, errors } => {
                Some(messages::failed_requirements(palette, plugin, errors))
            }
            ProgressEvent::PluginUnresolved { plugin, .. } => {
                Some(messages::unresolved_plugin(palette, plugin))
            }
            ProgressEvent::FieldUnresolved { plugin, field, .. } => {
                Some(messages::unresolved_field(palette, plugin, field))
            }
            ProgressEvent::Completed { status } => Some(messages::summary(palette, *status)),
            ProgressEvent::PluginStarted { .. }
            | ProgressEvent::PluginSkipped { .. }
            | ProgressEvent::PluginCompleted { .. } => None,
        }
    }
}

impl ProgressHandler for ConsoleHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        if let Some(text) = self.render(event) {
            println!("{}", text);
        }
    }
}
