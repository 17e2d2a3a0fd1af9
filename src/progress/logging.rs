//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::PluginStarted { plugin, path } => {
                info!(plugin = %plugin, path = %path.display(), "Running plugin");
            }
            ProgressEvent::FileVerified { plugin, path, .. } => {
                debug!(plugin = %plugin, path = %path.display(), "File verified");
            }
            ProgressEvent::FileFailed {
                plugin,
                path,
                errors,
                ..
            } => {
                warn!(
                    plugin = %plugin,
                    path = %path.display(),
                    errors = errors.len(),
                    "File has verification errors"
                );
                for error in errors {
                    debug!(plugin = %plugin, "{}", error);
                }
            }
            ProgressEvent::RequirementsFailed { plugin, errors } => {
                for error in errors {
                    warn!(plugin = %plugin, "{}", error);
                }
            }
            ProgressEvent::PluginSkipped { plugin } => {
                info!(plugin = %plugin, "Skipping plugin after requirement failure");
            }
            ProgressEvent::PluginUnresolved {
                requested_by,
                plugin,
            } => {
                warn!(plugin = %requested_by, "Could not find plugin {}", plugin);
            }
            ProgressEvent::FieldUnresolved {
                requested_by,
                plugin,
                field,
            } => {
                warn!(
                    plugin = %requested_by,
                    "Could not find variable {} in {}", field, plugin
                );
            }
            ProgressEvent::PluginCompleted {
                plugin,
                files,
                found_errors,
            } => {
                info!(plugin = %plugin, files, found_errors, "Plugin complete");
            }
            ProgressEvent::Completed { status } => {
                info!(status = %status, "Verification complete");
            }
        }
    }
}
