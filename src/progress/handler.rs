//! Progress handler trait and events

use crate::pipeline::{MessageFormatter, RequirementError, RunStatus};
use std::path::PathBuf;

/// Events emitted while a verification run progresses
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A plugin passed its requirement check and is about to scan files
    PluginStarted { plugin: String, path: PathBuf },

    /// Every verify step passed for a file
    FileVerified {
        plugin: String,
        path: PathBuf,
        message: Option<MessageFormatter>,
    },

    /// At least one verify step reported errors for a file
    FileFailed {
        plugin: String,
        path: PathBuf,
        errors: Vec<String>,
        message: Option<MessageFormatter>,
    },

    /// A plugin declared dependencies that cannot be satisfied
    RequirementsFailed {
        plugin: String,
        errors: Vec<RequirementError>,
    },

    /// A plugin was not run because an earlier plugin failed its requirements
    PluginSkipped { plugin: String },

    /// A verify step referenced a plugin with no results in this run
    PluginUnresolved { requested_by: String, plugin: String },

    /// A verify step referenced a field no file of the plugin produced
    FieldUnresolved {
        requested_by: String,
        plugin: String,
        field: String,
    },

    /// A plugin finished scanning all of its files
    PluginCompleted {
        plugin: String,
        files: usize,
        found_errors: bool,
    },

    /// The run finished
    Completed { status: RunStatus },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        let handler = NoOpHandler;
        handler.on_progress(&ProgressEvent::PluginSkipped {
            plugin: "dotEnv".to_string(),
        });
    }

    #[test]
    fn test_counting_handler_as_trait_object() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler: Box<dyn ProgressHandler> = Box::new(CountingHandler {
            count: count.clone(),
        });

        handler.on_progress(&ProgressEvent::PluginStarted {
            plugin: "dotEnv".to_string(),
            path: PathBuf::from("_infra"),
        });
        handler.on_progress(&ProgressEvent::Completed {
            status: RunStatus::Success,
        });

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
