//! Plugin execution engine
//!
//! The [`Orchestrator`] runs plugins strictly in declaration order. For each
//! plugin a [`PluginRunner`] first checks that every verify-step dependency
//! points at a field the plugin itself declares or at a plugin declared
//! earlier. Once a plugin fails that check, later plugins are still checked but
//! no longer run. Plugins that run collect their files, extract them
//! concurrently and evaluate every verify step per file.

mod orchestrator;
mod plugin;
mod runner;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use orchestrator::{Orchestrator, RequirementFailure, RunOutcome};
pub use plugin::{
    Dependency, DependencySource, MessageFormatter, Plugin, PluginDescriptor, VerifyStep,
};
pub use runner::{PluginRunner, RequirementError};
pub use types::{ExtractResult, FileFailure, PluginRunResult, ResultSet, RunStatus};
