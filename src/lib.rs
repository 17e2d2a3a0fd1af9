//! vervar - plugin-driven consistency checker for configuration variables
//!
//! A repository usually declares the same variable names in several places:
//! `.env` files, kustomization generators, terraform variables and the
//! `custom-environment-variables.json` mapping of the application config.
//! vervar runs an ordered list of plugins over such a repository. Each plugin
//! collects files, extracts named value lists from them and runs verify steps
//! that compare those lists against its own results and against the results
//! of plugins that ran earlier.
//!
//! # Core Concepts
//!
//! - **Plugin**: A named unit that knows where its files live, how to extract
//!   result fields from each file and which verify steps to run
//! - **Dependency**: A reference to a result field, either on the current
//!   plugin (`this.field`) or on an earlier one (`plugin.field`)
//! - **Requirement check**: Before a plugin runs, every cross-plugin
//!   dependency must name an earlier plugin that declares the field
//! - **Progress events**: The orchestrator reports everything it does through
//!   a [`ProgressHandler`], which renders the console report or logs
//!
//! # Example Usage
//!
//! ```ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use vervar::{NoOpHandler, Orchestrator, PluginRegistry};
//!
//! async fn check(root: &Path) -> anyhow::Result<()> {
//!     let plugins = PluginRegistry::with_defaults().defaults(root)?;
//!     let outcome = Orchestrator::new(Arc::new(NoOpHandler)).run(&plugins).await?;
//!     println!("{}", outcome.status);
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`pipeline`]: Plugin model, per-plugin runner and orchestrator
//! - [`plugins`]: Built-in plugins and the registry that builds them from config
//! - [`fs`]: File sources (single file, regex directory walk)
//! - [`extractors`]: Line-pattern and JSON value extraction
//! - [`progress`]: Progress events and their handlers
//! - [`output`]: Colors and report messages
//! - [`config`]: `vervar.config.json` loading

pub mod cli;
pub mod config;
pub mod extractors;
pub mod fs;
pub mod output;
pub mod pipeline;
pub mod plugins;
pub mod progress;
pub mod util;

pub use config::{ConfigError, PluginOverrides, PluginRef, VervarConfig};
pub use pipeline::{
    Dependency, Orchestrator, Plugin, PluginDescriptor, PluginRunResult, RunOutcome, RunStatus,
    VerifyStep,
};
pub use plugins::PluginRegistry;
pub use progress::{NoOpHandler, ProgressEvent, ProgressHandler};
pub use util::{init_logging, LogFormat, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_vervar() {
        assert_eq!(NAME, "vervar");
    }
}
