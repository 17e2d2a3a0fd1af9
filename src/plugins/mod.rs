// Built-in plugins.
// Each module exposes its name, result field names, a default descriptor and a
// factory that applies config-file overrides.

pub mod checks;
pub mod custom_env_vars;
pub mod dot_env;
pub mod kustomize;
pub mod registry;
pub mod terraform;

pub use registry::{apply_overrides, PluginFactory, PluginRegistry};
