use super::{custom_env_vars, dot_env, kustomize, terraform};
use crate::config::{ConfigError, PluginOverrides, PluginRef, VervarConfig};
use crate::fs::DirectoryWalk;
use crate::pipeline::{Plugin, PluginDescriptor};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Builds a plugin rooted at a directory, applying optional overrides
pub type PluginFactory =
    fn(&Path, Option<&PluginOverrides>) -> Result<Arc<dyn Plugin>, ConfigError>;

/// Static mapping from plugin names to their factories
pub struct PluginRegistry {
    factories: Vec<(&'static str, PluginFactory)>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Registry with every built-in plugin, in dependency order
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(custom_env_vars::NAME, custom_env_vars::create);
        registry.register(terraform::NAME, terraform::create);
        registry.register(kustomize::NAME, kustomize::create);
        registry.register(dot_env::NAME, dot_env::create);
        registry
    }

    /// Adds a plugin, replacing any factory already registered under `name`
    pub fn register(&mut self, name: &'static str, factory: PluginFactory) {
        match self.factories.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = factory,
            None => self.factories.push((name, factory)),
        }
    }

    pub fn get(&self, name: &str) -> Option<PluginFactory> {
        self.factories
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, factory)| *factory)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|(name, _)| *name).collect()
    }

    pub fn create(&self, plugin: &PluginRef, root: &Path) -> Result<Arc<dyn Plugin>, ConfigError> {
        let factory = self
            .get(plugin.plugin())
            .ok_or_else(|| ConfigError::UnknownPlugin {
                name: plugin.plugin().to_string(),
                available: self.names().join(", "),
            })?;
        factory(root, plugin.overrides())
    }

    /// Instantiates every configured plugin, in config order
    pub fn create_all(&self, config: &VervarConfig, root: &Path) -> Result<Vec<Arc<dyn Plugin>>, ConfigError> {
        let mut seen = HashSet::new();
        let mut plugins = Vec::with_capacity(config.plugins.len());

        for plugin_ref in &config.plugins {
            let plugin = self.create(plugin_ref, root)?;
            if !seen.insert(plugin.name().to_string()) {
                return Err(ConfigError::DuplicatePlugin(plugin.name().to_string()));
            }
            debug!(plugin = plugin.name(), path = %plugin.path().display(), "Configured plugin");
            plugins.push(plugin);
        }

        Ok(plugins)
    }

    /// Every registered plugin with its default definition
    pub fn defaults(&self, root: &Path) -> Result<Vec<Arc<dyn Plugin>>, ConfigError> {
        self.factories
            .iter()
            .map(|(_, factory)| factory(root, None))
            .collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Applies config-file overrides to a built-in descriptor.
///
/// `options` is merged key by key into the plugin's serialized config before
/// it is parsed back, so unspecified options keep their defaults.
pub fn apply_overrides<C>(
    descriptor: PluginDescriptor<C>,
    root: &Path,
    overrides: Option<&PluginOverrides>,
) -> Result<PluginDescriptor<C>, ConfigError>
where
    C: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let Some(overrides) = overrides else {
        return Ok(descriptor);
    };
    let plugin = descriptor.name().to_string();
    let mut descriptor = descriptor;

    if let Some(options) = &overrides.options {
        let invalid = |source| ConfigError::InvalidOptions {
            plugin: plugin.clone(),
            source,
        };
        let mut merged = serde_json::to_value(descriptor.config()).map_err(invalid)?;
        merge_options(&mut merged, options.clone());
        let config: C = serde_json::from_value(merged).map_err(invalid)?;
        descriptor = descriptor.with_config(config);
    }

    if let Some(pattern) = &overrides.pattern {
        let walk = DirectoryWalk::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            plugin: plugin.clone(),
            pattern: pattern.clone(),
            source,
        })?;
        descriptor = descriptor.with_file_source(walk);
    }

    if let Some(path) = &overrides.path {
        descriptor = descriptor.with_path(root.join(path));
    }

    if let Some(name) = &overrides.name {
        descriptor = descriptor.with_name(name.clone());
    }

    Ok(descriptor)
}

fn merge_options(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                base.insert(key, value);
            }
        }
        (base, patch) => *base = patch,
    }
}
