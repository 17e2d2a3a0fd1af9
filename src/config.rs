//! Run configuration
//!
//! A run is described by a JSON file, `vervar.config.json` by default, holding
//! the ordered list of plugins to execute:
//!
//! ```json
//! {
//!   "plugins": [
//!     "configCustomEnvVars",
//!     "terraform",
//!     { "plugin": "dotEnv", "overrides": { "path": "deploy", "pattern": "\\.env\\.example$" } }
//!   ]
//! }
//! ```
//!
//! Each entry is either the name of a registered plugin or an object naming
//! the plugin plus [`PluginOverrides`]. Entries are validated when the file is
//! loaded, so a malformed entry is reported with its index before anything
//! runs.
//!
//! # Environment Variables
//!
//! - `VERVAR_CONFIG`: config file used when `--config` is not given

use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the root directory
pub const DEFAULT_CONFIG_FILE: &str = "vervar.config.json";

/// Environment variable naming an alternative config file
pub const CONFIG_ENV_VAR: &str = "VERVAR_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid plugin entry at index {index}: {reason}")]
    InvalidPluginEntry { index: usize, reason: String },

    #[error("No plugins configured")]
    NoPlugins,

    #[error("Unknown plugin '{name}'. Available plugins: {available}")]
    UnknownPlugin { name: String, available: String },

    #[error("Plugin '{0}' is configured more than once")]
    DuplicatePlugin(String),

    #[error("Invalid file pattern '{pattern}' for plugin {plugin}: {source}")]
    InvalidPattern {
        plugin: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid options for plugin {plugin}: {source}")]
    InvalidOptions {
        plugin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Partial replacement of a plugin's definition
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PluginOverrides {
    /// Name the plugin is registered under for this run
    pub name: Option<String>,

    /// Target path; relative paths are resolved against the root
    pub path: Option<PathBuf>,

    /// Switches the plugin to a recursive walk keeping paths matching this regex
    pub pattern: Option<String>,

    /// Merged key by key into the plugin's own options
    pub options: Option<Value>,
}

/// One entry of the `plugins` list
#[derive(Debug, Clone, PartialEq)]
pub enum PluginRef {
    Direct(String),
    WithOverrides {
        plugin: String,
        overrides: PluginOverrides,
    },
}

impl PluginRef {
    pub fn plugin(&self) -> &str {
        match self {
            PluginRef::Direct(name) => name,
            PluginRef::WithOverrides { plugin, .. } => plugin,
        }
    }

    pub fn overrides(&self) -> Option<&PluginOverrides> {
        match self {
            PluginRef::Direct(_) => None,
            PluginRef::WithOverrides { overrides, .. } => Some(overrides),
        }
    }

    fn from_value(index: usize, value: Value) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidPluginEntry { index, reason };

        match value {
            Value::String(name) if name.trim().is_empty() => {
                Err(invalid("plugin name is empty".to_string()))
            }
            Value::String(name) => Ok(PluginRef::Direct(name)),
            Value::Object(mut map) => {
                let plugin = match map.remove("plugin") {
                    Some(Value::String(name)) if !name.trim().is_empty() => name,
                    Some(_) => return Err(invalid("`plugin` must be a non-empty string".to_string())),
                    None => return Err(invalid("missing `plugin` field".to_string())),
                };
                let overrides = match map.remove("overrides") {
                    Some(value) => serde_json::from_value(value)
                        .map_err(|e| invalid(format!("invalid overrides: {}", e)))?,
                    None => PluginOverrides::default(),
                };
                if let Some(key) = map.keys().next() {
                    return Err(invalid(format!("unexpected field `{}`", key)));
                }
                Ok(PluginRef::WithOverrides { plugin, overrides })
            }
            other => Err(invalid(format!(
                "expected a plugin name or an object, found {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    plugins: Vec<Value>,
}

/// Parsed contents of a config file
#[derive(Debug, Clone, PartialEq)]
pub struct VervarConfig {
    pub plugins: Vec<PluginRef>,
}

impl VervarConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(&content, path)
    }

    /// Parses config text; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if raw.plugins.is_empty() {
            return Err(ConfigError::NoPlugins);
        }

        let plugins = raw
            .plugins
            .into_iter()
            .enumerate()
            .map(|(index, value)| PluginRef::from_value(index, value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { plugins })
    }
}

/// Picks the config file: explicit path, then `VERVAR_CONFIG`, then the default in `root`
pub fn resolve_config_path(explicit: Option<&Path>, root: &Path) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => root.join(DEFAULT_CONFIG_FILE),
    }
}
