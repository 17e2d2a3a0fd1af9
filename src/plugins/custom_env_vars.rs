//! The canonical list of environment variables an application reads, taken
//! from `config/custom-environment-variables.json`

use super::registry::apply_overrides;
use crate::config::{ConfigError, PluginOverrides};
use crate::extractors::{self, collect_string_values, ExtractError, Extractor};
use crate::fs::SingleFile;
use crate::pipeline::{Plugin, PluginDescriptor, ResultSet};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;

pub const NAME: &str = "configCustomEnvVars";

/// Every environment variable name found in the document
pub const CUSTOM_ENV_VARS: &str = "configCustomEnvVars";

pub const DEFAULT_PATH: &str = "config/custom-environment-variables.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CustomEnvVarsConfig {
    /// Names appended to the extracted list, for variables set outside the document
    pub additional_env_vars: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CustomEnvVarsExtractor;

#[async_trait]
impl Extractor<CustomEnvVarsConfig> for CustomEnvVarsExtractor {
    async fn extract(&self, file: File, config: &CustomEnvVarsConfig) -> Result<ResultSet, ExtractError> {
        let content = extractors::read_to_string(file).await?;
        let document: serde_json::Value = serde_json::from_str(&content)?;

        let mut env_vars = collect_string_values(&document);
        env_vars.extend(config.additional_env_vars.iter().cloned());

        Ok(ResultSet::from([(CUSTOM_ENV_VARS.to_string(), env_vars)]))
    }
}

pub fn descriptor(root: &Path) -> PluginDescriptor<CustomEnvVarsConfig> {
    PluginDescriptor::new(
        NAME,
        root.join(DEFAULT_PATH),
        SingleFile,
        CustomEnvVarsExtractor,
        CustomEnvVarsConfig::default(),
    )
    .with_result_names([CUSTOM_ENV_VARS])
}

pub fn create(root: &Path, overrides: Option<&PluginOverrides>) -> Result<Arc<dyn Plugin>, ConfigError> {
    Ok(Arc::new(apply_overrides(descriptor(root), root, overrides)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PluginRunner;
    use crate::progress::NoOpHandler;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, content: &str) {
        let path = temp.path().join(DEFAULT_PATH);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn test_extracts_values_and_additional_vars() {
        let temp = TempDir::new().unwrap();
        write_config(
            &temp,
            r#"{
                "port": "PORT",
                "db": { "url": "DATABASE_URL", "pool": { "__name": "DB_POOL", "__format": "number" } }
            }"#,
        );
        let plugin = descriptor(temp.path()).with_config(CustomEnvVarsConfig {
            additional_env_vars: vec!["NODE_ENV".to_string()],
        });

        let run = PluginRunner::new(&plugin, &[], &NoOpHandler)
            .run_plugin_routine()
            .await
            .unwrap();

        assert_eq!(run.results.len(), 1);
        assert_eq!(
            run.results[0].field(CUSTOM_ENV_VARS).unwrap(),
            &["PORT", "DATABASE_URL", "DB_POOL", "NODE_ENV"]
        );
        assert!(!run.found_errors);
    }

    #[tokio::test]
    async fn test_invalid_json_fails() {
        let temp = TempDir::new().unwrap();
        write_config(&temp, "{ \"port\": ");
        let plugin = descriptor(temp.path());

        let err = PluginRunner::new(&plugin, &[], &NoOpHandler)
            .run_plugin_routine()
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("Invalid JSON"));
    }

    #[test]
    fn test_options_override() {
        let temp = TempDir::new().unwrap();
        let overrides = PluginOverrides {
            options: Some(serde_json::json!({"additionalEnvVars": ["NODE_ENV"]})),
            ..Default::default()
        };

        let plugin = apply_overrides(descriptor(temp.path()), temp.path(), Some(&overrides)).unwrap();

        assert_eq!(plugin.config().additional_env_vars, vec!["NODE_ENV"]);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let temp = TempDir::new().unwrap();
        let overrides = PluginOverrides {
            options: Some(serde_json::json!({"extraVars": ["NODE_ENV"]})),
            ..Default::default()
        };

        let err = create(temp.path(), Some(&overrides)).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidOptions { .. }));
    }
}
