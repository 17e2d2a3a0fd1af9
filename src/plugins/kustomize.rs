//! Secret and parameter references in `kustomization.yaml` files
//!
//! Parameters are quoted `objectName` entries, secrets are dotted `objectName`
//! entries and secret keys are `key` entries. A secret `.app.db` corresponds
//! to the parameter `/app/db`.

use super::checks::report_unmatched;
use super::registry::apply_overrides;
use super::{custom_env_vars, terraform};
use crate::config::{ConfigError, PluginOverrides};
use crate::extractors::LinePatternExtractor;
use crate::fs::DirectoryWalk;
use crate::pipeline::{Dependency, Plugin, PluginDescriptor, VerifyStep};
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

pub const NAME: &str = "kustomize";

pub const PARAMS: &str = "params";
pub const SECRETS: &str = "secrets";
pub const SECRET_KEYS: &str = "secretKeys";

pub const DEFAULT_PATH: &str = "_infra";

pub const FILE_PATTERN: &str = r"kustomization\.yaml$";

pub fn extractor() -> LinePatternExtractor {
    LinePatternExtractor::new()
        .with_pattern(
            PARAMS,
            Regex::new(r#"- objectName: "(\S*)""#).expect("valid regex"),
        )
        .with_pattern(
            SECRETS,
            Regex::new(r"objectName: (\.\S*)").expect("valid regex"),
        )
        .with_pattern(SECRET_KEYS, Regex::new(r"- key: (\S*)").expect("valid regex"))
}

/// Secrets use dots where parameters use slashes
fn secret_to_param(secret: &str) -> String {
    secret.replace('.', "/")
}

fn params_and_secrets_match() -> VerifyStep<()> {
    VerifyStep::new(
        vec![Dependency::current(PARAMS), Dependency::current(SECRETS)],
        |_, args: &[Vec<String>]| {
            let [params, secrets] = args else {
                return Vec::new();
            };
            let secrets: Vec<String> = secrets.iter().map(|s| secret_to_param(s)).collect();

            let mut errors = report_unmatched(params, &secrets, |param| {
                format!("Param {} has no matching secret", param)
            });
            errors.extend(report_unmatched(&secrets, params, |secret| {
                format!("Secret {} has no matching param", secret)
            }));
            errors
        },
    )
}

fn secret_keys_are_used() -> VerifyStep<()> {
    VerifyStep::new(
        vec![
            Dependency::current(SECRET_KEYS),
            Dependency::plugin(custom_env_vars::NAME, custom_env_vars::CUSTOM_ENV_VARS),
        ],
        |_, args: &[Vec<String>]| {
            let [secret_keys, env_vars] = args else {
                return Vec::new();
            };
            report_unmatched(secret_keys, env_vars, |key| {
                format!("Secret key {} has no matching custom env var", key)
            })
        },
    )
}

fn terraform_passes_params() -> VerifyStep<()> {
    VerifyStep::new(
        vec![
            Dependency::current(PARAMS),
            Dependency::plugin(terraform::NAME, terraform::PARAMS),
        ],
        |_, args: &[Vec<String>]| {
            let [params, terraform_params] = args else {
                return Vec::new();
            };
            report_unmatched(params, terraform_params, |param| {
                format!("Param {} has no matching terraform param", param)
            })
        },
    )
}

pub fn descriptor(root: &Path) -> PluginDescriptor<()> {
    PluginDescriptor::new(
        NAME,
        root.join(DEFAULT_PATH),
        DirectoryWalk::new(FILE_PATTERN).expect("valid regex"),
        extractor(),
        (),
    )
    .with_result_names([PARAMS, SECRETS, SECRET_KEYS])
    .with_verify_step(params_and_secrets_match())
    .with_verify_step(secret_keys_are_used())
    .with_verify_step(terraform_passes_params())
}

pub fn create(root: &Path, overrides: Option<&PluginOverrides>) -> Result<Arc<dyn Plugin>, ConfigError> {
    Ok(Arc::new(apply_overrides(descriptor(root), root, overrides)?))
}
