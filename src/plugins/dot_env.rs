//! Variables assigned in `.env` files

use super::checks::report_unmatched;
use super::custom_env_vars;
use super::registry::apply_overrides;
use crate::config::{ConfigError, PluginOverrides};
use crate::extractors::LinePatternExtractor;
use crate::fs::DirectoryWalk;
use crate::pipeline::{Dependency, Plugin, PluginDescriptor, VerifyStep};
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

pub const NAME: &str = "dotEnv";

pub const ENV_VARS: &str = "envVars";

pub const DEFAULT_PATH: &str = "_infra";

pub const FILE_PATTERN: &str = r"\.env$";

// Keys are any run of non-space characters before `=`, so dotted and dashed
// names count. An assignment needs a non-empty value; comments never match.
const ASSIGNMENT_PATTERN: &str = r"^(?:export\s+)?([^\s=#][^\s=]*)\s*=\s*\S";

pub fn extractor() -> LinePatternExtractor {
    LinePatternExtractor::new().with_pattern(
        ENV_VARS,
        Regex::new(ASSIGNMENT_PATTERN).expect("valid regex"),
    )
}

fn env_vars_are_used() -> VerifyStep<()> {
    VerifyStep::new(
        vec![
            Dependency::current(ENV_VARS),
            Dependency::plugin(custom_env_vars::NAME, custom_env_vars::CUSTOM_ENV_VARS),
        ],
        |_, args: &[Vec<String>]| {
            let [env_vars, custom_env_vars] = args else {
                return Vec::new();
            };
            report_unmatched(env_vars, custom_env_vars, |var| {
                format!("Env var {} has no matching custom env var", var)
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
    .with_result_names([ENV_VARS])
    .with_verify_step(env_vars_are_used())
}

pub fn create(root: &Path, overrides: Option<&PluginOverrides>) -> Result<Arc<dyn Plugin>, ConfigError> {
    Ok(Arc::new(apply_overrides(descriptor(root), root, overrides)?))
}
