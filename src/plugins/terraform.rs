//! Parameters declared in terraform `variables.tf` files

use super::registry::apply_overrides;
use crate::config::{ConfigError, PluginOverrides};
use crate::extractors::LinePatternExtractor;
use crate::fs::DirectoryWalk;
use crate::pipeline::{Plugin, PluginDescriptor};
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

pub const NAME: &str = "terraform";

pub const PARAMS: &str = "params";

pub const DEFAULT_PATH: &str = "_infra/terraform";

pub const FILE_PATTERN: &str = r"variables\.tf$";

const PARAM_PATTERN: &str = r#"string, "(\S*)""#;

pub fn extractor() -> LinePatternExtractor {
    LinePatternExtractor::new().with_pattern(PARAMS, Regex::new(PARAM_PATTERN).expect("valid regex"))
}

pub fn descriptor(root: &Path) -> PluginDescriptor<()> {
    PluginDescriptor::new(
        NAME,
        root.join(DEFAULT_PATH),
        DirectoryWalk::new(FILE_PATTERN).expect("valid regex"),
        extractor(),
        (),
    )
    .with_result_names([PARAMS])
}

pub fn create(root: &Path, overrides: Option<&PluginOverrides>) -> Result<Arc<dyn Plugin>, ConfigError> {
    Ok(Arc::new(apply_overrides(descriptor(root), root, overrides)?))
}
