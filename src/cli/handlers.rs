//! Command handlers; each returns the process exit code

use super::commands::{OutputFormatArg, PluginsArgs, VerifyArgs};
use super::output::{OutputFormat, OutputFormatter, PluginSummary};
use crate::config::{self, VervarConfig};
use crate::output::Palette;
use crate::pipeline::{Orchestrator, RunStatus};
use crate::plugins::PluginRegistry;
use crate::progress::{ConsoleHandler, LoggingHandler, ProgressHandler};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_VERIFICATION_ERRORS: i32 = 1;
pub const EXIT_REQUIREMENT_FAILURES: i32 = 2;
pub const EXIT_FATAL: i32 = 3;

/// Maps a finished run to an exit code; `exit_zero` masks verification problems
pub fn exit_code(status: RunStatus, exit_zero: bool) -> i32 {
    if exit_zero {
        return EXIT_SUCCESS;
    }
    match status {
        RunStatus::Success => EXIT_SUCCESS,
        RunStatus::VerificationErrors => EXIT_VERIFICATION_ERRORS,
        RunStatus::RequirementFailures => EXIT_REQUIREMENT_FAILURES,
    }
}

fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    Ok(match root {
        Some(root) if root.is_absolute() => root.to_path_buf(),
        Some(root) => cwd.join(root),
        None => cwd,
    })
}

pub async fn handle_verify(args: &VerifyArgs) -> i32 {
    match run_verify(args).await {
        Ok(status) => {
            let code = exit_code(status, args.exit_zero);
            debug!(status = %status, code, "Verify finished");
            code
        }
        Err(e) => {
            error!("Verification aborted: {:#}", e);
            EXIT_FATAL
        }
    }
}

async fn run_verify(args: &VerifyArgs) -> Result<RunStatus> {
    let root = resolve_root(args.root.as_deref())?;
    let config_path = config::resolve_config_path(args.config.as_deref(), &root);
    info!(root = %root.display(), config = %config_path.display(), "Loading configuration");

    let config = VervarConfig::load(&config_path)?;
    let plugins = PluginRegistry::with_defaults().create_all(&config, &root)?;

    let handler: Arc<dyn ProgressHandler> = match args.format {
        OutputFormatArg::Human => {
            Arc::new(ConsoleHandler::new(Palette::detect(args.no_color), root.clone()))
        }
        OutputFormatArg::Json | OutputFormatArg::Yaml => Arc::new(LoggingHandler),
    };

    let outcome = Orchestrator::new(handler).run(&plugins).await?;

    let report = OutputFormatter::new(OutputFormat::from(args.format)).format_outcome(&outcome)?;
    if !report.is_empty() {
        println!("{}", report);
    }

    Ok(outcome.status)
}

pub fn handle_plugins(args: &PluginsArgs) -> i32 {
    match list_plugins(args) {
        Ok(output) => {
            print!("{}", output);
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("Failed to list plugins: {:#}", e);
            EXIT_FATAL
        }
    }
}

fn list_plugins(args: &PluginsArgs) -> Result<String> {
    let root = resolve_root(args.root.as_deref())?;
    let plugins = PluginRegistry::with_defaults().defaults(&root)?;
    let summaries: Vec<PluginSummary> = plugins
        .iter()
        .map(|plugin| PluginSummary::from_plugin(plugin.as_ref(), &root))
        .collect();

    let mut output = OutputFormatter::new(args.format.into()).format_plugins(&summaries)?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use yare::parameterized;

    #[parameterized(
        success = { RunStatus::Success, false, EXIT_SUCCESS },
        mismatches = { RunStatus::VerificationErrors, false, EXIT_VERIFICATION_ERRORS },
        requirements = { RunStatus::RequirementFailures, false, EXIT_REQUIREMENT_FAILURES },
        masked_mismatches = { RunStatus::VerificationErrors, true, EXIT_SUCCESS },
        masked_requirements = { RunStatus::RequirementFailures, true, EXIT_SUCCESS },
    )]
    fn test_exit_code(status: RunStatus, exit_zero: bool, expected: i32) {
        assert_eq!(exit_code(status, exit_zero), expected);
    }

    fn verify_args(root: &Path) -> VerifyArgs {
        VerifyArgs {
            config: None,
            root: Some(root.to_path_buf()),
            format: OutputFormatArg::Json,
            no_color: true,
            exit_zero: false,
        }
    }

    #[tokio::test]
    async fn test_missing_config_is_fatal() {
        let temp = TempDir::new().unwrap();
        let mut args = verify_args(temp.path());
        args.config = Some(temp.path().join("absent.json"));

        assert_eq!(handle_verify(&args).await, EXIT_FATAL);
    }

    #[tokio::test]
    async fn test_unknown_plugin_is_fatal_even_with_exit_zero() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("vervar.json");
        fs::write(&config, r#"{"plugins": ["helm"]}"#).unwrap();
        let mut args = verify_args(temp.path());
        args.config = Some(config);
        args.exit_zero = true;

        assert_eq!(handle_verify(&args).await, EXIT_FATAL);
    }

    #[tokio::test]
    async fn test_verify_clean_repository() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join("config");
        let infra = temp.path().join("_infra/app");
        fs::create_dir_all(&config_dir).unwrap();
        fs::create_dir_all(&infra).unwrap();
        fs::write(
            config_dir.join("custom-environment-variables.json"),
            r#"{"port": "PORT"}"#,
        )
        .unwrap();
        fs::write(infra.join(".env"), "PORT=8080\n").unwrap();
        let config = temp.path().join("vervar.json");
        fs::write(&config, r#"{"plugins": ["configCustomEnvVars", "dotEnv"]}"#).unwrap();

        let mut args = verify_args(temp.path());
        args.config = Some(config);

        assert_eq!(run_verify(&args).await.unwrap(), RunStatus::Success);
    }

    #[test]
    fn test_list_plugins_human() {
        let temp = TempDir::new().unwrap();
        let args = PluginsArgs {
            root: Some(temp.path().to_path_buf()),
            format: OutputFormatArg::Human,
        };

        let output = list_plugins(&args).unwrap();

        assert!(output.contains("configCustomEnvVars\n"));
        assert!(output.contains("  path:     config/custom-environment-variables.json\n"));
        assert!(output.contains("kustomize\n"));
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_resolve_root_relative() {
        let cwd = env::current_dir().unwrap();
        assert_eq!(resolve_root(Some(Path::new("sub"))).unwrap(), cwd.join("sub"));
        assert_eq!(resolve_root(None).unwrap(), cwd);
    }
}
