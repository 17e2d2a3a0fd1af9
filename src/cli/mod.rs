//! Command-line interface: argument definitions, handlers and output formatting

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, OutputFormatArg, PluginsArgs, VerifyArgs};
pub use output::{OutputFormat, OutputFormatter, PluginSummary};
