use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Plugin-driven consistency checker for configuration variables
#[derive(Parser, Debug)]
#[command(
    name = "vervar",
    about = "Verify that configuration variables agree across infrastructure files",
    version,
    long_about = "vervar runs an ordered list of plugins over a repository. Each plugin \
                  extracts variable names from a kind of file (.env files, kustomizations, \
                  terraform variables, custom environment variable mappings) and checks them \
                  against its own results and the results of plugins that ran before it."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run the configured plugins and report mismatches",
        long_about = "Loads the plugin list from vervar.config.json (or --config / VERVAR_CONFIG), \
                      runs every plugin in order and prints one line per file plus a summary.\n\n\
                      Exit codes: 0 success, 1 variable mismatches, 2 plugin requirement \
                      failures, 3 fatal error.\n\n\
                      Examples:\n  \
                      vervar verify\n  \
                      vervar verify --root ../service --no-color\n  \
                      vervar verify --config ci/vervar.json --format json"
    )]
    Verify(VerifyArgs),

    #[command(
        about = "List the built-in plugins",
        long_about = "Shows every registered plugin with its default path, the result fields it \
                      produces and the fields it depends on.\n\n\
                      Examples:\n  \
                      vervar plugins\n  \
                      vervar plugins --format json"
    )]
    Plugins(PluginsArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct VerifyArgs {
    #[arg(
        short = 'c',
        long,
        value_name = "FILE",
        help = "Config file (defaults to <root>/vervar.config.json)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'r',
        long,
        value_name = "DIR",
        help = "Repository root that plugin paths are relative to (defaults to current directory)"
    )]
    pub root: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(long, help = "Exit with 0 even when verification finds problems")]
    pub exit_zero: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PluginsArgs {
    #[arg(
        short = 'r',
        long,
        value_name = "DIR",
        help = "Repository root used to show default paths (defaults to current directory)"
    )]
    pub root: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_verify_defaults() {
        let args = CliArgs::try_parse_from(["vervar", "verify"]).unwrap();

        match args.command {
            Commands::Verify(verify) => {
                assert!(verify.config.is_none());
                assert!(verify.root.is_none());
                assert_eq!(verify.format, OutputFormatArg::Human);
                assert!(!verify.no_color);
                assert!(!verify.exit_zero);
            }
            _ => panic!("Expected verify command"),
        }
    }

    #[test]
    fn test_parse_verify_flags() {
        let args = CliArgs::try_parse_from([
            "vervar",
            "verify",
            "--config",
            "ci.json",
            "--root",
            "/repo",
            "--format",
            "json",
            "--no-color",
            "--exit-zero",
            "-v",
        ])
        .unwrap();

        assert!(args.verbose);
        match args.command {
            Commands::Verify(verify) => {
                assert_eq!(verify.config, Some(PathBuf::from("ci.json")));
                assert_eq!(verify.root, Some(PathBuf::from("/repo")));
                assert_eq!(verify.format, OutputFormatArg::Json);
                assert!(verify.no_color);
                assert!(verify.exit_zero);
            }
            _ => panic!("Expected verify command"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["vervar", "-v", "-q", "verify"]).is_err());
    }

    #[test]
    fn test_parse_plugins() {
        let args = CliArgs::try_parse_from(["vervar", "plugins", "-f", "yaml"]).unwrap();
        match args.command {
            Commands::Plugins(plugins) => assert_eq!(plugins.format, OutputFormatArg::Yaml),
            _ => panic!("Expected plugins command"),
        }
    }
}
