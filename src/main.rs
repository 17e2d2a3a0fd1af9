use vervar::cli::commands::{CliArgs, Commands};
use vervar::cli::handlers::{handle_plugins, handle_verify};
use vervar::{init_logging, LoggingConfig, VERSION};

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::from_args(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("vervar v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Verify(verify_args) => handle_verify(verify_args).await,
        Commands::Plugins(plugins_args) => handle_plugins(plugins_args),
    };

    std::process::exit(exit_code);
}
