//! mentor CLI: static debugging and complexity estimation.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands, LogFormat};

fn init_tracing(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    match cli.command {
        Commands::Debug(args) => cli::debug_command(args).await?,
        Commands::Complexity(args) => cli::complexity_command(args).await?,
        Commands::Review(args) => cli::review_command(args).await?,
        Commands::PrintDefaultConfig => cli::print_default_config().await?,
        Commands::InitConfig(args) => cli::init_config(args).await?,
        Commands::ValidateConfig(args) => cli::validate_config(args).await?,
        Commands::ListLanguages => cli::list_languages().await?,
    }

    Ok(())
}
