//! Prompt Bandit CLI entry point.

use clap::Parser;

use prompt_bandit::cli::{commands, handle_error, Cli, Commands};
use prompt_bandit::infrastructure::logging::LoggerImpl;
use prompt_bandit::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => handle_error(&err, cli.json),
    };

    if let Err(err) = LoggerImpl::init(&config.logging) {
        handle_error(&err, cli.json);
    }

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args, &config, cli.json).await,
        Commands::Arms(args) => commands::arms::execute(args, &config, cli.json),
    };

    if let Err(err) = result {
        handle_error(&err, cli.json);
    }
}
