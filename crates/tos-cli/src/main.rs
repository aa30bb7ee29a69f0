mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tos_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for results
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = Config::load_from(&config_path)?;

    match cli.command {
        cli::Commands::Analyze {
            text,
            url,
            file,
            pretty,
        } => commands::analyze::handle(&config, text, url, file, pretty).await,
        cli::Commands::Serve { host, port } => commands::serve::handle(&config, host, port).await,
        cli::Commands::Config => commands::config::handle(&config, &config_path),
    }
}
