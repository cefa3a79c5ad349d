use anyhow::Context;
use clap::Parser;
use ferthe::cli::Cli;
use ferthe::config::FertheConfig;
use ferthe::output;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = FertheConfig::from_env().context("invalid environment configuration")?;

    let default_level = cli.log_filter(&config);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = cli.run(&config).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}
