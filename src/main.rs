use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsbrief::app::AppContext;
use newsbrief::cli::{commands, Cli, Commands};
use newsbrief::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newsbrief=info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.clone())?;
    let ctx = AppContext::new(config)?;

    let result = run(&ctx, cli).await;

    // The browser must be closed even when the command failed
    ctx.shutdown().await;

    result?;
    Ok(())
}

async fn run(ctx: &AppContext, cli: Cli) -> newsbrief::app::Result<()> {
    let json = cli.json;

    match cli.command {
        Commands::Headlines { country, page_size } => {
            commands::list_headlines(ctx, country, page_size, json).await
        }
        Commands::Body { url } => commands::show_body(ctx, &url, json).await,
        Commands::Summarize { url } => commands::summarize_article(ctx, &url, json).await,
        Commands::Digest { country, page_size } => {
            commands::digest(ctx, country, page_size, json).await
        }
    }
}
