use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reddit_inactivity::checker::InactivityChecker;
use reddit_inactivity::config::Config;
use reddit_inactivity::reddit::RedditClient;
use reddit_inactivity::report;

#[derive(Debug, Parser)]
#[command(name = "reddit-inactivity", about = "Find subreddits inactive for more than N months")]
struct Cli {
    /// Inactivity threshold in months
    inactivity: u32,

    /// Open each reported forum in a browser tab
    #[arg(short, long)]
    browser: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    info!(
        months = cli.inactivity,
        "Finding subreddits inactive for more than {} months", cli.inactivity
    );

    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let client = RedditClient::login(config.credentials())
        .await
        .context("Failed to authenticate with reddit")?;

    let checker = InactivityChecker::initialize(client, cli.inactivity)
        .await
        .context("Failed to initialize inactivity checker")?;

    let results = checker.classify_all().await;
    report::print(&results);

    if cli.browser {
        report::open_in_browser(&results);
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reddit_inactivity=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
