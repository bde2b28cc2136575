use berner_core::{BotConfig, CoreResult, ErrorReporter};
use bot_service::BotController;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str =
    "redditberner=info,bot_service=info,reddit_client=info,storage=info,berner_core=info";

#[tokio::main]
async fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting RedditBerner");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(ErrorReporter::new().report_fatal(&e)),
    }
}

async fn run() -> CoreResult<()> {
    let config = BotConfig::load_or_default("config")?;
    let mut bot = BotController::interactive(config)?;

    bot.initialize().await?;

    let stop = bot.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping");
            stop.cancel();
        }
    });

    bot.start().await
}
