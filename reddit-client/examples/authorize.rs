//! Runs the real authorization handshake against Reddit using the default
//! settings and prints the (truncated) tokens. Nothing is written to disk.

use berner_core::BotConfig;
use reddit_client::{AuthorizationSession, RedditOAuth2Config, RedditOAuthClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let bot_config = BotConfig::default();
    let config = RedditOAuth2Config::from(&bot_config);
    let exchange = RedditOAuthClient::new(config.clone())?;

    let session = AuthorizationSession::begin(&config, bot_config.authorization_timeout()).await?;
    println!("Open this URL in your browser and click 'Allow':\n");
    println!("{}\n", session.authorization_url());

    let tokens = session.wait(&exchange).await?;
    println!(
        "Access token: {}...",
        tokens.access_token.chars().take(8).collect::<String>()
    );
    println!(
        "Refresh token: {}...",
        tokens.refresh_token.chars().take(8).collect::<String>()
    );

    Ok(())
}
