use crate::bot::Handler;
use crate::utils::config::Config;
use anyhow::Result;
use serenity::prelude::*;

/// Initialize and start the Discord bot
pub async fn start_bot(config: Config) -> Result<()> {
    tracing::info!("[INIT] Starting donation bot");

    let token = config.discord_token.clone();
    let handler = Handler::new(config).await?;

    // reactions drive page navigation
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGE_REACTIONS;

    let mut client = Client::builder(token, intents)
        .event_handler(handler)
        .await?;

    if let Err(why) = client.start().await {
        tracing::error!("[ERROR] Discord client error: {why:?}");
    }

    Ok(())
}
