use crate::bot::Handler;
use crate::commands;
use anyhow::Result;
use serenity::all::{CommandInteraction, Context};

/// Route a slash command to its handler. Each command checks for a guild itself.
pub async fn handle_slash_command(
    handler: &Handler,
    context: &Context,
    command: &CommandInteraction,
) -> Result<()> {
    match command.data.name.as_str() {
        "add-player" => commands::add_player::run(handler, context, command).await,
        "board-settings" => commands::board_settings::run(handler, context, command).await,
        "donationboard" => commands::donationboard::run(handler, context, command).await,
        "events" => commands::events::run(handler, context, command).await,
        "refresh" => commands::refresh::run(handler, context, command).await,
        "remove-player" => commands::remove_player::run(handler, context, command).await,
        unknown_command => {
            tracing::warn!("[CMD] Unknown slash command received: '{}'", unknown_command);
            commands::error::run(
                context,
                command,
                &format!("Unknown command: `{}`", unknown_command),
            )
            .await
        }
    }
}
