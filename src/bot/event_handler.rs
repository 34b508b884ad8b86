use crate::bot::{Handler, command_registry, helpers::command_handler};
use crate::commands;
use serenity::all::{Command, Interaction, Ready};
use serenity::prelude::*;

#[serenity::async_trait]
impl EventHandler for Handler {
    async fn interaction_create(&self, context: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        tracing::debug!(
            "[CMD] /{} from user {} in guild {:?}",
            command.data.name,
            command.user.id,
            command.guild_id
        );

        if let Err(e) = command_handler::handle_slash_command(self, &context, &command).await {
            tracing::error!("[CMD] /{} failed: {:#}", command.data.name, e);

            let message = "An unexpected error occurred. Please try again later.";

            // the command may already have answered, e.g. with a paginator message
            if commands::error::run(&context, &command, message).await.is_err()
                && let Err(send_err) = commands::error::edit_response(&context, &command, message).await
            {
                tracing::error!("[CMD] Failed to send error response to user: {}", send_err);
            }
        }
    }

    async fn ready(&self, context: Context, ready: Ready) {
        tracing::info!("[BOT] {} is ready and connected!", ready.user.name);

        let commands_vec = command_registry::get_all_commands();
        let command_count = commands_vec.len();

        match Command::set_global_commands(&context, commands_vec).await {
            Ok(_) => tracing::info!(
                "[CMD] Successfully registered {} global commands",
                command_count
            ),
            Err(e) => tracing::error!("[CMD] Failed to register global commands: {}", e),
        }
    }
}
