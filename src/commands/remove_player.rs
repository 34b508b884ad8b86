use crate::bot::Handler;
use crate::utils::coc::normalize_tag;
use serenity::all::{
    Colour, CommandInteraction, CommandOptionType, Context, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseMessage, InteractionContext, Permissions,
    ResolvedOption, ResolvedValue,
};
use serenity::builder::{CreateCommand, CreateCommandOption};

pub async fn run(
    handler: &Handler,
    context: &Context,
    interaction: &CommandInteraction,
) -> anyhow::Result<()> {
    let Some(guild_id) = interaction.guild_id else {
        return crate::commands::error::run(context, interaction, "This command only works in a server.")
            .await;
    };

    let tag = match interaction.data.options().first() {
        Some(ResolvedOption {
            value: ResolvedValue::String(tag),
            ..
        }) => tag.to_string(),
        _ => anyhow::bail!("Player tag is required"),
    };

    let Ok(tag) = normalize_tag(&tag) else {
        return crate::commands::error::run(
            context,
            interaction,
            &format!("`{}` is not a valid player tag.", tag),
        )
        .await;
    };

    if !handler.database.remove_player(guild_id.get(), &tag).await? {
        return crate::commands::error::run(
            context,
            interaction,
            &format!("`{}` is not on the donation board.", tag),
        )
        .await;
    }

    tracing::info!("[CMD] Guild {} stopped tracking {}", guild_id, tag);

    let embed = CreateEmbed::new()
        .title("Player Removed")
        .description(format!("`{}` was removed from the donation board.", tag))
        .color(Colour::ORANGE);

    let response = CreateInteractionResponseMessage::new()
        .embed(embed)
        .ephemeral(true);

    interaction
        .create_response(context, CreateInteractionResponse::Message(response))
        .await?;

    Ok(())
}

pub fn register() -> CreateCommand {
    CreateCommand::new("remove-player")
        .description("Remove a player from this server's donation board")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "tag", "Player tag, e.g. #2PP")
                .required(true),
        )
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .contexts(vec![InteractionContext::Guild])
}
