use crate::bot::Handler;
use crate::utils::coc::{CocError, normalize_tag};
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

    let tag = match normalize_tag(&tag) {
        Ok(tag) => tag,
        Err(_) => {
            return crate::commands::error::run(
                context,
                interaction,
                &format!("`{}` is not a valid player tag.", tag),
            )
            .await;
        }
    };

    let player = match handler.coc_client.get_player(&tag).await {
        Ok(player) => player,
        Err(CocError::NotFound(_)) => {
            return crate::commands::error::run(
                context,
                interaction,
                &format!("No player found with tag `{}`.", tag),
            )
            .await;
        }
        Err(e) => return Err(e.into()),
    };

    handler.database.add_player(guild_id.get(), &player).await?;

    tracing::info!(
        "[CMD] Guild {} now tracks {} ({})",
        guild_id,
        player.name,
        player.tag
    );

    let clan = player
        .clan
        .as_ref()
        .map(|clan| clan.name.as_str())
        .unwrap_or("No clan");

    let embed = CreateEmbed::new()
        .title("Player Added")
        .description(format!(
            "**{}** (`{}`) is now on the donation board.\n**Clan:** {}\n**Donations:** {}\n**Received:** {}",
            player.name, player.tag, clan, player.donations, player.received
        ))
        .color(Colour::from_rgb(34, 197, 94));

    let response = CreateInteractionResponseMessage::new()
        .embed(embed)
        .ephemeral(true);

    interaction
        .create_response(context, CreateInteractionResponse::Message(response))
        .await?;

    Ok(())
}

pub fn register() -> CreateCommand {
    CreateCommand::new("add-player")
        .description("Add a player to this server's donation board")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "tag", "Player tag, e.g. #2PP")
                .required(true),
        )
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .contexts(vec![InteractionContext::Guild])
}
