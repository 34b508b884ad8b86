use crate::bot::Handler;
use crate::bot::helpers::pagination::DEFAULT_ICON_URL;
use serenity::all::{
    Colour, CommandInteraction, CommandOptionType, Context, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseMessage, InteractionContext, Permissions,
    ResolvedOption, ResolvedValue,
};
use serenity::builder::{CreateCommand, CreateCommandOption};
use url::Url;

/// `reset` (or an empty value) clears a setting back to its default.
fn setting_value(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("reset"))
}

pub async fn run(
    handler: &Handler,
    context: &Context,
    interaction: &CommandInteraction,
) -> anyhow::Result<()> {
    let Some(guild_id) = interaction.guild_id else {
        return crate::commands::error::run(context, interaction, "This command only works in a server.")
            .await;
    };
    let guild_id = guild_id.get();

    let mut render: Option<i64> = None;
    let mut title: Option<String> = None;
    let mut icon: Option<String> = None;

    for option in &interaction.data.options() {
        match option {
            ResolvedOption {
                name: "render",
                value: ResolvedValue::Integer(value),
                ..
            } => render = Some(*value),
            ResolvedOption {
                name: "title",
                value: ResolvedValue::String(value),
                ..
            } => title = Some(value.trim().to_string()),
            ResolvedOption {
                name: "icon",
                value: ResolvedValue::String(value),
                ..
            } => icon = Some(value.trim().to_string()),
            _ => {}
        }
    }

    if let Some(icon) = icon.as_deref().and_then(setting_value)
        && Url::parse(icon).is_err()
    {
        return crate::commands::error::run(
            context,
            interaction,
            &format!("`{}` is not a valid icon URL.", icon),
        )
        .await;
    }

    if let Some(render) = render {
        handler.database.set_donationboard_render(guild_id, render).await?;
    }
    if let Some(title) = &title {
        handler
            .database
            .set_donationboard_title(guild_id, setting_value(title))
            .await?;
    }
    if let Some(icon) = &icon {
        handler.database.set_icon_url(guild_id, setting_value(icon)).await?;
    }

    let config = handler.database.get_guild_config(guild_id).await?;

    tracing::info!("[CMD] Guild {} board settings: {:?}", guild_id, config);

    let embed = CreateEmbed::new()
        .title("Donation Board Settings")
        .description(format!(
            "**Layout:** {}\n**Title:** {}\n**Icon:** {}",
            if config.is_compact() {
                "2 (donations and name)"
            } else {
                "1 (donations, received and name)"
            },
            config.donationboard_title.as_deref().unwrap_or("Donation Board"),
            config.icon_url.as_deref().unwrap_or(DEFAULT_ICON_URL),
        ))
        .color(Colour::BLUE);

    let response = CreateInteractionResponseMessage::new()
        .embed(embed)
        .ephemeral(true);

    interaction
        .create_response(context, CreateInteractionResponse::Message(response))
        .await?;

    Ok(())
}

pub fn register() -> CreateCommand {
    CreateCommand::new("board-settings")
        .description("Change how this server's donation board looks")
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "render", "Layout to use")
                .add_int_choice("1 - Donations, received and name", 1)
                .add_int_choice("2 - Donations and name", 2)
                .required(false),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "title",
                "Board title, or `reset` for the default",
            )
            .required(false),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "icon",
                "Icon URL shown next to the title, or `reset` for the default",
            )
            .required(false),
        )
        .default_member_permissions(Permissions::MANAGE_GUILD)
        .contexts(vec![InteractionContext::Guild])
}
