use crate::bot::Handler;
use crate::bot::helpers::channel::InteractionChannel;
use crate::bot::helpers::pages::{DonationsPage, TablePage};
use crate::bot::helpers::pagination::{Paginator, PaginatorOptions};
use serenity::all::{
    CommandInteraction, CommandOptionType, Context, InteractionContext, ResolvedOption,
    ResolvedValue,
};
use serenity::builder::{CreateCommand, CreateCommandOption};

const TITLE: &str = "Donation Board";

pub async fn run(
    handler: &Handler,
    context: &Context,
    interaction: &CommandInteraction,
) -> anyhow::Result<()> {
    let Some(guild_id) = interaction.guild_id else {
        return crate::commands::error::run(context, interaction, "This command only works in a server.")
            .await;
    };

    let mut live = true;

    for option in &interaction.data.options() {
        if let ResolvedOption {
            name: "live",
            value: ResolvedValue::Boolean(value),
            ..
        } = option
        {
            live = *value;
        }
    }

    let players = handler.database.get_tracked_players(guild_id.get()).await?;

    if players.is_empty() {
        return crate::commands::error::run(
            context,
            interaction,
            "No players are tracked yet. Use `/add-player` to add some.",
        )
        .await;
    }

    tracing::info!(
        "[CMD] Donation board for guild {} with {} players (live: {})",
        guild_id,
        players.len(),
        live
    );

    let channel = InteractionChannel::new(context, interaction, handler.config.pagination_timeout);
    let options = PaginatorOptions::default()
        .title(TITLE)
        .rows_per_table(handler.config.rows_per_table);

    if live {
        let source = DonationsPage::new(handler.coc_client.clone());
        let mut paginator = Paginator::new(
            source,
            channel,
            handler.database.clone(),
            guild_id.get(),
            players,
            options,
        );
        paginator.paginate().await?;
    } else {
        let mut paginator = Paginator::new(
            TablePage,
            channel,
            handler.database.clone(),
            guild_id.get(),
            players,
            options,
        );
        paginator.paginate().await?;
    }

    Ok(())
}

pub fn register() -> CreateCommand {
    CreateCommand::new("donationboard")
        .description("Show the donation leaderboard of this server")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Boolean,
                "live",
                "Look up current player names (default: true)",
            )
            .required(false),
        )
        .contexts(vec![InteractionContext::Guild])
}
