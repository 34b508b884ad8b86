use crate::bot::Handler;
use crate::bot::helpers::channel::InteractionChannel;
use crate::bot::helpers::pages::EventsPage;
use crate::bot::helpers::pagination::{Paginator, PaginatorOptions};
use serenity::all::{
    CommandInteraction, CommandOptionType, Context, InteractionContext, ResolvedOption,
    ResolvedValue,
};
use serenity::builder::{CreateCommand, CreateCommandOption};

const DEFAULT_LIMIT: u32 = 100;
const MAX_LIMIT: u32 = 500;

pub async fn run(
    handler: &Handler,
    context: &Context,
    interaction: &CommandInteraction,
) -> anyhow::Result<()> {
    let Some(guild_id) = interaction.guild_id else {
        return crate::commands::error::run(context, interaction, "This command only works in a server.")
            .await;
    };

    let mut limit = DEFAULT_LIMIT;

    for option in &interaction.data.options() {
        if let ResolvedOption {
            name: "limit",
            value: ResolvedValue::Integer(value),
            ..
        } = option
        {
            limit = (*value).clamp(1, MAX_LIMIT as i64) as u32;
        }
    }

    let events = handler.database.get_events(guild_id.get(), limit).await?;

    if events.is_empty() {
        return crate::commands::error::run(
            context,
            interaction,
            "No donation events recorded yet. Run `/refresh` to pick up new donations.",
        )
        .await;
    }

    let channel = InteractionChannel::new(context, interaction, handler.config.pagination_timeout);
    let options = PaginatorOptions::default()
        .title("Recent Events")
        .rows_per_table(handler.config.rows_per_table);

    let mut paginator = Paginator::new(
        EventsPage,
        channel,
        handler.database.clone(),
        guild_id.get(),
        events,
        options,
    );
    paginator.paginate().await?;

    Ok(())
}

pub fn register() -> CreateCommand {
    CreateCommand::new("events")
        .description("Show the most recent donation events")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Integer,
                "limit",
                "How many events to show (default: 100)",
            )
            .min_int_value(1)
            .max_int_value(MAX_LIMIT as u64)
            .required(false),
        )
        .contexts(vec![InteractionContext::Guild])
}
