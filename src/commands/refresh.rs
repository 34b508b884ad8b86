use std::collections::HashMap;

use crate::bot::Handler;
use crate::utils::database::DonationEvent;
use crate::utils::events::compute_events;
use crate::utils::formatters::{clean_name, format_event_log_message, readable_time, truncate_content};
use chrono::Utc;
use serenity::all::{CommandInteraction, Context, EditInteractionResponse, InteractionContext};
use serenity::builder::CreateCommand;

const NO_CLAN: &str = "No clan";

/// Names the tracked players the API no longer knows, so they can be removed.
fn skipped_notice(missing: &[String]) -> Option<String> {
    if missing.is_empty() {
        return None;
    }

    Some(format!(
        "Skipped players that no longer exist: {}. Use `/remove-player` to stop tracking them.",
        missing.join(", ")
    ))
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

    // looking up every tracked player can outlast the initial response window
    interaction.defer(&context.http).await?;

    let tracked = handler.database.get_tracked_players(guild_id).await?;
    if tracked.is_empty() {
        return crate::commands::error::edit_response(
            context,
            interaction,
            "No players are tracked yet. Use `/add-player` to add some.",
        )
        .await;
    }

    let tags: Vec<String> = tracked.iter().map(|p| p.player_tag.clone()).collect();
    let lookup = match handler.coc_client.get_existing_players(&tags).await {
        Ok(lookup) => lookup,
        Err(e) => {
            tracing::error!("[REFRESH] Player lookup failed for guild {}: {}", guild_id, e);
            return crate::commands::error::edit_response(
                context,
                interaction,
                "Could not reach the Clash of Clans API. Please try again later.",
            )
            .await;
        }
    };
    let live = lookup.found;

    let previous = handler.database.get_events(guild_id, 1).await?;
    let now = Utc::now();
    let events = compute_events(&tracked, &live, now);

    handler.database.record_refresh(guild_id, &events, &live).await?;

    tracing::info!(
        "[REFRESH] Guild {}: {} players checked, {} missing, {} new events",
        guild_id,
        live.len(),
        lookup.missing.len(),
        events.len()
    );

    let clans: HashMap<&str, &str> = live
        .iter()
        .map(|player| {
            let clan = player.clan.as_ref().map_or(NO_CLAN, |clan| clan.name.as_str());
            (player.tag.as_str(), clan)
        })
        .collect();

    let content = if events.is_empty() {
        match previous.first() {
            Some(last) => format!(
                "No new donations. Last activity was {} ago.",
                readable_time((now - last.time).num_seconds().max(0) as u64)
            ),
            None => "No new donations since the last refresh.".to_string(),
        }
    } else {
        events
            .iter()
            .map(|event| {
                let display = DonationEvent {
                    player_name: clean_name(&event.player_name),
                    ..event.clone()
                };
                let clan = clans.get(event.player_tag.as_str()).copied().unwrap_or(NO_CLAN);
                format_event_log_message(&display, clan)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    // ahead of the event lines so truncation never drops it
    let content = match skipped_notice(&lookup.missing) {
        Some(notice) => format!("{notice}\n\n{content}"),
        None => content,
    };

    interaction
        .edit_response(
            &context.http,
            EditInteractionResponse::new().content(truncate_content(&content)),
        )
        .await?;

    Ok(())
}

pub fn register() -> CreateCommand {
    CreateCommand::new("refresh")
        .description("Check tracked players for new donations and log them")
        .contexts(vec![InteractionContext::Guild])
}
