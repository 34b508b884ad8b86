use std::collections::HashMap;

use chrono::Utc;

use crate::bot::helpers::pagination::{PageSource, PaginatorError, PlayerSource};
use crate::utils::coc::CocError;
use crate::utils::database::{DonationEvent, GuildConfig, TrackedPlayer};
use crate::utils::emojis;
use crate::utils::formatters::events_time;
use crate::utils::table::ClyTable;

fn add_board_row(
    table: &mut ClyTable,
    index: usize,
    donations: u64,
    received: u64,
    name: &str,
    config: &GuildConfig,
) {
    if config.is_compact() {
        table.add_row([index.to_string(), donations.to_string(), name.to_string()]);
    } else {
        table.add_row([
            index.to_string(),
            donations.to_string(),
            received.to_string(),
            name.to_string(),
        ]);
    }
}

fn render_board(table: &ClyTable, config: &GuildConfig) -> String {
    if config.is_compact() {
        table.render_option_2()
    } else {
        table.render_option_1()
    }
}

/// Donation board built from the stored names and counts only.
pub struct TablePage;

#[serenity::async_trait]
impl PageSource for TablePage {
    type Record = TrackedPlayer;

    async fn prepare_entry(
        &self,
        table: &mut ClyTable,
        window: &[(usize, TrackedPlayer)],
        config: &GuildConfig,
    ) -> Result<String, PaginatorError> {
        for (index, player) in window {
            add_board_row(
                table,
                *index,
                player.donations,
                player.received,
                &player.player_name,
                config,
            );
        }

        Ok(render_board(table, config))
    }
}

/// Donation board that shows each player's current in-game name.
pub struct DonationsPage<P: PlayerSource> {
    players: P,
}

impl<P: PlayerSource> DonationsPage<P> {
    pub fn new(players: P) -> Self {
        DonationsPage { players }
    }
}

#[serenity::async_trait]
impl<P: PlayerSource> PageSource for DonationsPage<P> {
    type Record = TrackedPlayer;

    async fn prepare_entry(
        &self,
        table: &mut ClyTable,
        window: &[(usize, TrackedPlayer)],
        config: &GuildConfig,
    ) -> Result<String, PaginatorError> {
        let tags: Vec<String> = window
            .iter()
            .map(|(_, player)| player.player_tag.clone())
            .collect();

        let mut live_by_tag: HashMap<String, _> = self
            .players
            .get_players(&tags)
            .await?
            .into_iter()
            .map(|player| (player.tag.clone(), player))
            .collect();

        // the lookup may answer in any order, rows follow the board order
        for (index, record) in window {
            let live = live_by_tag
                .remove(&record.player_tag)
                .ok_or_else(|| CocError::MissingPlayer(record.player_tag.clone()))?;

            add_board_row(
                table,
                *index,
                record.donations,
                record.received,
                &live.name,
                config,
            );
        }

        Ok(render_board(table, config))
    }
}

pub struct EventsPage;

#[serenity::async_trait]
impl PageSource for EventsPage {
    type Record = DonationEvent;

    async fn prepare_entry(
        &self,
        table: &mut ClyTable,
        window: &[(usize, DonationEvent)],
        _config: &GuildConfig,
    ) -> Result<String, PaginatorError> {
        let now = Utc::now();

        for (_, event) in window {
            let age = (now - event.time).num_seconds().max(0) as u64;
            let (icon, count) = if event.donations > 0 {
                (emojis::DONATED, event.donations)
            } else {
                (emojis::RECEIVED, event.received)
            };

            table.add_row([
                icon.to_string(),
                count.to_string(),
                event.player_name.clone(),
                events_time(age),
            ]);
        }

        Ok(format!(
            "{}\nKey: {} - Donated, {} - Received",
            table.render_events_command(),
            emojis::DONATED,
            emojis::RECEIVED
        ))
    }
}
