use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::utils::coc::Player;
use crate::utils::database::{DonationEvent, TrackedPlayer};

/// Counts drop when the season resets, in which case the whole new count is fresh activity.
fn delta(previous: u64, current: u64) -> u64 {
    if current >= previous {
        current - previous
    } else {
        current
    }
}

/// Diffs live player data against the stored counts.
///
/// Donating and receiving produce separate events. Live players that are not tracked are skipped.
pub fn compute_events(
    tracked: &[TrackedPlayer],
    live: &[Player],
    now: DateTime<Utc>,
) -> Vec<DonationEvent> {
    let stored: HashMap<&str, &TrackedPlayer> = tracked
        .iter()
        .map(|player| (player.player_tag.as_str(), player))
        .collect();

    let mut events = Vec::new();

    for player in live {
        let Some(previous) = stored.get(player.tag.as_str()) else {
            continue;
        };

        let donated = delta(previous.donations, player.donations);
        let received = delta(previous.received, player.received);

        if donated > 0 {
            events.push(DonationEvent {
                player_tag: player.tag.clone(),
                player_name: player.name.clone(),
                donations: donated,
                received: 0,
                time: now,
            });
        }

        if received > 0 {
            events.push(DonationEvent {
                player_tag: player.tag.clone(),
                player_name: player.name.clone(),
                donations: 0,
                received,
                time: now,
            });
        }
    }

    events
}
