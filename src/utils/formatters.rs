use crate::utils::database::DonationEvent;
use crate::utils::emojis;

const MAX_NAME_LEN: usize = 15;
const MAX_MESSAGE_LEN: usize = 2000;

/// Shortens names longer than 15 characters, marking the cut with `..`.
pub fn clean_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_LEN {
        let mut cleaned: String = name.chars().take(MAX_NAME_LEN).collect();
        cleaned.push_str("..");
        cleaned
    } else {
        name.to_string()
    }
}

fn split_duration(delta_seconds: u64) -> (u64, u64, u64, u64) {
    let (hours, remainder) = (delta_seconds / 3600, delta_seconds % 3600);
    let (minutes, seconds) = (remainder / 60, remainder % 60);
    let (days, hours) = (hours / 24, hours % 24);
    (days, hours, minutes, seconds)
}

/// Formats a duration as `1d 2h 3m 4s`, dropping leading days and hours when they are zero.
///
/// Minutes and seconds are always present.
pub fn readable_time(delta_seconds: u64) -> String {
    let (days, hours, minutes, seconds) = split_duration(delta_seconds);

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else {
        format!("{minutes}m {seconds}s")
    }
}

/// Formats a duration using only its largest non-zero unit, e.g. `2hr`.
pub fn events_time(delta_seconds: u64) -> String {
    let (days, hours, minutes, seconds) = split_duration(delta_seconds);

    if days > 0 {
        format!("{days}days")
    } else if hours > 0 {
        format!("{hours}hr")
    } else if minutes > 0 {
        format!("{minutes}min")
    } else {
        format!("{seconds}sec")
    }
}

fn count_symbol(count: u64) -> String {
    match emojis::number(count) {
        Some(emoji) => emoji.to_string(),
        None => count.to_string(),
    }
}

/// One-line donation log entry, e.g. `🟢Bob 📤 5️⃣ (My Clan)`.
pub fn format_event_log_message(event: &DonationEvent, clan_name: &str) -> String {
    let (status, action, number) = if event.donations > 0 {
        (emojis::ONLINE, emojis::DONATED, count_symbol(event.donations))
    } else {
        // zero received stays as plain digits
        (emojis::OFFLINE, emojis::RECEIVED, count_symbol(event.received))
    };

    format!(
        "{status}{} {action} {number} ({clan_name})",
        event.player_name
    )
}

/// Cuts message content down to Discord's 2000 character limit.
pub fn truncate_content(content: &str) -> String {
    let char_count = content.chars().count();

    if char_count <= MAX_MESSAGE_LEN {
        return content.to_string();
    }

    let truncated: String = content.chars().take(MAX_MESSAGE_LEN - 3).collect();
    tracing::warn!(
        "[FORMAT] Message content truncated from {} to {} characters",
        char_count,
        MAX_MESSAGE_LEN
    );
    format!("{truncated}...")
}
