use crate::commands;
use serenity::all::CreateCommand;

/// Get all slash commands to register
pub fn get_all_commands() -> Vec<CreateCommand> {
    vec![
        commands::add_player::register(),
        commands::board_settings::register(),
        commands::donationboard::register(),
        commands::events::register(),
        commands::refresh::register(),
        commands::remove_player::register(),
    ]
}
