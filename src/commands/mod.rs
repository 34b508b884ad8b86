pub mod add_player;
pub mod board_settings;
pub mod donationboard;
pub mod error;
pub mod events;
pub mod refresh;
pub mod remove_player;
