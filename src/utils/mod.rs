pub mod coc;
pub mod config;
pub mod database;
pub mod emojis;
pub mod events;
pub mod formatters;
pub mod table;
