//! Clash of Clans donation boards for Discord: fixed-width table rendering,
//! a reaction-driven paginator and the bot that serves them.

pub mod bot;
pub mod commands;
pub mod utils;

mod tests;
