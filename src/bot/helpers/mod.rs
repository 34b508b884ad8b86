pub mod channel;
pub mod command_handler;
pub mod pages;
pub mod pagination;
