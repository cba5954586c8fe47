// lib.rs
// Library modules for the bingo scoring display

pub mod defs;
pub mod logging;
pub mod config;
pub mod card;
pub mod called;
pub mod score;
pub mod store;
pub mod game;
pub mod server;
pub mod client;
pub mod terminal;
