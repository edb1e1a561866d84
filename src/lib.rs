pub mod bot_state;
pub mod config;
pub mod conversations;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod survey;
