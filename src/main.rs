use anyhow::Context;
use teloxide::{prelude::*, utils::command::BotCommands};

use training_plan_bot::bot_state::BotState;
use training_plan_bot::config::BotConfig;
use training_plan_bot::database::Database;
use training_plan_bot::handlers::{callback_handler, command_handler, message_handler, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting training plan bot...");

    let config = BotConfig::from_env()?;

    let db = Database::new(&config.database_url)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    db.init().await.context("failed to migrate database")?;
    log::info!("✅ Database initialized");

    let state = BotState::new(db);
    let bot = Bot::new(config.token);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Could not register bot commands: {}", e);
    }

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(Update::filter_message().endpoint(message_handler));

    log::info!("🚀 Starting dispatcher...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
