use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot_state::BotState;
use crate::error::HandlerResult;
use crate::handlers::utils::send_replies;
use crate::models::Identity;
use crate::survey::prompts::HELP;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "answer a few questions and get a training plan")]
    Start,
    #[command(description = "show help")]
    Help,
}

pub async fn command_handler(bot: Bot, msg: Message, cmd: Command, state: BotState) -> HandlerResult {
    match cmd {
        Command::Start => handle_start(bot, msg, state).await?,
        Command::Help => handle_help(bot, msg).await?,
    }
    Ok(())
}

/// `/start` goes through the questionnaire like any other text, so sending it
/// mid-survey is treated as an answer to the current question.
async fn handle_start(bot: Bot, msg: Message, state: BotState) -> HandlerResult {
    let identity = msg.from.as_ref().map(Identity::from).unwrap_or_default();
    let replies = state.handle_text(msg.chat.id, &identity, "/start").await;
    send_replies(&bot, msg.chat.id, replies).await;
    Ok(())
}

async fn handle_help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, HELP).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("/start", "runbot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/help@runbot", "runbot").unwrap(), Command::Help);
        assert!(Command::parse("/persona", "runbot").is_err());
    }
}
