use teloxide::prelude::*;

use crate::bot_state::BotState;
use crate::error::HandlerResult;
use crate::handlers::utils::send_replies;
use crate::models::Identity;

pub async fn message_handler(bot: Bot, msg: Message, state: BotState) -> HandlerResult {
    // Stickers, photos and the like never answer a question.
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let identity = msg.from.as_ref().map(Identity::from).unwrap_or_default();
    let replies = state.handle_text(msg.chat.id, &identity, text.trim()).await;
    send_replies(&bot, msg.chat.id, replies).await;

    Ok(())
}
