use teloxide::prelude::*;

use crate::bot_state::BotState;
use crate::error::HandlerResult;
use crate::handlers::utils::send_replies;
use crate::models::Identity;
use crate::survey::Action;

pub async fn callback_handler(bot: Bot, q: CallbackQuery, state: BotState) -> HandlerResult {
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        log::warn!("Failed to answer callback query {}: {}", q.id, e);
    }

    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        return Ok(());
    };
    let Some(action) = Action::from_callback_data(data) else {
        log::warn!("Unknown callback data: {}", data);
        return Ok(());
    };

    let chat_id = message.chat().id;
    let identity = Identity::from(&q.from);
    let replies = state.handle_action(chat_id, &identity, action).await;
    send_replies(&bot, chat_id, replies).await;

    Ok(())
}
