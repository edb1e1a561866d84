use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InputFile, KeyboardButton, KeyboardMarkup, KeyboardRemove,
    ReplyMarkup,
};

use crate::models::options::OptionRows;
use crate::survey::{Action, Keyboard, Reply};

/// Reply keyboard built from a step's option table.
pub fn options_keyboard(rows: OptionRows) -> KeyboardMarkup {
    KeyboardMarkup::new(
        rows.iter()
            .map(|row| row.iter().map(|label| KeyboardButton::new(*label)).collect::<Vec<_>>()),
    )
    .resize_keyboard()
}

/// Inline download/subscribe buttons offered after the survey.
pub fn follow_up_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("📄 Download plan", Action::Download.callback_data()),
        InlineKeyboardButton::callback("📬 Subscribe", Action::Subscribe.callback_data()),
    ]])
}

pub fn reply_markup(keyboard: Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::Unchanged => None,
        Keyboard::Options(rows) => Some(ReplyMarkup::Keyboard(options_keyboard(rows))),
        Keyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
        Keyboard::FollowUp => Some(ReplyMarkup::InlineKeyboard(follow_up_keyboard())),
    }
}

/// Send replies in order. Failures are logged and dropped; the conversation
/// has already moved on.
pub async fn send_replies(bot: &Bot, chat_id: ChatId, replies: Vec<Reply>) {
    for reply in replies {
        let result = match reply {
            Reply::Text { text, keyboard } => {
                let mut request = bot.send_message(chat_id, text);
                if let Some(markup) = reply_markup(keyboard) {
                    request = request.reply_markup(markup);
                }
                request.await.map(|_| ())
            }
            Reply::Document(plan) => bot
                .send_document(chat_id, InputFile::memory(plan.bytes).file_name(plan.file_name))
                .await
                .map(|_| ()),
        };

        if let Err(e) = result {
            log::error!("❌ Failed to send message to chat {}: {}", chat_id, e);
        }
    }
}
