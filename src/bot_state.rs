use std::time::Instant;

use chrono::Utc;
use teloxide::types::ChatId;

use crate::conversations::{ConversationGuard, ConversationStore};
use crate::database::Database;
use crate::error::PersistError;
use crate::models::{Answers, DeliveryOption, Identity, Step, UserProfile};
use crate::survey::prompts::{
    self, ALREADY_SUBSCRIBED, FOLLOW_UP, NO_PLAN_YET, PLAN_IN_PROGRESS, SAVED, SAVE_FAILED, SUBSCRIBED,
};
use crate::survey::{self, Action, Keyboard, Reply, Transition};

#[derive(Clone)]
pub struct BotState {
    db: Database,
    conversations: ConversationStore,
}

impl BotState {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            conversations: ConversationStore::new(),
        }
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Feed one text message into the questionnaire and collect the replies.
    pub async fn handle_text(&self, chat_id: ChatId, identity: &Identity, text: &str) -> Vec<Reply> {
        let start_time = Instant::now();
        let mut conversation = self.conversations.lock(chat_id, identity).await;
        let step = conversation.step;

        let replies = match survey::advance(&mut conversation, text) {
            Transition::Ignored => Vec::new(),
            Transition::Started => {
                log::info!("👋 Survey started for chat {}", chat_id);
                let mut replies = vec![Reply::text(prompts::greeting(identity.display_name()))];
                replies.extend(Reply::question(conversation.step));
                replies
            }
            Transition::Rejected(err) => {
                log::debug!("Chat {} at {}: {}", chat_id, step, err);
                Reply::rejection(step).into_iter().chain(Reply::question(step)).collect()
            }
            Transition::Advanced(next) => Reply::question(next).into_iter().collect(),
            Transition::Completed => self.complete(conversation).await,
        };

        log::debug!("Chat {} handled at {} in {:?}", chat_id, step, start_time.elapsed());
        replies
    }

    /// Follow-up button pressed outside the questionnaire.
    pub async fn handle_action(&self, chat_id: ChatId, identity: &Identity, action: Action) -> Vec<Reply> {
        let mut conversation = self.conversations.lock(chat_id, identity).await;

        let replies = match action {
            Action::Download => match conversation.answers.plan.clone() {
                Some(plan) => vec![Reply::Document(plan)],
                None => vec![Reply::text(NO_PLAN_YET)],
            },
            Action::Subscribe => self.subscribe(&mut conversation).await,
        };

        // Outside a survey the entry only existed for this press.
        if conversation.step == Step::NotStarted && conversation.answers.plan.is_none() {
            self.conversations.finish(conversation).await;
        }
        replies
    }

    /// Upsert the profile row for `chat_id`.
    pub async fn persist(&self, chat_id: ChatId, answers: &Answers) -> Result<(), PersistError> {
        let start_time = Instant::now();
        let profile = UserProfile::from_answers(chat_id.0, answers, Utc::now());

        self.db
            .upsert_profile(&profile)
            .await
            .map_err(|source| PersistError::Write {
                chat_id: chat_id.0,
                source,
            })?;

        log::debug!("💾 Profile saved for chat {} in {:?}", chat_id, start_time.elapsed());
        Ok(())
    }

    async fn complete(&self, conversation: ConversationGuard) -> Vec<Reply> {
        let chat_id = conversation.chat_id();
        let delivery = conversation.answers.delivery_option;

        let mut answers = conversation.answers.clone();
        if delivery == Some(DeliveryOption::Subscribe) {
            answers.subscribed_at.get_or_insert_with(Utc::now);
        }

        if let Err(e) = self.persist(chat_id, &answers).await {
            log::error!("❌ Error saving user data: {}", e);
            return vec![Reply::text(SAVE_FAILED)];
        }

        self.conversations.finish(conversation).await;
        log::info!("✅ Survey completed for chat {}", chat_id);

        let acknowledgement = match delivery {
            Some(DeliveryOption::Subscribe) => SUBSCRIBED,
            Some(DeliveryOption::Download) | None => PLAN_IN_PROGRESS,
        };

        vec![
            Reply::with_keyboard(SAVED, Keyboard::Remove),
            Reply::text(acknowledgement),
            Reply::with_keyboard(FOLLOW_UP, Keyboard::FollowUp),
        ]
    }

    async fn subscribe(&self, conversation: &mut ConversationGuard) -> Vec<Reply> {
        let chat_id = conversation.chat_id();

        // A finished survey has already been cleared from memory; start from
        // the stored row so a bare subscription does not blank it.
        if !conversation.answers.has_survey_data() {
            match self.db.fetch_profile(chat_id.0).await {
                Ok(Some(profile)) => conversation.answers.fill_from(&profile),
                Ok(None) => {}
                Err(e) => {
                    log::error!("❌ Error loading profile for chat {}: {}", chat_id, e);
                    return vec![Reply::text(SAVE_FAILED)];
                }
            }
        }

        if conversation.answers.subscribed_at.is_some() {
            return vec![Reply::text(ALREADY_SUBSCRIBED)];
        }

        let mut answers = conversation.answers.clone();
        answers.subscribed_at = Some(Utc::now());
        if let Err(e) = self.persist(chat_id, &answers).await {
            log::error!("❌ Error saving subscription: {}", e);
            return vec![Reply::text(SAVE_FAILED)];
        }
        conversation.answers = answers;

        log::info!("📬 Chat {} subscribed to the newsletter", chat_id);
        vec![Reply::text(SUBSCRIBED)]
    }
}
