use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use chrono::Utc;
use teloxide::types::ChatId;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::models::{Answers, Conversation, Identity, Step};

type Entry = Arc<Mutex<Conversation>>;

/// In-flight conversations, one lock per chat.
///
/// A caller holds a [`ConversationGuard`] for the whole read-modify-write of
/// an event, so two messages from the same chat never interleave. Lost on
/// restart.
#[derive(Clone, Default)]
pub struct ConversationStore {
    entries: Arc<RwLock<HashMap<ChatId, Entry>>>,
}

pub struct ConversationGuard {
    chat_id: ChatId,
    guard: OwnedMutexGuard<Conversation>,
}

impl ConversationGuard {
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }
}

impl Deref for ConversationGuard {
    type Target = Conversation;

    fn deref(&self) -> &Conversation {
        &self.guard
    }
}

impl DerefMut for ConversationGuard {
    fn deref_mut(&mut self) -> &mut Conversation {
        &mut self.guard
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the conversation of `chat_id`, creating it from `identity` on
    /// first contact.
    pub async fn lock(&self, chat_id: ChatId, identity: &Identity) -> ConversationGuard {
        let existing = self.entries.read().await.get(&chat_id).cloned();
        let entry = match existing {
            Some(entry) => entry,
            None => {
                let mut entries = self.entries.write().await;
                entries
                    .entry(chat_id)
                    .or_insert_with(|| {
                        log::debug!("New conversation for chat {}", chat_id);
                        Arc::new(Mutex::new(Conversation {
                            step: Step::NotStarted,
                            answers: Answers::new(identity, Utc::now()),
                        }))
                    })
                    .clone()
            }
        };

        let guard = entry.lock_owned().await;
        ConversationGuard { chat_id, guard }
    }

    /// Drop everything collected for this chat so the next message starts
    /// over. The entry leaves the map unless another event is already
    /// queued on it, in which case it is reset in place and keeps the
    /// sender's identity.
    pub async fn finish(&self, mut conversation: ConversationGuard) {
        let answers = conversation.guard.answers.restarted(Utc::now());
        *conversation.guard = Conversation {
            step: Step::NotStarted,
            answers,
        };

        let mut entries = self.entries.write().await;
        // One reference held by the map, one by this guard.
        if Arc::strong_count(OwnedMutexGuard::mutex(&conversation.guard)) <= 2 {
            entries.remove(&conversation.chat_id);
        }
        log::debug!("Conversation for chat {} finished", conversation.chat_id);
    }

    pub async fn step(&self, chat_id: ChatId) -> Step {
        match self.entry(chat_id).await {
            Some(entry) => entry.lock().await.step,
            None => Step::NotStarted,
        }
    }

    pub async fn answers(&self, chat_id: ChatId) -> Option<Answers> {
        let entry = self.entry(chat_id).await?;
        let conversation = entry.lock().await;
        Some(conversation.answers.clone())
    }

    async fn entry(&self, chat_id: ChatId) -> Option<Entry> {
        self.entries.read().await.get(&chat_id).cloned()
    }
}
