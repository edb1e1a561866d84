//! Texts and keyboards the bot sends.

use crate::models::options::{OptionRows, UNKNOWN_TIME};
use crate::models::{PlanDocument, Step};

pub const SAVE_FAILED: &str = "Error saving your data. Please try again later.";
pub const SAVED: &str = "Thank you! Your answers have been saved.";
pub const PLAN_IN_PROGRESS: &str = "Your plan will be ready in a few minutes...";
pub const SUBSCRIBED: &str = "You are subscribed to the weekly training plan newsletter!";
pub const ALREADY_SUBSCRIBED: &str = "You are already subscribed to the newsletter.";
pub const NO_PLAN_YET: &str = "There is no plan for you yet. Complete the questionnaire first with /start.";
pub const FOLLOW_UP: &str = "You can come back to these any time:";
pub const HELP: &str = "I put together running plans.\n\n\
    /start - answer a few questions about your training\n\
    /help - show this message\n\n\
    You can also just say hello.";

/// Markup attached to an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    Unchanged,
    Options(OptionRows),
    Remove,
    /// Inline download/subscribe buttons.
    FollowUp,
}

/// Transport-agnostic outgoing message.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text { text: String, keyboard: Keyboard },
    Document(PlanDocument),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text {
            text: text.into(),
            keyboard: Keyboard::Unchanged,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Reply::Text {
            text: text.into(),
            keyboard,
        }
    }

    /// The question asked at `step`, with its buttons.
    pub fn question(step: Step) -> Option<Self> {
        let text = question_text(step)?;
        let keyboard = step.keyboard().map_or(Keyboard::Unchanged, Keyboard::Options);
        Some(Reply::with_keyboard(text, keyboard))
    }

    /// Error for a rejected answer. Time steps keep the "unknown" button.
    pub fn rejection(step: Step) -> Option<Self> {
        let text = error_text(step)?;
        let keyboard = if step.distance().is_some() {
            step.keyboard().map_or(Keyboard::Unchanged, Keyboard::Options)
        } else {
            Keyboard::Unchanged
        };
        Some(Reply::with_keyboard(text, keyboard))
    }

    pub fn text_content(&self) -> Option<&str> {
        match self {
            Reply::Text { text, .. } => Some(text),
            Reply::Document(_) => None,
        }
    }
}

pub fn greeting(name: &str) -> String {
    format!("Hi, {name}! I'll help you put together a training plan. Just answer a few questions.")
}

fn question_text(step: Step) -> Option<String> {
    let text = match step {
        Step::NotStarted => return None,
        Step::AwaitingWeeklyKm => "How many kilometres a week do you want to run?".to_string(),
        Step::AwaitingTrainingsPerWeek => "How many training sessions a week do you want?".to_string(),
        Step::AwaitingAgeGroup => "How old are you?".to_string(),
        Step::AwaitingBestTime5k => format!("What is your best 5 km time? (MM:SS or tap «{UNKNOWN_TIME}»)"),
        Step::AwaitingBestTime10k => format!("What is your best 10 km time? (MM:SS or tap «{UNKNOWN_TIME}»)"),
        Step::AwaitingBestTime21k => {
            format!("What is your best half marathon (21 km) time? (HH:MM:SS or tap «{UNKNOWN_TIME}»)")
        }
        Step::AwaitingBestTime42k => {
            format!("What is your best marathon (42 km) time? (HH:MM:SS or tap «{UNKNOWN_TIME}»)")
        }
        Step::AwaitingPlanDuration => "How many months should the plan cover?".to_string(),
        Step::AwaitingDeliveryOption => {
            "Would you like to download the plan or subscribe to the newsletter?".to_string()
        }
    };
    Some(text)
}

fn error_text(step: Step) -> Option<String> {
    let time_hint = |format: &str, example: &str| {
        format!("Please enter the time as {format} (for example, {example}) or tap «{UNKNOWN_TIME}».")
    };
    let text = match step {
        Step::NotStarted => return None,
        Step::AwaitingWeeklyKm | Step::AwaitingAgeGroup | Step::AwaitingDeliveryOption => {
            "Please choose one of the options offered.".to_string()
        }
        Step::AwaitingTrainingsPerWeek => "Please choose a number from 2 to 6.".to_string(),
        Step::AwaitingPlanDuration => "Please choose a number from 1 to 6.".to_string(),
        Step::AwaitingBestTime5k => time_hint("MM:SS", "25:30"),
        Step::AwaitingBestTime10k => time_hint("MM:SS", "52:15"),
        Step::AwaitingBestTime21k => time_hint("HH:MM:SS", "1:45:30"),
        Step::AwaitingBestTime42k => time_hint("HH:MM:SS", "3:45:30"),
    };
    Some(text)
}
