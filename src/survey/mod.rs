//! Questionnaire state machine.
//!
//! [`advance`] applies one inbound text to a conversation. It never performs
//! I/O; persisting and replying are left to the caller.

pub mod prompts;

use crate::error::ValidationError;
use crate::models::{Conversation, Step};

pub use prompts::{Keyboard, Reply};

pub const DOWNLOAD_ACTION: &str = "download_plan";
pub const SUBSCRIBE_ACTION: &str = "subscribe";

const GREETINGS: [&str; 2] = ["hello", "/start"];

/// Result of feeding one input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing started yet and the input was not a greeting.
    Ignored,
    /// Greeting accepted; now at [`Step::AwaitingWeeklyKm`].
    Started,
    /// Input refused. Step and answers are untouched.
    Rejected(ValidationError),
    /// Answer recorded, now waiting at the contained step.
    Advanced(Step),
    /// Final answer recorded. The step stays put until the caller has
    /// persisted the answers and finished the conversation.
    Completed,
}

/// Follow-up button pressed outside the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Download,
    Subscribe,
}

impl Action {
    pub fn from_callback_data(data: &str) -> Option<Self> {
        match data {
            DOWNLOAD_ACTION => Some(Action::Download),
            SUBSCRIBE_ACTION => Some(Action::Subscribe),
            _ => None,
        }
    }

    pub fn callback_data(self) -> &'static str {
        match self {
            Action::Download => DOWNLOAD_ACTION,
            Action::Subscribe => SUBSCRIBE_ACTION,
        }
    }
}

pub fn is_greeting(input: &str) -> bool {
    GREETINGS.iter().any(|greeting| input.eq_ignore_ascii_case(greeting))
}

pub fn advance(conversation: &mut Conversation, input: &str) -> Transition {
    let step = conversation.step;

    if step == Step::NotStarted {
        if !is_greeting(input) {
            return Transition::Ignored;
        }
        conversation.step = Step::AwaitingWeeklyKm;
        return Transition::Started;
    }

    let answer = match step.accept(input) {
        Ok(answer) => answer,
        Err(err) => return Transition::Rejected(err),
    };
    conversation.answers.record(answer);

    match step.next() {
        Some(next) => {
            conversation.step = next;
            Transition::Advanced(next)
        }
        None => Transition::Completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::options::UNKNOWN_TIME;
    use crate::models::{Answers, DeliveryOption};

    fn at(step: Step) -> Conversation {
        Conversation {
            step,
            answers: Answers::default(),
        }
    }

    #[test]
    fn greeting_is_case_insensitive() {
        for input in ["hello", "Hello", "HELLO", "/start", "/START"] {
            let mut conversation = at(Step::NotStarted);
            assert_eq!(advance(&mut conversation, input), Transition::Started, "{input}");
            assert_eq!(conversation.step, Step::AwaitingWeeklyKm);
        }
    }

    #[test]
    fn chatter_before_start_is_ignored() {
        let mut conversation = at(Step::NotStarted);
        assert_eq!(advance(&mut conversation, "30-70 km"), Transition::Ignored);
        assert_eq!(conversation, at(Step::NotStarted));
    }

    #[test]
    fn invalid_input_changes_nothing() {
        let cases = [
            (Step::AwaitingWeeklyKm, "lots"),
            (Step::AwaitingTrainingsPerWeek, "10"),
            (Step::AwaitingAgeGroup, "18-40 years"),
            (Step::AwaitingBestTime5k, "99:99"),
            (Step::AwaitingBestTime42k, "3h45"),
            (Step::AwaitingPlanDuration, "0"),
            (Step::AwaitingDeliveryOption, "both"),
        ];
        for (step, input) in cases {
            let mut conversation = at(step);
            conversation.answers.weekly_km = Some("30-70 km".to_string());
            let before = conversation.clone();
            assert!(matches!(advance(&mut conversation, input), Transition::Rejected(_)));
            assert_eq!(conversation, before, "{step} with {input}");
        }
    }

    #[test]
    fn transitions_do_not_depend_on_history() {
        let mut fresh = at(Step::AwaitingBestTime10k);
        let mut seasoned = at(Step::AwaitingBestTime10k);
        seasoned.answers.best_time_10k = Some("45:00".to_string());
        seasoned.answers.age_group = Some("over 60".to_string());

        assert_eq!(advance(&mut fresh, "52:15"), Transition::Advanced(Step::AwaitingBestTime21k));
        assert_eq!(advance(&mut seasoned, "52:15"), Transition::Advanced(Step::AwaitingBestTime21k));
        assert_eq!(fresh.answers.best_time_10k.as_deref(), Some("52:15"));
        assert_eq!(seasoned.answers.best_time_10k.as_deref(), Some("52:15"));
    }

    #[test]
    fn full_walk_completes_on_delivery() {
        let mut conversation = at(Step::NotStarted);
        let inputs = [
            "/start",
            "up to 30 km",
            "3",
            "18-40",
            "25:30",
            UNKNOWN_TIME,
            "1:45:30",
            UNKNOWN_TIME,
            "2",
        ];
        for input in inputs {
            assert!(!matches!(
                advance(&mut conversation, input),
                Transition::Rejected(_) | Transition::Ignored
            ));
        }
        assert_eq!(conversation.step, Step::AwaitingDeliveryOption);
        assert_eq!(advance(&mut conversation, "Download plan"), Transition::Completed);
        assert_eq!(conversation.step, Step::AwaitingDeliveryOption);
        assert_eq!(conversation.answers.delivery_option, Some(DeliveryOption::Download));
        assert_eq!(conversation.answers.best_time_42k.as_deref(), Some(UNKNOWN_TIME));
        assert_eq!(conversation.answers.plan_duration, Some(2));
    }

    #[test]
    fn callback_data_round_trips() {
        for action in [Action::Download, Action::Subscribe] {
            assert_eq!(Action::from_callback_data(action.callback_data()), Some(action));
        }
        assert_eq!(Action::from_callback_data("cancel"), None);
    }
}
