use chrono::{DateTime, NaiveDate, Utc};
use teloxide::types::User;

use super::options::{DOWNLOAD_PLAN, SUBSCRIBE_NEWSLETTER};
use super::{Step, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distance {
    FiveK,
    TenK,
    HalfMarathon,
    Marathon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOption {
    Download,
    Subscribe,
}

impl DeliveryOption {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            DOWNLOAD_PLAN => Some(Self::Download),
            SUBSCRIBE_NEWSLETTER => Some(Self::Subscribe),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Download => DOWNLOAD_PLAN,
            Self::Subscribe => SUBSCRIBE_NEWSLETTER,
        }
    }
}

/// One accepted answer, ready to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    WeeklyKm(String),
    TrainingsPerWeek(u8),
    AgeGroup(String),
    BestTime(Distance, String),
    PlanDuration(u8),
    Delivery(DeliveryOption),
}

/// Display-name bundle carried by every inbound Telegram event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl Identity {
    /// Name used in the greeting: first name, falling back to the handle.
    pub fn display_name(&self) -> &str {
        if self.first_name.is_empty() {
            self.username.as_deref().unwrap_or_default()
        } else {
            &self.first_name
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Generated plan waiting to be downloaded. Nothing in this crate builds one;
/// an external plan generator attaches it to [`Answers::plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Everything collected for one conversation so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answers {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,

    pub weekly_km: Option<String>,
    pub trainings_per_week: Option<u8>,
    pub age_group: Option<String>,
    pub best_time_5k: Option<String>,
    pub best_time_10k: Option<String>,
    pub best_time_21k: Option<String>,
    pub best_time_42k: Option<String>,
    pub plan_duration: Option<u8>,
    pub delivery_option: Option<DeliveryOption>,

    pub vdot: Option<f64>,
    pub vdot_adjustment: Option<f64>,
    pub subscribed_at: Option<DateTime<Utc>>,
    pub birthdate: Option<NaiveDate>,
    pub plan: Option<PlanDocument>,
}

impl Answers {
    pub fn new(identity: &Identity, created_at: DateTime<Utc>) -> Self {
        Self {
            username: identity.username.clone(),
            first_name: Some(identity.first_name.clone()),
            last_name: identity.last_name.clone(),
            created_at: Some(created_at),
            ..Default::default()
        }
    }

    /// Empty bag for the same sender, as a fresh conversation would start.
    pub fn restarted(&self, created_at: DateTime<Utc>) -> Self {
        Self {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            created_at: Some(created_at),
            ..Default::default()
        }
    }

    pub fn record(&mut self, answer: Answer) {
        match answer {
            Answer::WeeklyKm(value) => self.weekly_km = Some(value),
            Answer::TrainingsPerWeek(value) => self.trainings_per_week = Some(value),
            Answer::AgeGroup(value) => self.age_group = Some(value),
            Answer::BestTime(Distance::FiveK, value) => self.best_time_5k = Some(value),
            Answer::BestTime(Distance::TenK, value) => self.best_time_10k = Some(value),
            Answer::BestTime(Distance::HalfMarathon, value) => self.best_time_21k = Some(value),
            Answer::BestTime(Distance::Marathon, value) => self.best_time_42k = Some(value),
            Answer::PlanDuration(value) => self.plan_duration = Some(value),
            Answer::Delivery(value) => self.delivery_option = Some(value),
        }
    }

    /// True once at least one questionnaire answer has been recorded.
    pub fn has_survey_data(&self) -> bool {
        self.weekly_km.is_some()
            || self.trainings_per_week.is_some()
            || self.age_group.is_some()
            || self.best_time_5k.is_some()
            || self.best_time_10k.is_some()
            || self.best_time_21k.is_some()
            || self.best_time_42k.is_some()
            || self.plan_duration.is_some()
            || self.delivery_option.is_some()
    }

    /// Fill in survey fields from a stored profile, keeping anything already
    /// collected in memory.
    pub fn fill_from(&mut self, profile: &UserProfile) {
        fn keep<T: Clone>(slot: &mut Option<T>, stored: &Option<T>) {
            if slot.is_none() {
                slot.clone_from(stored);
            }
        }

        keep(&mut self.username, &profile.username);
        keep(&mut self.first_name, &profile.first_name);
        keep(&mut self.last_name, &profile.last_name);
        keep(&mut self.weekly_km, &profile.weekly_km);
        keep(&mut self.age_group, &profile.age_group);
        keep(&mut self.best_time_5k, &profile.best_time_5k);
        keep(&mut self.best_time_10k, &profile.best_time_10k);
        keep(&mut self.best_time_21k, &profile.best_time_21k);
        keep(&mut self.best_time_42k, &profile.best_time_42k);
        keep(&mut self.subscribed_at, &profile.subscribed_at);
        keep(&mut self.birthdate, &profile.birthdate);

        if self.trainings_per_week.is_none() {
            self.trainings_per_week = profile.trainings_per_week.and_then(|v| u8::try_from(v).ok());
        }
        if self.plan_duration.is_none() {
            self.plan_duration = profile.plan_duration.and_then(|v| u8::try_from(v).ok());
        }
        if self.delivery_option.is_none() {
            self.delivery_option = profile.delivery_option.as_deref().and_then(DeliveryOption::from_label);
        }
        self.vdot.get_or_insert(profile.vdot);
        self.vdot_adjustment.get_or_insert(profile.vdot_adjustment);
        self.created_at.get_or_insert(profile.created_at);
    }
}

/// In-memory state of one chat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    pub step: Step,
    pub answers: Answers,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> Identity {
        Identity {
            username: Some("fastfeet".to_string()),
            first_name: "Ann".to_string(),
            last_name: None,
        }
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut identity = runner();
        assert_eq!(identity.display_name(), "Ann");
        identity.first_name.clear();
        assert_eq!(identity.display_name(), "fastfeet");
    }

    #[test]
    fn new_answers_carry_identity_only() {
        let now = Utc::now();
        let answers = Answers::new(&runner(), now);
        assert_eq!(answers.username.as_deref(), Some("fastfeet"));
        assert_eq!(answers.first_name.as_deref(), Some("Ann"));
        assert_eq!(answers.created_at, Some(now));
        assert!(!answers.has_survey_data());
    }

    #[test]
    fn record_sets_the_matching_field() {
        let mut answers = Answers::default();
        answers.record(Answer::BestTime(Distance::HalfMarathon, "1:45:30".to_string()));
        answers.record(Answer::TrainingsPerWeek(3));
        answers.record(Answer::Delivery(DeliveryOption::Download));
        assert_eq!(answers.best_time_21k.as_deref(), Some("1:45:30"));
        assert!(answers.best_time_5k.is_none());
        assert_eq!(answers.trainings_per_week, Some(3));
        assert_eq!(answers.delivery_option, Some(DeliveryOption::Download));
        assert!(answers.has_survey_data());
    }

    #[test]
    fn restarted_keeps_only_the_sender() {
        let mut answers = Answers::new(&runner(), Utc::now());
        answers.record(Answer::WeeklyKm("30-70 km".to_string()));
        answers.subscribed_at = Some(Utc::now());

        let later = Utc::now() + chrono::Duration::minutes(5);
        let fresh = answers.restarted(later);
        assert_eq!(fresh.username.as_deref(), Some("fastfeet"));
        assert_eq!(fresh.first_name.as_deref(), Some("Ann"));
        assert_eq!(fresh.created_at, Some(later));
        assert!(fresh.subscribed_at.is_none());
        assert!(!fresh.has_survey_data());
    }

    #[test]
    fn fill_from_carries_birthdate() {
        let stored = UserProfile {
            birthdate: NaiveDate::from_ymd_opt(1990, 4, 12),
            ..UserProfile::from_answers(3, &Answers::default(), Utc::now())
        };
        let mut answers = Answers::new(&runner(), Utc::now());
        answers.fill_from(&stored);
        assert_eq!(answers.birthdate, NaiveDate::from_ymd_opt(1990, 4, 12));
        assert_eq!(answers.first_name.as_deref(), Some("Ann"));
    }

    #[test]
    fn delivery_labels_round_trip() {
        for option in [DeliveryOption::Download, DeliveryOption::Subscribe] {
            assert_eq!(DeliveryOption::from_label(option.label()), Some(option));
        }
        assert_eq!(DeliveryOption::from_label("download"), None);
    }
}
