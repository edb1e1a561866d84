use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use super::Answers;

pub const DEFAULT_VDOT: f64 = 40.0;
pub const DEFAULT_VDOT_ADJUSTMENT: f64 = 0.0;

/// Row of the `users` table. One per chat.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserProfile {
    pub chat_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub weekly_km: Option<String>,
    pub trainings_per_week: Option<i64>,
    pub age_group: Option<String>,
    pub best_time_5k: Option<String>,
    pub best_time_10k: Option<String>,
    pub best_time_21k: Option<String>,
    pub best_time_42k: Option<String>,
    pub plan_duration: Option<i64>,
    pub delivery_option: Option<String>,
    pub vdot: f64,
    pub vdot_adjustment: f64,
    pub subscribed_at: Option<DateTime<Utc>>,
    pub birthdate: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Build the row for `answers`, defaulting whatever is still unset.
    pub fn from_answers(chat_id: i64, answers: &Answers, now: DateTime<Utc>) -> Self {
        Self {
            chat_id,
            username: answers.username.clone(),
            first_name: answers.first_name.clone(),
            last_name: answers.last_name.clone(),
            weekly_km: answers.weekly_km.clone(),
            trainings_per_week: answers.trainings_per_week.map(i64::from),
            age_group: answers.age_group.clone(),
            best_time_5k: answers.best_time_5k.clone(),
            best_time_10k: answers.best_time_10k.clone(),
            best_time_21k: answers.best_time_21k.clone(),
            best_time_42k: answers.best_time_42k.clone(),
            plan_duration: answers.plan_duration.map(i64::from),
            delivery_option: answers.delivery_option.map(|option| option.label().to_string()),
            vdot: answers.vdot.unwrap_or(DEFAULT_VDOT),
            vdot_adjustment: answers.vdot_adjustment.unwrap_or(DEFAULT_VDOT_ADJUSTMENT),
            subscribed_at: answers.subscribed_at,
            birthdate: answers.birthdate,
            created_at: answers.created_at.unwrap_or(now),
        }
    }
}
