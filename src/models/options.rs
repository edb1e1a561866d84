//! Button labels offered at each step.
//!
//! Keyboards and validation both read from these tables, so a label shown to
//! the user is always a label the validator accepts.

use std::sync::LazyLock;

use regex::Regex;

use super::Step;

/// Keyboard layout: rows of button labels.
pub type OptionRows = &'static [&'static [&'static str]];

pub const UNDER_30_KM: &str = "up to 30 km";
pub const FROM_30_TO_70_KM: &str = "30-70 km";
pub const OVER_70_KM: &str = "more than 70 km";

pub const UNKNOWN_TIME: &str = "I don't know";

pub const DOWNLOAD_PLAN: &str = "Download plan";
pub const SUBSCRIBE_NEWSLETTER: &str = "Subscribe to newsletter";

pub const WEEKLY_KM_OPTIONS: OptionRows = &[&[UNDER_30_KM, FROM_30_TO_70_KM], &[OVER_70_KM]];
pub const TRAININGS_PER_WEEK_OPTIONS: OptionRows = &[&["2", "3", "4"], &["5", "6"]];
pub const AGE_GROUP_OPTIONS: OptionRows = &[&["under 18", "18-40"], &["40-60", "over 60"]];
pub const TIME_OPTIONS: OptionRows = &[&[UNKNOWN_TIME]];
pub const PLAN_DURATION_OPTIONS: OptionRows = &[&["1", "2", "3"], &["4", "5", "6"]];
pub const DELIVERY_OPTIONS: OptionRows = &[&[DOWNLOAD_PLAN, SUBSCRIBE_NEWSLETTER]];

static MINUTES_SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}:[0-5][0-9]$").expect("valid MM:SS pattern"));
static HOURS_MINUTES_SECONDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+:[0-5][0-9]:[0-5][0-9]$").expect("valid H:MM:SS pattern")
});

/// The fixed choice set of a step, if it has one.
pub fn choices(step: Step) -> Option<OptionRows> {
    match step {
        Step::AwaitingWeeklyKm => Some(WEEKLY_KM_OPTIONS),
        Step::AwaitingTrainingsPerWeek => Some(TRAININGS_PER_WEEK_OPTIONS),
        Step::AwaitingAgeGroup => Some(AGE_GROUP_OPTIONS),
        Step::AwaitingPlanDuration => Some(PLAN_DURATION_OPTIONS),
        Step::AwaitingDeliveryOption => Some(DELIVERY_OPTIONS),
        Step::NotStarted
        | Step::AwaitingBestTime5k
        | Step::AwaitingBestTime10k
        | Step::AwaitingBestTime21k
        | Step::AwaitingBestTime42k => None,
    }
}

/// Buttons shown with the step's prompt. Time steps only offer the
/// "unknown" shortcut; the rest is free text.
pub fn keyboard(step: Step) -> Option<OptionRows> {
    if step.distance().is_some() {
        Some(TIME_OPTIONS)
    } else {
        choices(step)
    }
}

pub fn is_valid_option(step: Step, input: &str) -> bool {
    choices(step).is_some_and(|rows| rows.iter().flat_map(|row| row.iter()).any(|label| *label == input))
}

/// Accepts the "unknown" label, `MM:SS` and `H:MM:SS` with minutes and
/// seconds in 00-59 wherever they follow a colon.
pub fn is_valid_time(input: &str) -> bool {
    input == UNKNOWN_TIME
        || MINUTES_SECONDS.is_match(input)
        || HOURS_MINUTES_SECONDS.is_match(input)
}
