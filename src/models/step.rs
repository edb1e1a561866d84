use std::fmt;

use crate::error::ValidationError;

use super::answers::{Answer, DeliveryOption, Distance};
use super::options::{self, choices, is_valid_option, is_valid_time};

/// Position within the questionnaire.
///
/// Progresses linearly: NotStarted → AwaitingWeeklyKm → ... →
/// AwaitingDeliveryOption. The last step has no successor; accepting it
/// completes the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Step {
    #[default]
    NotStarted,
    AwaitingWeeklyKm,
    AwaitingTrainingsPerWeek,
    AwaitingAgeGroup,
    AwaitingBestTime5k,
    AwaitingBestTime10k,
    AwaitingBestTime21k,
    AwaitingBestTime42k,
    AwaitingPlanDuration,
    AwaitingDeliveryOption,
}

impl Step {
    pub fn next(self) -> Option<Step> {
        use Step::*;
        match self {
            NotStarted => Some(AwaitingWeeklyKm),
            AwaitingWeeklyKm => Some(AwaitingTrainingsPerWeek),
            AwaitingTrainingsPerWeek => Some(AwaitingAgeGroup),
            AwaitingAgeGroup => Some(AwaitingBestTime5k),
            AwaitingBestTime5k => Some(AwaitingBestTime10k),
            AwaitingBestTime10k => Some(AwaitingBestTime21k),
            AwaitingBestTime21k => Some(AwaitingBestTime42k),
            AwaitingBestTime42k => Some(AwaitingPlanDuration),
            AwaitingPlanDuration => Some(AwaitingDeliveryOption),
            AwaitingDeliveryOption => None,
        }
    }

    /// Race distance asked about at a best-time step.
    pub fn distance(self) -> Option<Distance> {
        match self {
            Step::AwaitingBestTime5k => Some(Distance::FiveK),
            Step::AwaitingBestTime10k => Some(Distance::TenK),
            Step::AwaitingBestTime21k => Some(Distance::HalfMarathon),
            Step::AwaitingBestTime42k => Some(Distance::Marathon),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::NotStarted => "not_started",
            Step::AwaitingWeeklyKm => "awaiting_weekly_km",
            Step::AwaitingTrainingsPerWeek => "awaiting_trainings_per_week",
            Step::AwaitingAgeGroup => "awaiting_age_group",
            Step::AwaitingBestTime5k => "awaiting_best_time_5k",
            Step::AwaitingBestTime10k => "awaiting_best_time_10k",
            Step::AwaitingBestTime21k => "awaiting_best_time_21k",
            Step::AwaitingBestTime42k => "awaiting_best_time_42k",
            Step::AwaitingPlanDuration => "awaiting_plan_duration",
            Step::AwaitingDeliveryOption => "awaiting_delivery_option",
        }
    }

    /// Validate `input` for this step and turn it into the field to record.
    pub fn accept(self, input: &str) -> Result<Answer, ValidationError> {
        let unknown = || ValidationError::UnknownOption {
            step: self,
            input: input.to_string(),
        };
        let best_time = |distance: Distance| {
            if is_valid_time(input) {
                Ok(Answer::BestTime(distance, input.to_string()))
            } else {
                Err(ValidationError::InvalidTime { input: input.to_string() })
            }
        };

        if choices(self).is_some() && !is_valid_option(self, input) {
            return Err(unknown());
        }

        match self {
            Step::NotStarted => Err(ValidationError::NoAnswerExpected { step: self }),
            Step::AwaitingWeeklyKm => Ok(Answer::WeeklyKm(input.to_string())),
            Step::AwaitingTrainingsPerWeek => {
                input.parse().map(Answer::TrainingsPerWeek).map_err(|_| unknown())
            }
            Step::AwaitingAgeGroup => Ok(Answer::AgeGroup(input.to_string())),
            Step::AwaitingBestTime5k => best_time(Distance::FiveK),
            Step::AwaitingBestTime10k => best_time(Distance::TenK),
            Step::AwaitingBestTime21k => best_time(Distance::HalfMarathon),
            Step::AwaitingBestTime42k => best_time(Distance::Marathon),
            Step::AwaitingPlanDuration => input.parse().map(Answer::PlanDuration).map_err(|_| unknown()),
            Step::AwaitingDeliveryOption => DeliveryOption::from_label(input)
                .map(Answer::Delivery)
                .ok_or_else(unknown),
        }
    }

    /// Buttons to show with this step's prompt.
    pub fn keyboard(self) -> Option<options::OptionRows> {
        options::keyboard(self)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
