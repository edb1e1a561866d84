pub mod answers;
pub mod options;
pub mod profile;
pub mod step;

pub use answers::{Answer, Answers, Conversation, DeliveryOption, Distance, Identity, PlanDocument};
pub use profile::UserProfile;
pub use step::Step;
