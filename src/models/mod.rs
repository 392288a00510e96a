pub mod dish;
pub mod onboarding;
pub mod profile;

pub use dish::{Dish, MenuPayload};
pub use onboarding::{OnboardingError, OnboardingForm, Screen};
pub use profile::Profile;
