use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Onboarding,
    Home,
}

impl Screen {
    pub fn from_onboarding_flag(complete: bool) -> Self {
        if complete {
            Screen::Home
        } else {
            Screen::Onboarding
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OnboardingError {
    #[error("first name is required")]
    MissingFirstName,
    #[error("email address is not valid")]
    InvalidEmail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingForm {
    pub first_name: String,
    pub email: String,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[\w-]+(\.[\w-]+)*@([\w-]+\.)+[a-zA-Z]{2,7}$")
            .unwrap_or_else(|e| panic!("email pattern does not compile: {e}"))
    })
}

impl OnboardingForm {
    pub fn validate(&self) -> Result<(), OnboardingError> {
        if self.first_name.is_empty() {
            return Err(OnboardingError::MissingFirstName);
        }
        if !email_pattern().is_match(&self.email) {
            return Err(OnboardingError::InvalidEmail);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(first_name: &str, email: &str) -> OnboardingForm {
        OnboardingForm {
            first_name: first_name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form("Tilly", "tilly@littlelemon.com").validate().is_ok());
        assert!(form("Tilly", "tilly.doe@mail.little-lemon.co").validate().is_ok());
    }

    #[test]
    fn test_missing_first_name() {
        assert_eq!(
            form("", "tilly@littlelemon.com").validate(),
            Err(OnboardingError::MissingFirstName)
        );
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["", "tilly", "tilly@", "tilly@lemon", "tilly@lemon.c", "a b@lemon.com"] {
            assert_eq!(
                form("Tilly", email).validate(),
                Err(OnboardingError::InvalidEmail),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_screen_from_flag() {
        assert_eq!(Screen::from_onboarding_flag(false), Screen::Onboarding);
        assert_eq!(Screen::from_onboarding_flag(true), Screen::Home);
    }
}
