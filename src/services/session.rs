use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::watch;

use crate::models::{OnboardingError, OnboardingForm, Profile, Screen};
use crate::services::profile::ProfileStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub screen: Screen,
    pub profile: Profile,
    pub initials: String,
}

impl SessionState {
    fn new(screen: Screen, profile: Profile) -> Self {
        let initials = profile.initials();
        Self {
            screen,
            profile,
            initials,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Invalid(#[from] OnboardingError),
    #[error("profile changes require a completed onboarding")]
    NotOnboarded,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Current screen and profile, shared by every view that shows them. All
/// changes go through the mutation methods, which persist first and then
/// publish the new state.
pub struct SessionViewModel {
    store: ProfileStore,
    state: watch::Sender<SessionState>,
    // Held across read, persist and publish so the stored and published
    // profiles never diverge.
    mutation: Mutex<()>,
}

impl SessionViewModel {
    /// Reads the onboarding flag and stored profile to pick the initial screen.
    pub fn load(store: ProfileStore) -> Self {
        let screen = Screen::from_onboarding_flag(store.is_onboarding_complete());
        let profile = store.load();
        tracing::info!("starting on {screen:?} screen");

        let (state, _) = watch::channel(SessionState::new(screen, profile));
        Self {
            store,
            state,
            mutation: Mutex::new(()),
        }
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn lock_mutation(&self) -> MutexGuard<'_, ()> {
        self.mutation.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, screen: Screen, profile: Profile) -> SessionState {
        let next = SessionState::new(screen, profile);
        self.state.send_replace(next.clone());
        next
    }

    /// Onboarding → Home. An invalid form leaves the session where it is.
    pub fn complete_onboarding(&self, form: &OnboardingForm) -> Result<SessionState, SessionError> {
        form.validate()?;

        let _guard = self.lock_mutation();
        let profile = Profile {
            first_name: form.first_name.clone(),
            email: form.email.clone(),
            ..self.current().profile
        };
        self.store.save(&profile)?;
        self.store.set_onboarding_complete(true)?;

        tracing::info!("onboarding completed");
        Ok(self.publish(Screen::Home, profile))
    }

    /// Replaces the whole profile. Only allowed once onboarded.
    pub fn save_profile(&self, profile: Profile) -> Result<SessionState, SessionError> {
        let _guard = self.lock_mutation();
        if self.current().screen != Screen::Home {
            return Err(SessionError::NotOnboarded);
        }
        self.store.save(&profile)?;
        Ok(self.publish(Screen::Home, profile))
    }

    pub fn update_avatar(&self, avatar: Option<String>) -> Result<SessionState, SessionError> {
        let _guard = self.lock_mutation();
        let current = self.current();
        if current.screen != Screen::Home {
            return Err(SessionError::NotOnboarded);
        }
        let profile = Profile {
            avatar,
            ..current.profile
        };
        self.store.save(&profile)?;
        Ok(self.publish(Screen::Home, profile))
    }

    /// Home → Onboarding, with the stored profile removed.
    pub fn logout(&self) -> Result<SessionState, SessionError> {
        let _guard = self.lock_mutation();
        self.store.clear()?;
        tracing::info!("logged out");
        Ok(self.publish(Screen::Onboarding, Profile::default()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::db;

    fn session() -> (SessionViewModel, ProfileStore) {
        let store = ProfileStore::new(Arc::new(Mutex::new(db::init_db(":memory:").unwrap())));
        (SessionViewModel::load(store.clone()), store)
    }

    fn form(first_name: &str, email: &str) -> OnboardingForm {
        OnboardingForm {
            first_name: first_name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_fresh_install_starts_onboarding() {
        let (session, _) = session();
        assert_eq!(session.current().screen, Screen::Onboarding);
    }

    #[test]
    fn test_onboarding_moves_to_home_and_persists() {
        let (session, store) = session();
        let state = session
            .complete_onboarding(&form("Tilly", "tilly@littlelemon.com"))
            .unwrap();

        assert_eq!(state.screen, Screen::Home);
        assert_eq!(state.initials, "T");
        assert!(store.is_onboarding_complete());
        assert_eq!(store.load().email, "tilly@littlelemon.com");

        // A restart picks the home screen.
        let restarted = SessionViewModel::load(store);
        assert_eq!(restarted.current().screen, Screen::Home);
        assert_eq!(restarted.current().profile.first_name, "Tilly");
    }

    #[test]
    fn test_invalid_form_stays_on_onboarding() {
        let (session, store) = session();
        let err = session
            .complete_onboarding(&form("Tilly", "not-an-email"))
            .unwrap_err();

        assert!(matches!(err, SessionError::Invalid(OnboardingError::InvalidEmail)));
        assert_eq!(session.current().screen, Screen::Onboarding);
        assert!(!store.is_onboarding_complete());
    }

    #[test]
    fn test_avatar_update_is_seen_by_observers() {
        let (session, store) = session();
        session
            .complete_onboarding(&form("Tilly", "tilly@littlelemon.com"))
            .unwrap();
        let observer = session.subscribe();

        session
            .update_avatar(Some("file:///tilly.png".to_string()))
            .unwrap();

        assert_eq!(
            observer.borrow().profile.avatar.as_deref(),
            Some("file:///tilly.png")
        );
        assert_eq!(store.load().avatar.as_deref(), Some("file:///tilly.png"));

        session.update_avatar(None).unwrap();
        assert_eq!(observer.borrow().profile.avatar, None);
    }

    #[test]
    fn test_logout_returns_to_onboarding() {
        let (session, store) = session();
        session
            .complete_onboarding(&form("Tilly", "tilly@littlelemon.com"))
            .unwrap();
        session
            .save_profile(Profile {
                first_name: "Tilly".to_string(),
                last_name: "Doe".to_string(),
                newsletter_notifs: true,
                ..Default::default()
            })
            .unwrap();

        let state = session.logout().unwrap();

        assert_eq!(state.screen, Screen::Onboarding);
        assert_eq!(state.profile, Profile::default());
        assert_eq!(store.load(), Profile::default());
        assert!(!store.is_onboarding_complete());
    }

    #[test]
    fn test_profile_edits_rejected_before_onboarding() {
        let (session, store) = session();

        let err = session
            .update_avatar(Some("file:///x.png".to_string()))
            .unwrap_err();
        assert!(matches!(err, SessionError::NotOnboarded));

        let err = session
            .save_profile(Profile {
                first_name: "Tilly".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::NotOnboarded));

        assert_eq!(session.current().screen, Screen::Onboarding);
        assert_eq!(store.try_load().unwrap(), None);
    }

    #[test]
    fn test_concurrent_edits_keep_store_and_state_in_step() {
        let (session, store) = session();
        session
            .complete_onboarding(&form("Tilly", "tilly@littlelemon.com"))
            .unwrap();

        for i in 0..200 {
            thread::scope(|s| {
                s.spawn(|| {
                    session
                        .save_profile(Profile {
                            first_name: "Tilly".to_string(),
                            last_name: format!("L{i}"),
                            ..Default::default()
                        })
                        .unwrap();
                });
                s.spawn(|| {
                    session.update_avatar(Some(format!("A{i}"))).unwrap();
                });
            });

            assert_eq!(store.load(), session.current().profile, "round {i}");
        }
    }
}
