use anyhow::Context;

use crate::db::{self, queries, SharedConnection};
use crate::models::Profile;

pub const PROFILE_KEY: &str = "userProfile";
pub const ONBOARDING_KEY: &str = "isOnboardingComplete";

/// Persists the singleton profile and the onboarding flag in the key-value
/// table.
#[derive(Clone)]
pub struct ProfileStore {
    db: SharedConnection,
}

impl ProfileStore {
    pub fn new(db: SharedConnection) -> Self {
        Self { db }
    }

    pub fn try_load(&self) -> anyhow::Result<Option<Profile>> {
        let raw = {
            let conn = db::lock(&self.db);
            queries::get_value(&conn, PROFILE_KEY)?
        };

        raw.map(|json| serde_json::from_str(&json).context("stored profile is not valid JSON"))
            .transpose()
    }

    /// Stored profile, or an empty one when nothing usable is stored.
    pub fn load(&self) -> Profile {
        match self.try_load() {
            Ok(profile) => profile.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("failed to load profile, using empty profile: {e:#}");
                Profile::default()
            }
        }
    }

    /// Replaces the whole stored record.
    pub fn save(&self, profile: &Profile) -> anyhow::Result<()> {
        let json = serde_json::to_string(profile)?;
        let conn = db::lock(&self.db);
        queries::set_value(&conn, PROFILE_KEY, &json).context("failed to save profile")
    }

    /// Logout: drops the profile and resets the onboarding flag together.
    pub fn clear(&self) -> anyhow::Result<()> {
        let mut conn = db::lock(&self.db);
        let tx = conn.transaction()?;
        queries::remove_value(&tx, PROFILE_KEY)?;
        queries::set_value(&tx, ONBOARDING_KEY, "false")?;
        tx.commit().context("failed to clear profile")?;
        Ok(())
    }

    pub fn set_onboarding_complete(&self, complete: bool) -> anyhow::Result<()> {
        let conn = db::lock(&self.db);
        queries::set_value(&conn, ONBOARDING_KEY, &serde_json::to_string(&complete)?)
            .context("failed to save onboarding flag")
    }

    pub fn try_is_onboarding_complete(&self) -> anyhow::Result<bool> {
        let raw = {
            let conn = db::lock(&self.db);
            queries::get_value(&conn, ONBOARDING_KEY)?
        };
        match raw {
            Some(value) => serde_json::from_str(&value).context("stored onboarding flag is not a boolean"),
            None => Ok(false),
        }
    }

    /// Unset and unreadable both count as not onboarded.
    pub fn is_onboarding_complete(&self) -> bool {
        self.try_is_onboarding_complete().unwrap_or_else(|e| {
            tracing::warn!("failed to read onboarding flag, assuming onboarding: {e:#}");
            false
        })
    }
}
